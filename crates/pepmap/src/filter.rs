use crate::fasta::accession;

/// Accession markers of contaminant and random-sequence entries
pub const DEFAULT_DECOY_MARKERS: [&str; 2] = ["_crap", "Random_"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The accession field does not mention the configured species
    Species,
    /// The accession field contains a decoy marker
    Decoy(String),
    /// The accession field has no `|`-delimited accession
    MissingAccession,
}

#[derive(Clone, Debug)]
/// Decide which result rows should be mapped, based on their protein accession field
pub struct AccessionFilter {
    species_tag: String,
    decoy_markers: Vec<String>,
}

impl AccessionFilter {
    /// `species` is matched case-sensitively as `_<species>`, as in `VAT1_HUMAN`
    pub fn new<S: AsRef<str>>(species: S, decoy_markers: Vec<String>) -> Self {
        Self {
            species_tag: format!("_{}", species.as_ref()),
            decoy_markers,
        }
    }

    pub fn accession<'a>(&self, field: &'a str) -> Result<&'a str, Rejection> {
        if !field.contains(&self.species_tag) {
            return Err(Rejection::Species);
        }
        if let Some(marker) = self.decoy_markers.iter().find(|m| field.contains(m.as_str())) {
            return Err(Rejection::Decoy(marker.clone()));
        }
        accession(field).ok_or(Rejection::MissingAccession)
    }
}
