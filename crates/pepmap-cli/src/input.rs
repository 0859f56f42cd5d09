use anyhow::Context;
use clap::ArgMatches;
use pepmap_core::{filter::DEFAULT_DECOY_MARKERS, localize::Localization};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone, Debug)]
/// Actual mapping parameters - may include overrides or default values not set by user
pub struct Settings {
    pub version: String,
    pub species: String,
    pub fasta: String,
    pub modifications: String,
    pub input_path: String,
    pub output_path: String,
    pub peptide_column: usize,
    pub modified_peptide_column: usize,
    pub accession_column: usize,
    pub decoy_markers: Vec<String>,
    pub localization: Localization,
    /// Written verbatim into the last column of every output row
    pub match_label: String,
}

#[derive(Deserialize, Default, Debug)]
/// Input parameters deserialized from an optional JSON file
pub struct Input {
    species: Option<String>,
    fasta: Option<String>,
    modifications: Option<String>,
    input_path: Option<String>,
    output_path: Option<String>,
    peptide_column: Option<usize>,
    modified_peptide_column: Option<usize>,
    accession_column: Option<usize>,
    decoy_markers: Option<Vec<String>>,
    localization: Option<Localization>,
    match_label: Option<String>,
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{path}`"))?,
            None => Input::default(),
        };

        // Command line arguments take precedence over the JSON file
        if let Some(species) = matches.get_one::<String>("species") {
            input.species = Some(species.into());
        }
        if let Some(fasta) = matches.get_one::<String>("fasta") {
            log::trace!("overriding `fasta` parameter.");
            input.fasta = Some(fasta.into());
        }
        if let Some(conf) = matches.get_one::<String>("conf") {
            input.modifications = Some(conf.into());
        }
        if let Some(ifile) = matches.get_one::<String>("ifile") {
            input.input_path = Some(ifile.into());
        }
        if let Some(ofile) = matches.get_one::<String>("ofile") {
            input.output_path = Some(ofile.into());
        }
        if let Some(pep) = matches.get_one::<usize>("pep") {
            input.peptide_column = Some(*pep);
        }
        if let Some(m) = matches.get_one::<usize>("mod") {
            input.modified_peptide_column = Some(*m);
        }
        if let Some(acc) = matches.get_one::<usize>("acc") {
            input.accession_column = Some(*acc);
        }
        if let Some(decoys) = matches.get_many::<String>("decoy") {
            log::trace!("overriding `decoy_markers` parameter.");
            input.decoy_markers = Some(decoys.cloned().collect());
        }
        if let Some(localization) = matches.get_one::<Localization>("localization") {
            input.localization = Some(*localization);
        }
        if let Some(label) = matches.get_one::<String>("match-label") {
            input.match_label = Some(label.into());
        }

        Ok(input)
    }

    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&contents).map_err(anyhow::Error::from)
    }

    pub fn build(self) -> anyhow::Result<Settings> {
        let settings = Settings {
            version: clap::crate_version!().into(),
            species: required(self.species, "species", "--sp")?,
            fasta: self.fasta.unwrap_or_else(|| "uniprot_sprot.fasta".into()),
            modifications: required(self.modifications, "modifications", "--conf")?,
            input_path: required(self.input_path, "input_path", "--ifile")?,
            output_path: required(self.output_path, "output_path", "--ofile")?,
            peptide_column: required(self.peptide_column, "peptide_column", "--pep")?,
            modified_peptide_column: required(
                self.modified_peptide_column,
                "modified_peptide_column",
                "--mod",
            )?,
            accession_column: required(self.accession_column, "accession_column", "--acc")?,
            decoy_markers: self.decoy_markers.unwrap_or_else(|| {
                DEFAULT_DECOY_MARKERS
                    .iter()
                    .map(|marker| marker.to_string())
                    .collect()
            }),
            localization: self.localization.unwrap_or_default(),
            match_label: self.match_label.unwrap_or_else(|| "No".into()),
        };

        if settings.peptide_column == settings.modified_peptide_column {
            log::warn!(
                "`peptide_column` and `modified_peptide_column` are both {}: every peptide will be reported as unmodified",
                settings.peptide_column
            );
        }
        if settings.species.is_empty() {
            log::warn!("`species` is empty: every row with an `_` in its accession will be mapped");
        }

        Ok(settings)
    }
}

fn required<T>(value: Option<T>, name: &str, flag: &str) -> anyhow::Result<T> {
    value.with_context(|| {
        format!("`{name}` must be set (`{flag}` or parameter file). For more information try '--help'")
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn complete() -> Input {
        Input {
            species: Some("HUMAN".into()),
            modifications: Some("mods.csv".into()),
            input_path: Some("in.tsv".into()),
            output_path: Some("out.tsv".into()),
            peptide_column: Some(1),
            modified_peptide_column: Some(2),
            accession_column: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let settings = complete().build().unwrap();
        assert_eq!(settings.fasta, "uniprot_sprot.fasta");
        assert_eq!(settings.decoy_markers, vec!["_crap", "Random_"]);
        assert_eq!(settings.localization, Localization::Reference);
        assert_eq!(settings.match_label, "No");
    }

    #[test]
    fn missing_argument_is_fatal() {
        let input = Input {
            accession_column: None,
            ..complete()
        };
        let err = input.build().unwrap_err();
        assert!(err.to_string().contains("accession_column"));
    }

    #[test]
    fn parse_parameter_file() {
        let input: Input = serde_json::from_str(
            r#"{
                "species": "MOUSE",
                "peptide_column": 3,
                "localization": "residue",
                "decoy_markers": ["REV_"]
            }"#,
        )
        .unwrap();
        assert_eq!(input.species.as_deref(), Some("MOUSE"));
        assert_eq!(input.peptide_column, Some(3));
        assert_eq!(input.localization, Some(Localization::Residue));
        assert_eq!(input.decoy_markers, Some(vec!["REV_".to_string()]));
    }
}
