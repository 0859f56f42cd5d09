use super::input::Settings;
use anyhow::Context;
use csv::StringRecord;
use log::info;
use pepmap_core::fasta::Fasta;
use pepmap_core::filter::{AccessionFilter, Rejection};
use pepmap_core::localize::Localized;
use pepmap_core::mapper::{PositionMapper, Scan};
use pepmap_core::modification::Vocabulary;
use rayon::prelude::*;
use std::time::Instant;

/// Why an input row produced no output
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Skip {
    MissingColumn,
    Species,
    Decoy,
    MissingAccession,
    UnknownAccession,
    NoMatch,
}

/// One occurrence of a peptide within its protein
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
    pub anchor: usize,
    pub localized: Localized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Skipped(Skip),
    Mapped(Vec<Mapping>),
}

/// A processed input row: original text plus what came of it
#[derive(Clone, Debug)]
pub struct Row {
    pub line: String,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: usize,
    pub mapped: usize,
    pub skipped_species: usize,
    pub skipped_decoy: usize,
    pub skipped_accession: usize,
    pub unknown_accession: usize,
    pub unmatched: usize,
    pub malformed: usize,
    pub written: usize,
}

impl Summary {
    fn tally(rows: &[Row]) -> Self {
        let mut summary = Summary {
            rows: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.outcome {
                Outcome::Mapped(_) => summary.mapped += 1,
                Outcome::Skipped(Skip::Species) => summary.skipped_species += 1,
                Outcome::Skipped(Skip::Decoy) => summary.skipped_decoy += 1,
                Outcome::Skipped(Skip::MissingAccession) => summary.skipped_accession += 1,
                Outcome::Skipped(Skip::UnknownAccession) => summary.unknown_accession += 1,
                Outcome::Skipped(Skip::NoMatch) => summary.unmatched += 1,
                Outcome::Skipped(Skip::MissingColumn) => summary.malformed += 1,
            }
        }
        summary
    }
}

pub struct Runner {
    pub fasta: Fasta,
    pub vocabulary: Vocabulary,
    pub parameters: Settings,
    filter: AccessionFilter,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Settings) -> anyhow::Result<Self> {
        let start = Instant::now();

        let fasta = pepmap_core::read_fasta(&parameters.fasta)
            .with_context(|| format!("Failed to build database from `{}`", parameters.fasta))?;
        let vocabulary = pepmap_core::read_vocabulary(&parameters.modifications).with_context(
            || {
                format!(
                    "Failed to read modifications from `{}`",
                    parameters.modifications
                )
            },
        )?;

        info!(
            "loaded {} proteins, {} modification tokens in {:#?}",
            fasta.len(),
            vocabulary.len(),
            start.elapsed()
        );
        if vocabulary.is_empty() {
            log::warn!("no modification tokens configured: modified peptides cannot be localized");
        }

        let filter = AccessionFilter::new(&parameters.species, parameters.decoy_markers.clone());

        Ok(Self {
            fasta,
            vocabulary,
            parameters,
            filter,
            start,
        })
    }

    /// Build a runner from already-loaded reference data
    pub fn with_data(parameters: Settings, fasta: Fasta, vocabulary: Vocabulary) -> Self {
        let filter = AccessionFilter::new(&parameters.species, parameters.decoy_markers.clone());
        Self {
            fasta,
            vocabulary,
            parameters,
            filter,
            start: Instant::now(),
        }
    }

    /// Resolve a single input row into zero or more peptide occurrences
    pub fn process(&self, record: &StringRecord) -> Outcome {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let fields = (
            record.get(self.parameters.accession_column),
            record.get(self.parameters.peptide_column),
            record.get(self.parameters.modified_peptide_column),
        );
        let (accession, peptide, modified) = match fields {
            (Some(a), Some(p), Some(m)) => (a, p, m),
            _ => {
                log::warn!("line {}: too few columns ({})", line, record.len());
                return Outcome::Skipped(Skip::MissingColumn);
            }
        };

        let accession = match self.filter.accession(accession) {
            Ok(accession) => accession,
            Err(Rejection::Species) => return Outcome::Skipped(Skip::Species),
            Err(Rejection::Decoy(marker)) => {
                log::trace!("line {}: skipping decoy `{}`", line, marker);
                return Outcome::Skipped(Skip::Decoy);
            }
            Err(Rejection::MissingAccession) => {
                log::trace!("line {}: no accession in `{}`", line, accession);
                return Outcome::Skipped(Skip::MissingAccession);
            }
        };

        let protein = match self.fasta.get(accession) {
            Some(protein) => protein,
            None => {
                log::trace!("line {}: accession `{}` not in database", line, accession);
                return Outcome::Skipped(Skip::UnknownAccession);
            }
        };

        let result = Scan.map(protein, peptide);
        if !result.matched {
            log::trace!("line {}: `{}` not found in `{}`", line, peptide, accession);
            return Outcome::Skipped(Skip::NoMatch);
        }

        let mappings = result
            .positions
            .into_iter()
            .filter_map(|anchor| {
                match self.parameters.localization.locate(
                    modified,
                    peptide,
                    &self.vocabulary,
                    anchor,
                ) {
                    Ok(Localized::Unidentified) => {
                        log::warn!(
                            "line {}: no known modification in `{}`, skipping occurrence at {}",
                            line,
                            modified,
                            anchor
                        );
                        None
                    }
                    Ok(localized) => Some(Mapping { anchor, localized }),
                    Err(e) => {
                        log::warn!("line {}: cannot align `{}`: {}", line, modified, e);
                        None
                    }
                }
            })
            .collect();

        Outcome::Mapped(mappings)
    }

    pub fn read_rows(&self) -> anyhow::Result<Vec<StringRecord>> {
        let path = &self.parameters.input_path;
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .with_context(|| format!("Failed to open `{}`", path))?;

        rdr.records()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read `{}`", path))
    }

    pub fn run(&self) -> anyhow::Result<Summary> {
        let records = self.read_rows()?;

        // Rows are independent; `collect` keeps them in input order
        let rows = records
            .par_iter()
            .map(|record| Row {
                line: record.iter().collect::<Vec<_>>().join("\t"),
                outcome: self.process(record),
            })
            .collect::<Vec<_>>();

        let mut summary = Summary::tally(&rows);
        summary.written = self.write_rows(&rows)?;

        info!(
            "mapped {}/{} rows to {} occurrences in {:#?}",
            summary.mapped,
            summary.rows,
            summary.written,
            self.start.elapsed()
        );
        info!(
            "skipped: {} species, {} decoy, {} without accession, {} unknown accession, {} unmatched, {} malformed",
            summary.skipped_species,
            summary.skipped_decoy,
            summary.skipped_accession,
            summary.unknown_accession,
            summary.unmatched,
            summary.malformed
        );
        info!("Results are written to: {}", self.parameters.output_path);

        Ok(summary)
    }
}
