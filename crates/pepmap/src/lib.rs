pub mod fasta;
pub mod filter;
pub mod localize;
pub mod mapper;
pub mod modification;
pub mod peptidoform;

use std::path::Path;

use modification::InvalidModification;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Csv(csv::Error),
    /// Malformed row in a modification configuration file
    Modification {
        line: u64,
        source: InvalidModification,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => e.fmt(f),
            Self::Csv(e) => e.fmt(f),
            Self::Modification { line, source } => {
                write!(f, "invalid modification on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for Error {}

pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<fasta::Fasta, Error> {
    let contents = std::fs::read_to_string(path).map_err(Error::IO)?;
    Ok(fasta::Fasta::parse(&contents))
}

pub fn read_vocabulary<P: AsRef<Path>>(path: P) -> Result<modification::Vocabulary, Error> {
    let contents = std::fs::read_to_string(path).map_err(Error::IO)?;
    modification::Vocabulary::parse(&contents)
}
