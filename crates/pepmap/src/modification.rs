use std::{fmt::Display, str::FromStr};

use fnv::FnvHashSet;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
/// A recognized modification marker, always stored lower-case
pub struct ModificationToken(String);

impl ModificationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ModificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InvalidModification {
    Empty,
    MissingSeparator(String),
}

impl Display for InvalidModification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidModification::Empty => f.write_str("empty modification name"),
            InvalidModification::MissingSeparator(s) => {
                write!(f, "expected `key=value`, found `{}`", s)
            }
        }
    }
}

impl std::error::Error for InvalidModification {}

impl FromStr for ModificationToken {
    type Err = InvalidModification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InvalidModification::Empty);
        }
        Ok(ModificationToken(s.to_ascii_lowercase()))
    }
}

impl ModificationToken {
    /// Parse a `key=value` configuration cell, keeping the value
    pub fn from_cell(cell: &str) -> Result<Self, InvalidModification> {
        match cell.split('=').nth(1) {
            Some(value) => value.parse(),
            None => Err(InvalidModification::MissingSeparator(cell.into())),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// The set of recognized modification tokens.
///
/// Tokens keep the order in which they were first seen, which decides
/// which token wins when two of them match at the same offset.
pub struct Vocabulary {
    tokens: Vec<ModificationToken>,
}

impl Vocabulary {
    /// Parse a comma-delimited modification configuration. The first row is
    /// a header; each following row names a token in its first `key=value` field.
    pub fn parse(contents: &str) -> Result<Vocabulary, crate::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(contents.as_bytes());

        let mut tokens = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(crate::Error::Csv)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let token = ModificationToken::from_cell(record.get(0).unwrap_or_default())
                .map_err(|source| crate::Error::Modification { line, source })?;
            tokens.push(token);
        }
        Ok(Vocabulary::from_tokens(tokens))
    }

    pub fn from_tokens<I>(tokens: I) -> Vocabulary
    where
        I: IntoIterator<Item = ModificationToken>,
    {
        let mut seen = FnvHashSet::default();
        let tokens = tokens
            .into_iter()
            .filter(|token| seen.insert(token.clone()))
            .collect();
        Vocabulary { tokens }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModificationToken> {
        self.tokens.iter()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == token)
    }

    /// First token (in vocabulary order) that occurs at the start of `text`,
    /// compared case-insensitively
    pub fn token_at(&self, text: &[u8]) -> Option<&ModificationToken> {
        self.tokens.iter().find(|token| {
            text.len() >= token.len() && text[..token.len()].eq_ignore_ascii_case(token.as_bytes())
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_tokens() {
        use InvalidModification::*;
        assert_eq!(
            ModificationToken::from_cell("name=Ox"),
            Ok(ModificationToken("ox".into()))
        );
        assert_eq!(
            ModificationToken::from_cell("a=PH=b"),
            Ok(ModificationToken("ph".into()))
        );
        assert_eq!(ModificationToken::from_cell("name="), Err(Empty));
        assert_eq!(
            ModificationToken::from_cell("Oxidation"),
            Err(MissingSeparator("Oxidation".into()))
        );
    }

    #[test]
    fn parse_vocabulary() {
        let config = "Modification,Residues\nname=Ox,M\nname=ph,STY\nname=OX,W\n";
        let vocab = Vocabulary::parse(config).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(
            vocab.iter().map(ModificationToken::as_str).collect::<Vec<_>>(),
            vec!["ox", "ph"]
        );
        assert!(vocab.contains("ph"));
        assert!(!vocab.contains("OX"));
    }

    #[test]
    fn header_only_vocabulary_is_empty() {
        let vocab = Vocabulary::parse("Modification,Residues\n").unwrap();
        assert!(vocab.is_empty());
    }

    #[test]
    fn malformed_row_is_fatal() {
        let config = "Modification,Residues\nname=Ox,M\nOxidation,M\n";
        match Vocabulary::parse(config) {
            Err(crate::Error::Modification { line, source }) => {
                assert_eq!(line, 3);
                assert_eq!(source, InvalidModification::MissingSeparator("Oxidation".into()));
            }
            other => panic!("expected modification error, got {:?}", other),
        }
    }

    #[test]
    fn token_at_offset() {
        let vocab = Vocabulary::from_tokens(vec!["o".parse().unwrap(), "ox".parse().unwrap()]);
        assert_eq!(vocab.token_at(b"OXM").map(ModificationToken::as_str), Some("o"));
        assert_eq!(vocab.token_at(b"M"), None);
        assert_eq!(vocab.token_at(b""), None);
    }
}
