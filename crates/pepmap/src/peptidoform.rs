use std::fmt::Display;

use crate::localize::ModificationHit;
use crate::modification::{ModificationToken, Vocabulary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub residue: u8,
    pub modifications: Vec<ModificationToken>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A peptide as a sequence of residues, each carrying zero or more
/// modification tokens
pub struct Peptidoform {
    pub sites: Vec<Site>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlignmentError {
    /// Only `matched` residues of the plain peptide were found in the annotated string
    Unaligned { matched: usize, expected: usize },
}

impl Display for AlignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentError::Unaligned { matched, expected } => write!(
                f,
                "annotated peptide covers {} of {} residues",
                matched, expected
            ),
        }
    }
}

impl std::error::Error for AlignmentError {}

impl Peptidoform {
    /// Parse an annotated peptide by aligning it against its plain sequence.
    ///
    /// At each position an exact match of the next plain residue is consumed
    /// first, then a vocabulary token (case-insensitive), which modifies the
    /// residue that follows it. Anything else is skipped. Tokens left over at
    /// the end modify the last residue.
    pub fn parse(
        annotated: &str,
        plain: &str,
        vocabulary: &Vocabulary,
    ) -> Result<Peptidoform, AlignmentError> {
        let annotated = annotated.as_bytes();
        let plain = plain.as_bytes();

        let mut sites = Vec::with_capacity(plain.len());
        let mut pending = Vec::new();
        let mut i = 0;

        while i < annotated.len() {
            if let Some(&residue) = plain.get(sites.len()) {
                if annotated[i] == residue {
                    sites.push(Site {
                        residue,
                        modifications: std::mem::take(&mut pending),
                    });
                    i += 1;
                    continue;
                }
            }
            match vocabulary.token_at(&annotated[i..]) {
                Some(token) => {
                    pending.push(token.clone());
                    i += token.len();
                }
                None => i += 1,
            }
        }

        if sites.len() != plain.len() {
            return Err(AlignmentError::Unaligned {
                matched: sites.len(),
                expected: plain.len(),
            });
        }

        if let Some(last) = sites.last_mut() {
            last.modifications.append(&mut pending);
        }

        Ok(Peptidoform { sites })
    }

    pub fn sequence(&self) -> String {
        self.sites.iter().map(|site| site.residue as char).collect()
    }

    pub fn is_modified(&self) -> bool {
        self.sites.iter().any(|site| !site.modifications.is_empty())
    }

    /// Modification hits for an occurrence starting at `anchor`
    pub fn hits(&self, anchor: usize) -> Vec<ModificationHit> {
        self.sites
            .iter()
            .enumerate()
            .flat_map(|(ix, site)| {
                site.modifications.iter().map(move |token| ModificationHit {
                    token: token.clone(),
                    position: anchor + ix,
                })
            })
            .collect()
    }
}

impl Display for Peptidoform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for site in &self.sites {
            write!(f, "{}", site.residue as char)?;
            for token in &site.modifications {
                write!(f, "[{}]", token)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vocab(tokens: &[&str]) -> Vocabulary {
        Vocabulary::from_tokens(tokens.iter().map(|t| t.parse().unwrap()))
    }

    #[test]
    fn parse_inline_tokens() {
        let v = vocab(&["ox", "ph"]);
        let p = Peptidoform::parse("phSTPEPphT", "STPEPT", &v).unwrap();
        assert_eq!(p.to_string(), "S[ph]TPEPT[ph]");
        assert_eq!(p.sequence(), "STPEPT");
        assert!(p.is_modified());

        let hits = p.hits(2);
        assert_eq!(
            hits.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["ph__2", "ph__7"]
        );
    }

    #[test]
    fn unrecognized_characters_are_skipped() {
        let v = vocab(&["ox"]);
        let p = Peptidoform::parse("aAAoxGG", "AAGG", &v).unwrap();
        assert_eq!(p.to_string(), "AAG[ox]G");
        assert_eq!(p.hits(4)[0].position, 6);
    }

    #[test]
    fn residues_take_precedence_over_tokens() {
        // `M` is also the start of the token `me`
        let v = vocab(&["me"]);
        let p = Peptidoform::parse("MmeK", "MK", &v).unwrap();
        assert_eq!(p.to_string(), "MK[me]");
    }

    #[test]
    fn trailing_tokens_modify_last_residue() {
        let v = vocab(&["am"]);
        let p = Peptidoform::parse("PEPTIDEam", "PEPTIDE", &v).unwrap();
        assert_eq!(p.to_string(), "PEPTIDE[am]");
        assert_eq!(p.hits(1)[0].position, 7);
    }

    #[test]
    fn unmodified() {
        let v = vocab(&["ox"]);
        let p = Peptidoform::parse("PEPTIDE", "PEPTIDE", &v).unwrap();
        assert!(!p.is_modified());
        assert!(p.hits(1).is_empty());
    }

    #[test]
    fn misaligned_peptide() {
        let v = vocab(&["ox"]);
        assert_eq!(
            Peptidoform::parse("PEPoxT", "PEPTIDE", &v),
            Err(AlignmentError::Unaligned {
                matched: 4,
                expected: 7
            })
        );
    }
}
