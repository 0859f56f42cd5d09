//! Translate modification markers embedded in an annotated peptide into
//! protein coordinates.
//!
//! An annotated peptide carries its modifications as vocabulary tokens
//! spliced into the residue string (`aAAoxGG`), so character offsets in the
//! annotated string are inflated by every token that precedes them.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::modification::{ModificationToken, Vocabulary};
use crate::peptidoform::{AlignmentError, Peptidoform};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModificationHit {
    pub token: ModificationToken,
    /// 1-based protein coordinate
    pub position: usize,
}

impl Display for ModificationHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}__{}", self.token, self.position)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Localized {
    /// Annotated and plain peptide have the same length
    Unmodified,
    /// Hits in ascending protein coordinate order
    Modified(Vec<ModificationHit>),
    /// The annotated peptide is longer than the plain one, but no
    /// vocabulary token could be found in it
    Unidentified,
}

impl Display for Localized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Localized::Unmodified => f.write_str("Unmodified"),
            Localized::Modified(hits) => {
                for (ix, hit) in hits.iter().enumerate() {
                    if ix > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", hit)?;
                }
                Ok(())
            }
            Localized::Unidentified => Ok(()),
        }
    }
}

/// Find every `(offset, token)` pair in the annotated peptide. Offsets are
/// byte offsets into the annotated string; only the first token (in
/// vocabulary order) found at a given offset is kept.
fn scan<'v>(annotated: &str, vocabulary: &'v Vocabulary) -> BTreeMap<usize, &'v ModificationToken> {
    let lowered = annotated.to_ascii_lowercase();
    let lowered = lowered.as_bytes();

    let mut found = BTreeMap::new();
    for token in vocabulary.iter() {
        if token.is_empty() || token.len() > lowered.len() {
            continue;
        }
        for n in 0..=lowered.len() - token.len() {
            if lowered[n..].starts_with(token.as_bytes()) {
                found.entry(n).or_insert(token);
            }
        }
    }
    found
}

/// Locate modifications using offset arithmetic on the annotated string.
///
/// The first hit lands at `anchor + offset`; every later hit is shifted back
/// by the summed length of the tokens before it. Characters that are not
/// vocabulary tokens are not subtracted, and a trailing token is placed past
/// the last residue.
pub fn locate(
    annotated: &str,
    vocabulary: &Vocabulary,
    anchor: usize,
    plain_len: usize,
) -> Localized {
    if annotated.len() == plain_len {
        return Localized::Unmodified;
    }

    let found = scan(annotated, vocabulary);
    if found.is_empty() {
        return Localized::Unidentified;
    }

    let mut inflation = 0;
    let mut hits: Vec<ModificationHit> = found
        .into_iter()
        .map(|(offset, token)| {
            let position = (anchor + offset).saturating_sub(inflation);
            inflation += token.len();
            ModificationHit {
                token: token.clone(),
                position,
            }
        })
        .collect();

    // Overlapping tokens can pull a later hit in front of an earlier one
    hits.sort_by_key(|hit| hit.position);
    Localized::Modified(hits)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Localization {
    /// Offset arithmetic on the raw annotated string, see [`locate`]
    #[default]
    Reference,
    /// Align the annotated string to the plain peptide and report the
    /// residue each token modifies, see [`Peptidoform`]
    Residue,
}

impl std::str::FromStr for Localization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reference" => Ok(Localization::Reference),
            "residue" => Ok(Localization::Residue),
            _ => Err(format!("unknown localization strategy `{}`", s)),
        }
    }
}

impl Localization {
    pub fn locate(
        &self,
        annotated: &str,
        plain: &str,
        vocabulary: &Vocabulary,
        anchor: usize,
    ) -> Result<Localized, AlignmentError> {
        match self {
            Localization::Reference => Ok(locate(annotated, vocabulary, anchor, plain.len())),
            Localization::Residue => {
                if annotated.len() == plain.len() {
                    return Ok(Localized::Unmodified);
                }
                let peptidoform = Peptidoform::parse(annotated, plain, vocabulary)?;
                let hits = peptidoform.hits(anchor);
                match hits.is_empty() {
                    true => Ok(Localized::Unidentified),
                    false => Ok(Localized::Modified(hits)),
                }
            }
        }
    }
}
