/// Locate every occurrence of a peptide within a protein sequence.
///
/// Implementations must return the same positions in the same order:
/// 1-based, ascending, with overlapping occurrences included
/// (e.g. `AA` in `AAAA` is found at `[1, 2, 3]`).
pub trait PositionMapper {
    fn find_occurrences(&self, protein: &str, peptide: &str) -> Vec<usize>;

    fn map(&self, protein: &str, peptide: &str) -> MatchResult {
        let positions = self.find_occurrences(protein, peptide);
        MatchResult {
            matched: !positions.is_empty(),
            positions,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// 1-based protein coordinates of the first residue of each occurrence
    pub positions: Vec<usize>,
    pub matched: bool,
}

#[derive(Copy, Clone, Debug, Default)]
/// Compare the peptide against every window of the protein
pub struct Naive;

impl PositionMapper for Naive {
    fn find_occurrences(&self, protein: &str, peptide: &str) -> Vec<usize> {
        let (protein, peptide) = (protein.as_bytes(), peptide.as_bytes());
        if peptide.is_empty() || peptide.len() > protein.len() {
            return Vec::new();
        }
        protein
            .windows(peptide.len())
            .enumerate()
            .filter(|(_, window)| *window == peptide)
            .map(|(n, _)| n + 1)
            .collect()
    }
}

#[derive(Copy, Clone, Debug, Default)]
/// Repeated substring search, restarting one character past each hit
pub struct Scan;

impl PositionMapper for Scan {
    fn find_occurrences(&self, protein: &str, peptide: &str) -> Vec<usize> {
        let mut positions = Vec::new();
        if peptide.is_empty() {
            return positions;
        }

        let mut start = 0;
        while let Some(ix) = protein[start..].find(peptide) {
            let n = start + ix;
            positions.push(n + 1);
            // Step over a single character so overlapping hits are found
            start = n + protein[n..].chars().next().map_or(1, char::len_utf8);
        }
        positions
    }
}
