//! Properties of occurrence search and modification localization

use pepmap_core::fasta::Fasta;
use pepmap_core::localize::{locate, Localization, Localized};
use pepmap_core::mapper::{Naive, PositionMapper, Scan};
use pepmap_core::modification::Vocabulary;
use quickcheck_macros::quickcheck;

const FASTA: &str = r#"
>sp|P00001|TEST_HUMAN Test protein OS=Homo sapiens OX=9606
MKVLAAGGHK
>sp|P00004|PEP_HUMAN Phospho test protein OS=Homo sapiens OX=9606
MSTPEPTIDEK
"#;

/// Restrict arbitrary bytes to a small alphabet so that matches are common
fn residues(raw: &[u8]) -> String {
    raw.iter().map(|b| b"ACGT"[(*b % 4) as usize] as char).collect()
}

#[quickcheck]
fn occurrences_are_sound_and_complete(protein: Vec<u8>, peptide: Vec<u8>) -> bool {
    let protein = residues(&protein);
    let peptide = residues(&peptide[..peptide.len().min(4)]);

    let found = Scan.find_occurrences(&protein, &peptide);
    let expected = (0..protein.len())
        .filter(|&n| !peptide.is_empty() && protein[n..].starts_with(peptide.as_str()))
        .map(|n| n + 1)
        .collect::<Vec<_>>();

    found == expected
        && found
            .iter()
            .all(|pos| &protein[pos - 1..pos - 1 + peptide.len()] == peptide)
}

#[quickcheck]
fn mappers_agree(protein: Vec<u8>, peptide: Vec<u8>) -> bool {
    let protein = residues(&protein);
    let peptide = residues(&peptide[..peptide.len().min(3)]);
    Naive.find_occurrences(&protein, &peptide) == Scan.find_occurrences(&protein, &peptide)
}

#[quickcheck]
fn residue_hits_stay_within_peptide(plain: Vec<u8>, mods: Vec<usize>, anchor: usize) -> bool {
    let plain = residues(&plain);
    if plain.is_empty() {
        return true;
    }
    let anchor = anchor % 10_000 + 1;

    // Splice `ox` in front of arbitrary residues
    let mut annotated = String::new();
    for (ix, residue) in plain.chars().enumerate() {
        if mods.iter().any(|m| m % plain.len() == ix) {
            annotated.push_str("ox");
        }
        annotated.push(residue);
    }

    let vocabulary = Vocabulary::from_tokens(vec!["ox".parse().unwrap()]);
    match Localization::Residue.locate(&annotated, &plain, &vocabulary, anchor) {
        Ok(Localized::Modified(hits)) => hits
            .iter()
            .all(|hit| hit.position >= anchor && hit.position < anchor + plain.len()),
        Ok(Localized::Unmodified) => annotated == plain,
        _ => false,
    }
}

#[test]
fn all_overlapping_positions() {
    assert_eq!(Scan.find_occurrences("AAAA", "AA"), vec![1, 2, 3]);
    assert_eq!(Naive.find_occurrences("AAAA", "AA"), vec![1, 2, 3]);
}

#[test]
fn map_through_index() {
    let fasta = Fasta::parse(FASTA);
    let vocabulary = Vocabulary::from_tokens(vec!["ox".parse().unwrap(), "ph".parse().unwrap()]);

    let protein = fasta.get("P00001").unwrap();
    let result = Scan.map(protein, "AAGG");
    assert!(result.matched);
    assert_eq!(result.positions, vec![5]);
    assert_eq!(
        locate("aAAoxGG", &vocabulary, result.positions[0], 4).to_string(),
        "ox__8"
    );
    // An occurrence anchored at 4 puts the single token at 4 + 3
    assert_eq!(locate("aAAoxGG", &vocabulary, 4, 4).to_string(), "ox__7");

    let protein = fasta.get("P00004").unwrap();
    let result = Scan.map(protein, "STPEPT");
    assert_eq!(result.positions, vec![2]);
    assert_eq!(
        locate("phSTPEPphT", &vocabulary, 2, 6).to_string(),
        "ph__2,ph__7"
    );

    assert!(fasta.get("P99999").is_none());
}

#[test]
fn two_token_correction() {
    let vocabulary = Vocabulary::from_tokens(vec!["ox".parse().unwrap(), "ph".parse().unwrap()]);
    // second token at raw offset 6, first token is two characters long
    match locate("KoxMGGphS", &vocabulary, 20, 5) {
        Localized::Modified(hits) => {
            assert_eq!(hits[0].position, 20 + 1);
            assert_eq!(hits[1].position, 20 + 6 - 2);
        }
        other => panic!("expected hits, got {:?}", other),
    }
}

#[test]
fn unmodified_case_insensitive() {
    let vocabulary = Vocabulary::from_tokens(vec!["ox".parse().unwrap()]);
    assert_eq!(locate("aagg", &vocabulary, 4, 4), Localized::Unmodified);
    assert_eq!(locate("aagg", &vocabulary, 4, 4).to_string(), "Unmodified");
}
