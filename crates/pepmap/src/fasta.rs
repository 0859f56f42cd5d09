use fnv::FnvHashMap;

/// Extract the accession from a UniProt-style identifier, e.g. `sp|P12345|NAME_HUMAN`
pub fn accession(id: &str) -> Option<&str> {
    id.split('|').nth(1).map(str::trim)
}

#[derive(Default, Debug, Clone)]
/// Reference protein sequences keyed by accession
pub struct Fasta {
    targets: FnvHashMap<String, String>,
}

impl Fasta {
    // Parse a string into a fasta database
    pub fn parse(contents: &str) -> Fasta {
        let mut fasta = Fasta::default();
        let mut last_id = "";
        let mut s = String::new();

        for line in contents.lines() {
            if line.is_empty() {
                continue;
            }
            let line = line.trim();
            if let Some(id) = line.strip_prefix('>') {
                if !s.is_empty() {
                    fasta.insert(last_id, std::mem::take(&mut s));
                }
                last_id = id;
            } else {
                s.push_str(line);
            }
        }

        if !s.is_empty() {
            fasta.insert(last_id, s);
        }

        fasta
    }

    fn insert(&mut self, header: &str, sequence: String) {
        let id = header.split_ascii_whitespace().next().unwrap_or_default();
        let acc = match accession(id) {
            Some(acc) => acc,
            None => {
                log::warn!("skipping fasta record without accession: `{}`", id);
                return;
            }
        };

        // The first record with a given accession wins
        if self.targets.contains_key(acc) {
            log::warn!("duplicate fasta accession `{}`, keeping first record", acc);
            return;
        }
        self.targets.insert(acc.to_string(), sequence);
    }

    /// Look up a protein sequence. The accession is trimmed, then matched exactly.
    pub fn get(&self, accession: &str) -> Option<&str> {
        self.targets.get(accession.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
