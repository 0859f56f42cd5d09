use crate::runner::{Mapping, Outcome, Row, Runner};
use anyhow::Context;

/// Prefix every tab, space, double quote and line break with a space.
///
/// Output fields are never quoted, so the escape character (a space) marks
/// characters that would otherwise be read as structure.
pub fn escape(field: &str) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(field.len());
    for &b in field.as_bytes() {
        if matches!(b, b'\t' | b' ' | b'"' | b'\r' | b'\n') {
            escaped.push(b' ');
        }
        escaped.push(b);
    }
    escaped
}

impl Runner {
    pub fn serialize_mapping(&self, line: &str, mapping: &Mapping) -> csv::ByteRecord {
        let mut record = csv::ByteRecord::new();
        record.push_field(&escape(line));
        record.push_field(itoa::Buffer::new().format(mapping.anchor).as_bytes());
        record.push_field(&escape(&mapping.localized.to_string()));
        record.push_field(&escape(&self.parameters.match_label));
        record
    }

    /// Serialize every mapped occurrence, in input order
    pub fn serialize_rows(&self, rows: &[Row]) -> anyhow::Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::CRLF)
            .from_writer(vec![]);

        for row in rows {
            if let Outcome::Mapped(mappings) = &row.outcome {
                for mapping in mappings {
                    wtr.write_byte_record(&self.serialize_mapping(&row.line, mapping))?;
                }
            }
        }

        wtr.flush()?;
        Ok(wtr.into_inner()?)
    }

    /// Write the output table, returning the number of rows written
    pub fn write_rows(&self, rows: &[Row]) -> anyhow::Result<usize> {
        let written: usize = rows
            .iter()
            .map(|row| match &row.outcome {
                Outcome::Mapped(mappings) => mappings.len(),
                Outcome::Skipped(_) => 0,
            })
            .sum();

        let bytes = self.serialize_rows(rows)?;
        std::fs::write(&self.parameters.output_path, bytes)
            .with_context(|| format!("Failed to write `{}`", self.parameters.output_path))?;
        Ok(written)
    }
}
