//! GenBank flat-file parser.
//!
//! Extracts one sequence per record from the ORIGIN block, keyed by the
//! record's organism.
//!
//! ## GenBank Format
//!
//! ```text
//! LOCUS       AB012345     1203 bp    DNA     linear   VRT 01-JAN-2020
//! DEFINITION  Example record.
//!   ORGANISM  Homo sapiens
//! ORIGIN
//!         1 acgtacgtac gtacgtacgt
//!        21 acgtacgt
//! //
//! ```
//!
//! Taxon naming falls back in order: `ORGANISM` line, `LOCUS` accession
//! token, caller-provided base name. Files holding several records
//! (separated by `//`) yield one sequence each. The `LOCUS` length field is
//! ignored; only the ORIGIN block's characters count.

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during GenBank parsing.
#[derive(Error, Debug)]
pub enum GenBankError {
    #[error("not a GenBank file (no LOCUS or ORIGIN marker)")]
    NotGenBank,

    #[error("no record with sequence data in ORIGIN block")]
    EmptyInput,
}

/// Result type for GenBank operations.
pub type GenBankResult<T> = Result<T, GenBankError>;

/// State for the record currently being read.
#[derive(Default)]
struct Record {
    organism: Option<String>,
    accession: Option<String>,
    in_origin: bool,
    seq: String,
}

impl Record {
    /// Finalizes the record into a sequence, naming it by organism,
    /// accession, or the base name in that order.
    fn finish(self, base_name: &str, index: usize) -> Option<Sequence> {
        if self.seq.is_empty() {
            return None;
        }
        let taxon = self
            .organism
            .or(self.accession)
            .unwrap_or_else(|| match index {
                0 => base_name.to_string(),
                _ => format!("{}_{}", base_name, index + 1),
            });
        Some(Sequence::new(taxon, self.seq))
    }
}

/// Parses GenBank content into per-record sequences.
///
/// `base_name` names records that carry neither an ORGANISM nor a LOCUS
/// line, typically the gene name derived from the file stem.
pub fn parse_genbank_str(content: &str, base_name: &str) -> GenBankResult<Vec<Sequence>> {
    if !has_genbank_signature(content) {
        return Err(GenBankError::NotGenBank);
    }

    let mut sequences: Vec<Sequence> = Vec::new();
    let mut record = Record::default();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Record separator
        if trimmed == "//" {
            let done = std::mem::take(&mut record);
            if let Some(seq) = done.finish(base_name, sequences.len()) {
                sequences.push(seq);
            }
            continue;
        }

        let upper = trimmed.to_uppercase();

        if upper.starts_with("LOCUS") {
            record.accession = trimmed.split_whitespace().nth(1).map(str::to_string);
            record.in_origin = false;
            continue;
        }

        if upper.starts_with("ORGANISM") {
            let name = trimmed["ORGANISM".len()..].trim().trim_end_matches('.');
            if !name.is_empty() {
                // Underscore-join so the taxon survives whitespace-splitting
                // parsers and FASTA headers downstream
                record.organism = Some(name.split_whitespace().collect::<Vec<_>>().join("_"));
            }
            record.in_origin = false;
            continue;
        }

        if upper == "ORIGIN" || upper.starts_with("ORIGIN ") {
            record.in_origin = true;
            record.seq.clear();
            continue;
        }

        if record.in_origin {
            // Strip the leading position number and all whitespace
            record.seq.extend(
                trimmed
                    .split_whitespace()
                    .skip_while(|tok| tok.chars().all(|c| c.is_ascii_digit()))
                    .flat_map(|tok| tok.chars()),
            );
        }
    }

    // Trailing record without a closing separator
    if let Some(seq) = record.finish(base_name, sequences.len()) {
        sequences.push(seq);
    }

    if sequences.is_empty() {
        return Err(GenBankError::EmptyInput);
    }

    Ok(sequences)
}

/// Checks the structural signature: a LOCUS header or an ORIGIN line.
pub fn has_genbank_signature(content: &str) -> bool {
    for line in content.lines() {
        let upper = line.trim().to_uppercase();
        if upper.starts_with("LOCUS ") {
            return true;
        }
        if upper == "ORIGIN" || upper.starts_with("ORIGIN ") {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = "\
LOCUS       AB012345     20 bp    DNA     linear   VRT 01-JAN-2020
DEFINITION  Example record.
  ORGANISM  Homo sapiens
ORIGIN
        1 acgtacgtac gtacgtacgt
//
";

    #[test]
    fn test_parse_single_record() {
        let records = parse_genbank_str(SINGLE, "coi").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taxon, "Homo_sapiens");
        assert_eq!(records[0].data, "acgtacgtacgtacgtacgt");
    }

    #[test]
    fn test_parse_multi_record() {
        let content = "\
LOCUS       AB1     8 bp    DNA
  ORGANISM  Homo sapiens
ORIGIN
        1 acgtacgt
//
LOCUS       AB2     4 bp    DNA
  ORGANISM  Mus musculus
ORIGIN
        1 ttaa
//
";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].taxon, "Homo_sapiens");
        assert_eq!(records[1].taxon, "Mus_musculus");
        assert_eq!(records[1].data, "ttaa");
    }

    #[test]
    fn test_accession_fallback() {
        let content = "LOCUS       AB012345     8 bp\nORIGIN\n        1 acgtacgt\n//\n";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records[0].taxon, "AB012345");
    }

    #[test]
    fn test_base_name_fallback() {
        let content = "ORIGIN\n        1 acgtacgt\n//\n";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records[0].taxon, "coi");
    }

    #[test]
    fn test_missing_trailing_separator() {
        let content = "LOCUS X1 4 bp\n  ORGANISM  Danio rerio\nORIGIN\n        1 acgt\n";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taxon, "Danio_rerio");
        assert_eq!(records[0].data, "acgt");
    }

    #[test]
    fn test_organism_trailing_period_stripped() {
        let content = "  ORGANISM  Homo sapiens.\nORIGIN\n        1 acgt\n//\n";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records[0].taxon, "Homo_sapiens");
    }

    #[test]
    fn test_not_genbank() {
        assert!(matches!(
            parse_genbank_str(">seq1\nACGT\n", "coi"),
            Err(GenBankError::NotGenBank)
        ));
    }

    #[test]
    fn test_record_without_sequence_skipped() {
        let content = "\
LOCUS       AB1     0 bp
  ORGANISM  Homo sapiens
//
LOCUS       AB2     4 bp
  ORGANISM  Mus musculus
ORIGIN
        1 ttaa
//
";
        let records = parse_genbank_str(content, "coi").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taxon, "Mus_musculus");
    }

    #[test]
    fn test_all_records_empty() {
        let content = "LOCUS AB1 0 bp\n//\n";
        assert!(matches!(
            parse_genbank_str(content, "coi"),
            Err(GenBankError::EmptyInput)
        ));
    }
}
