//! FASTA parser.
//!
//! Handles single-line and multi-line sequences for one gene file.
//!
//! ## FASTA Format
//!
//! ```text
//! >taxon_identifier optional description
//! ACGTACGTACGT...
//! >another_taxon
//! TGCATGCATGCA...
//! ```
//!
//! The taxon name is the first whitespace-delimited token after `>`.
//! Sequence lines are concatenated with whitespace and digits stripped, so
//! numbered sequence text pasted from other tools still parses. A repeated
//! header replaces the earlier record's sequence (last record wins).

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("no FASTA records found")]
    EmptyInput,

    #[error("empty taxon identifier at line {0}")]
    EmptyIdentifier(usize),

    #[error("sequence data without a preceding header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses FASTA content into per-taxon sequences in record order.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<Sequence>> {
    let mut sequences: Vec<Sequence> = Vec::new();
    let mut current_taxon: Option<String> = None;
    let mut current_seq = String::new();
    let mut line_number = 0;

    for line in content.lines() {
        line_number += 1;
        let line = line.trim();

        // Skip empty lines and comment lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(taxon) = current_taxon.take() {
                push_record(&mut sequences, taxon, std::mem::take(&mut current_seq));
            }

            // First whitespace-delimited token is the taxon name
            let taxon = header.split_whitespace().next().unwrap_or("");
            if taxon.is_empty() {
                return Err(FastaError::EmptyIdentifier(line_number));
            }

            current_taxon = Some(taxon.to_string());
        } else {
            if current_taxon.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }

            current_seq.extend(
                line.chars()
                    .filter(|c| !c.is_whitespace() && !c.is_ascii_digit()),
            );
        }
    }

    if let Some(taxon) = current_taxon {
        push_record(&mut sequences, taxon, current_seq);
    }

    if sequences.is_empty() {
        return Err(FastaError::EmptyInput);
    }

    Ok(sequences)
}

/// Appends a record, replacing any earlier record with the same taxon.
fn push_record(sequences: &mut Vec<Sequence>, taxon: String, data: String) {
    if data.is_empty() {
        return;
    }
    match sequences.iter_mut().find(|s| s.taxon == taxon) {
        Some(existing) => existing.data = data,
        None => sequences.push(Sequence::new(taxon, data)),
    }
}
