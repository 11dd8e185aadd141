//! NEXUS parser.
//!
//! Extracts taxon/sequence pairs from the MATRIX command of a DATA or
//! CHARACTERS block.
//!
//! ## NEXUS Format
//!
//! ```text
//! #NEXUS
//! BEGIN DATA;
//!   DIMENSIONS NTAX=3 NCHAR=10;
//!   FORMAT DATATYPE=DNA GAP=- MISSING=?;
//!   MATRIX
//!     seq1 ACGTACGTAC
//!     seq2 TGCATGCATG
//!     seq3 AAAACCCCGG
//!   ;
//! END;
//! ```
//!
//! ## Relaxed Parsing
//!
//! - Case insensitive commands, flexible whitespace
//! - Quoted and unquoted taxon names
//! - `[...]` comments removed
//! - A repeated taxon name appends to its sequence, which also covers
//!   interleaved matrices by plain line concatenation
//!
//! `DIMENSIONS NTAX`/`NCHAR` are accepted but never trusted: observed
//! sequence lengths drive reconciliation downstream.

use thiserror::Error;

use crate::model::Sequence;

/// Errors that can occur during NEXUS parsing.
#[derive(Error, Debug)]
pub enum NexusError {
    #[error("not a NEXUS file (no #NEXUS header or DATA/CHARACTERS block)")]
    NotNexus,

    #[error("no MATRIX command found")]
    NoMatrix,

    #[error("MATRIX contains no taxon/sequence rows")]
    EmptyMatrix,
}

/// Result type for NEXUS operations.
pub type NexusResult<T> = Result<T, NexusError>;

/// Parses NEXUS content into per-taxon sequences in matrix order.
pub fn parse_nexus_str(content: &str) -> NexusResult<Vec<Sequence>> {
    if !has_nexus_signature(content) {
        return Err(NexusError::NotNexus);
    }

    let mut sequences: Vec<Sequence> = Vec::new();
    let mut in_matrix = false;
    let mut matrix_seen = false;

    for line in content.lines() {
        let line = strip_bracket_comments(line);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let lower = trimmed.to_lowercase();

        let row_text = if !in_matrix {
            if lower == "matrix" || lower.starts_with("matrix;") || lower.starts_with("matrix ") {
                in_matrix = true;
                matrix_seen = true;
                // Rows may start on the MATRIX line itself
                trimmed["matrix".len()..].trim_start_matches(';').trim()
            } else {
                continue;
            }
        } else {
            trimmed
        };

        // Matrix rows run until the terminating semicolon. END also closes
        // the block in files that drop the semicolon.
        if row_text.is_empty() {
            continue;
        }
        if row_text == ";" || lower.starts_with("end;") || lower.starts_with("endblock") {
            break;
        }

        let row = row_text.trim_end_matches(';');
        let done = row_text.ends_with(';');

        if let Some((taxon, data)) = split_matrix_row(row) {
            match sequences.iter_mut().find(|s| s.taxon == taxon) {
                Some(existing) => existing.data.push_str(&data),
                None => sequences.push(Sequence::new(taxon, data)),
            }
        }

        if done {
            break;
        }
    }

    if !matrix_seen {
        return Err(NexusError::NoMatrix);
    }

    sequences.retain(|s| !s.is_empty());
    if sequences.is_empty() {
        return Err(NexusError::EmptyMatrix);
    }

    Ok(sequences)
}

/// Checks the structural signature: a `#NEXUS` header, or a
/// DATA/CHARACTERS block for headerless fragments.
fn has_nexus_signature(content: &str) -> bool {
    let first = content.lines().find(|l| !l.trim().is_empty());
    if let Some(line) = first {
        if line.trim().to_uppercase().starts_with("#NEXUS") {
            return true;
        }
    }
    let lower = content.to_lowercase();
    lower.contains("begin data") || lower.contains("begin characters")
}

/// Splits a matrix row into its taxon name and whitespace-free sequence data.
///
/// The taxon is the first token; a leading single or double quote extends
/// the name to the matching close quote, so quoted names may contain
/// whitespace. The remainder of the line is the sequence.
fn split_matrix_row(row: &str) -> Option<(String, String)> {
    let row = row.trim_start();

    if let Some(quote) = row.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let rest = &row[1..];
        let close = rest.find(quote)?;
        let taxon = &rest[..close];
        if taxon.is_empty() {
            return None;
        }
        let data: String = rest[close + 1..].split_whitespace().collect();
        return Some((taxon.to_string(), data));
    }

    let mut parts = row.split_whitespace();
    let taxon = parts.next()?;
    let data: String = parts.collect();
    Some((taxon.to_string(), data))
}

/// Removes NEXUS comments (bracketed text) from a line.
fn strip_bracket_comments(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut depth = 0usize;

    for c in line.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }

    result
}
