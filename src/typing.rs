//! Heuristic DNA/Protein classification.
//!
//! A gene is classified from the character composition of its raw
//! sequences, before any reconciliation. The result is best-effort: it is
//! reported alongside partitions, never enforced.

use crate::model::{Gene, SequenceType};

/// Characters counted as nucleotides (uppercased before the check).
const NUCLEOTIDE_CHARS: &[char] = &['A', 'C', 'G', 'T', 'U', 'N'];

/// Placeholder characters excluded from classification.
const PLACEHOLDER_CHARS: &[char] = &['-', '?', '.'];

/// Configuration for sequence-type inference.
///
/// The threshold is the minimum fraction of nucleotide characters required
/// to classify a gene as DNA. 0.9 tolerates the occasional ambiguity code
/// in otherwise clean nucleotide data.
#[derive(Debug, Clone, Copy)]
pub struct TypeInference {
    /// Minimum nucleotide-character fraction for a DNA call, in `0.0..=1.0`
    pub dna_threshold: f64,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self { dna_threshold: 0.9 }
    }
}

impl TypeInference {
    /// Creates an inference configuration with a custom threshold.
    pub fn with_threshold(dna_threshold: f64) -> Self {
        Self { dna_threshold }
    }

    /// Classifies a gene from the union of its raw characters across all
    /// taxa.
    ///
    /// Gap and ambiguity placeholders are skipped. A gene with no scorable
    /// characters stays `Unknown`.
    pub fn infer(&self, gene: &Gene) -> SequenceType {
        let mut total = 0usize;
        let mut nucleotide = 0usize;

        for seq in gene.sequences() {
            for c in seq.data.chars() {
                if c.is_whitespace() || PLACEHOLDER_CHARS.contains(&c) {
                    continue;
                }
                total += 1;
                if NUCLEOTIDE_CHARS.contains(&c.to_ascii_uppercase()) {
                    nucleotide += 1;
                }
            }
        }

        if total == 0 {
            return SequenceType::Unknown;
        }

        if nucleotide as f64 / total as f64 >= self.dna_threshold {
            SequenceType::Dna
        } else {
            SequenceType::Protein
        }
    }
}
