//! Data model for the concatenation engine.
//!
//! This module contains the structures shared across the crate:
//! - Per-taxon sequences and the genes that group them
//! - The inferred sequence type reported for each gene
//!
//! Parsers produce `Vec<Sequence>` for a single gene; the registry wraps
//! them into `Gene` entries that the reconciliation engine consumes.

/// Represents a single taxon's sequence within one gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The taxon name (from a FASTA header, NEXUS matrix row, or GenBank
    /// ORGANISM field)
    pub taxon: String,
    /// The raw sequence data (nucleotides or amino acids)
    pub data: String,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(taxon: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            taxon: taxon.into(),
            data: data.into(),
        }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The inferred molecular type of a gene.
///
/// Inference is heuristic (see [`crate::typing`]); the classification is
/// reported, never treated as infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceType {
    Dna,
    Protein,
    #[default]
    Unknown,
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::Dna => write!(f, "DNA"),
            SequenceType::Protein => write!(f, "Protein"),
            SequenceType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One loaded gene: a named set of per-taxon sequences.
///
/// Created when a gene parses successfully. The inferred type and the
/// reconciled length start at their defaults and are filled in by
/// [`crate::registry::GeneRegistry::process`].
#[derive(Debug, Clone)]
pub struct Gene {
    /// Gene name, unique within a registry
    pub name: String,
    /// Per-taxon sequences in first-seen order
    sequences: Vec<Sequence>,
    /// Inferred molecular type, `Unknown` until the first processing run
    pub seq_type: SequenceType,
    /// Uniform per-gene length after reconciliation, 0 until processed
    pub reconciled_len: usize,
}

impl Gene {
    /// Creates a new gene with an unclassified type.
    pub fn new(name: impl Into<String>, sequences: Vec<Sequence>) -> Self {
        Self {
            name: name.into(),
            sequences,
            seq_type: SequenceType::Unknown,
            reconciled_len: 0,
        }
    }

    /// Returns the per-taxon sequences in first-seen order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Returns the number of taxa present in this gene.
    pub fn taxon_count(&self) -> usize {
        self.sequences.len()
    }

    /// Looks up the raw sequence for a taxon.
    pub fn sequence_for(&self, taxon: &str) -> Option<&str> {
        self.sequences
            .iter()
            .find(|s| s.taxon == taxon)
            .map(|s| s.data.as_str())
    }

    /// Returns the maximum raw sequence length observed among taxa.
    ///
    /// This is the reconciled width policy: longest wins, declared length
    /// fields in the source format are never consulted.
    pub fn max_sequence_length(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).max().unwrap_or(0)
    }
}
