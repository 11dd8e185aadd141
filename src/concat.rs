//! The reconciliation engine.
//!
//! Given the registered genes, this module computes the global taxon set,
//! reconciles every gene to a fixed per-gene width, and joins the per-gene
//! segments into one concatenated alignment.
//!
//! Reconciliation policy per gene, in registration order:
//! 1. Width = maximum raw sequence length observed among the gene's taxa.
//! 2. Shorter sequences are padded on the right with `-`; longer ones are
//!    truncated from the right. Both are counted per gene so the caller can
//!    spot malformed input through the statistics snapshot.
//! 3. Taxa absent from a gene get an all-gap segment of the gene's width.
//!
//! The raw sequences stored in the registry are never rewritten, so
//! repeated processing of an unchanged registry yields identical output.

use thiserror::Error;

use crate::model::{Gene, Sequence, SequenceType};

/// The gap character used for padding and absent taxa.
pub const GAP: char = '-';

/// Errors that can occur while processing a registry.
#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("no genes registered")]
    EmptyRegistry,

    #[error("no taxa found in any registered gene")]
    EmptyTaxonSet,
}

/// Result type for processing operations.
pub type ConcatResult<T> = Result<T, ConcatError>;

/// The concatenated multi-gene alignment: one row per taxon, every row the
/// same length.
///
/// A value snapshot with no reference back to the registry; it stays valid
/// across later registry mutation.
#[derive(Debug, Clone)]
pub struct ConcatenatedAlignment {
    /// Rows in taxon-universe order (first-seen across genes)
    pub rows: Vec<Sequence>,
    total_length: usize,
}

impl ConcatenatedAlignment {
    /// Returns the number of taxa.
    pub fn taxon_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the uniform row length.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Looks up a taxon's concatenated sequence.
    pub fn get(&self, taxon: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|s| s.taxon == taxon)
            .map(|s| s.data.as_str())
    }

    /// Returns the taxon names in row order.
    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|s| s.taxon.as_str())
    }
}

/// Where one gene's segment landed in the alignment, plus the length
/// adjustments made to get it there.
#[derive(Debug, Clone)]
pub struct GeneSpan {
    pub name: String,
    /// 1-based inclusive start column
    pub start: usize,
    /// 1-based inclusive end column
    pub end: usize,
    pub seq_type: SequenceType,
    /// Number of taxa right-padded to the reconciled width
    pub padded: usize,
    /// Number of taxa truncated to the reconciled width
    pub truncated: usize,
}

impl GeneSpan {
    /// Returns the segment width in columns.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns true if the span covers no columns.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Computes the taxon universe: unique taxa in first-seen order across
/// genes in registration order.
pub fn taxon_universe(genes: &[Gene]) -> Vec<String> {
    let mut taxa: Vec<String> = Vec::new();
    for gene in genes {
        for seq in gene.sequences() {
            if !taxa.iter().any(|t| t == &seq.taxon) {
                taxa.push(seq.taxon.clone());
            }
        }
    }
    taxa
}

/// Reconciles and concatenates the given genes.
///
/// Genes must already carry their reconciled length (the registry sets it
/// from [`Gene::max_sequence_length`] before calling here). A gene with
/// width zero contributes no columns and no span.
pub fn concatenate(genes: &[Gene]) -> ConcatResult<(ConcatenatedAlignment, Vec<GeneSpan>)> {
    if genes.is_empty() {
        return Err(ConcatError::EmptyRegistry);
    }

    let taxa = taxon_universe(genes);
    if taxa.is_empty() {
        return Err(ConcatError::EmptyTaxonSet);
    }

    let total: usize = genes.iter().map(|g| g.reconciled_len).sum();
    let mut rows: Vec<Sequence> = taxa
        .into_iter()
        .map(|t| Sequence::new(t, String::with_capacity(total)))
        .collect();
    let mut spans = Vec::with_capacity(genes.len());
    let mut position = 1usize;

    for gene in genes {
        let width = gene.reconciled_len;
        if width == 0 {
            continue;
        }

        let mut padded = 0usize;
        let mut truncated = 0usize;

        for row in &mut rows {
            match gene.sequence_for(&row.taxon) {
                Some(raw) if raw.len() < width => {
                    row.data.push_str(raw);
                    extend_gaps(&mut row.data, width - raw.len());
                    padded += 1;
                }
                Some(raw) if raw.len() > width => {
                    row.data.push_str(&raw[..width]);
                    truncated += 1;
                }
                Some(raw) => row.data.push_str(raw),
                None => extend_gaps(&mut row.data, width),
            }
        }

        spans.push(GeneSpan {
            name: gene.name.clone(),
            start: position,
            end: position + width - 1,
            seq_type: gene.seq_type,
            padded,
            truncated,
        });
        position += width;
    }

    let alignment = ConcatenatedAlignment {
        rows,
        total_length: position - 1,
    };
    Ok((alignment, spans))
}

fn extend_gaps(data: &mut String, count: usize) {
    data.extend(std::iter::repeat(GAP).take(count));
}
