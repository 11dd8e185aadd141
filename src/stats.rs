//! Statistics and partition metadata over a processed registry.
//!
//! Everything here is derived from the concatenated alignment and the gene
//! spans produced by [`crate::concat`]; nothing is cached across registry
//! mutations. Partition records target downstream phylogenetic software
//! (RAxML, IQ-TREE, MrBayes, PAUP*).

use crate::concat::{ConcatenatedAlignment, GeneSpan};
use crate::model::SequenceType;

/// Characters counted as missing data in statistics.
///
/// Reconciliation only ever writes `-`, but `?` in the source data counts
/// as missing too.
const MISSING_CHARS: &[char] = &['-', '?'];

/// One contiguous sub-range of the concatenated alignment covering a gene.
///
/// Positions are 1-based inclusive. Records are contiguous and
/// non-overlapping, and together cover `[1, total_length]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRecord {
    pub gene: String,
    pub start: usize,
    pub end: usize,
    pub seq_type: SequenceType,
}

impl PartitionRecord {
    /// Returns the number of columns covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns true if the record covers no columns.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// A codon-position sub-partition of a DNA gene.
///
/// Covers every third column starting at `start`, up to `end` (the
/// `start-end\3` charset convention).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonPartition {
    pub gene: String,
    /// Codon position, 1 to 3
    pub position: u8,
    pub start: usize,
    pub end: usize,
}

impl CodonPartition {
    /// Returns the charset label, e.g. `coi_pos2`.
    pub fn label(&self) -> String {
        format!("{}_pos{}", sanitize_label(&self.gene), self.position)
    }

    /// Returns the number of alignment columns this sub-partition covers.
    pub fn site_count(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) / 3 + 1
        }
    }
}

/// Counts of lossy length adjustments made to one gene during
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAdjustments {
    pub gene: String,
    /// Taxa right-padded with gaps to the reconciled width
    pub padded: usize,
    /// Taxa truncated to the reconciled width
    pub truncated: usize,
}

/// Read-only statistics snapshot over a concatenated alignment.
#[derive(Debug, Clone)]
pub struct AlignmentStats {
    pub taxon_count: usize,
    pub gene_count: usize,
    pub total_length: usize,
    /// Gap/missing character count per taxon, in alignment row order
    pub missing_per_taxon: Vec<(String, usize)>,
    /// Gap/missing character count per gene segment, across all taxa
    pub missing_per_gene: Vec<(String, usize)>,
    /// Reconciled length per gene, in registration order
    pub gene_lengths: Vec<(String, usize)>,
    /// Percentage of missing characters over the whole matrix, 0 to 100
    pub overall_missing_percent: f64,
    /// Per-gene padding/truncation counts from reconciliation
    pub adjustments: Vec<GeneAdjustments>,
}

/// Builds the gene-level partition records from the reconciliation spans.
pub fn build_partitions(spans: &[GeneSpan]) -> Vec<PartitionRecord> {
    spans
        .iter()
        .map(|span| PartitionRecord {
            gene: span.name.clone(),
            start: span.start,
            end: span.end,
            seq_type: span.seq_type,
        })
        .collect()
}

/// Builds codon-position sub-partitions for every DNA record of length 3
/// or more.
///
/// Each DNA gene yields three sub-partitions covering positions
/// `{start, start+3, ...}`, `{start+1, start+4, ...}`, `{start+2, ...}`
/// within the gene's range. Shorter or non-DNA records yield none.
pub fn codon_partitions(records: &[PartitionRecord]) -> Vec<CodonPartition> {
    let mut out = Vec::new();
    for record in records {
        if record.seq_type != SequenceType::Dna || record.len() < 3 {
            continue;
        }
        for position in 1..=3u8 {
            out.push(CodonPartition {
                gene: record.gene.clone(),
                position,
                start: record.start + (position as usize - 1),
                end: record.end,
            });
        }
    }
    out
}

/// Computes the statistics snapshot for an alignment and its spans.
pub fn compute_stats(alignment: &ConcatenatedAlignment, spans: &[GeneSpan]) -> AlignmentStats {
    let taxon_count = alignment.taxon_count();
    let total_length = alignment.total_length();

    let mut total_missing = 0usize;
    let mut missing_per_taxon = Vec::with_capacity(taxon_count);
    for row in &alignment.rows {
        let count = row.data.chars().filter(|c| MISSING_CHARS.contains(c)).count();
        total_missing += count;
        missing_per_taxon.push((row.taxon.clone(), count));
    }

    let mut missing_per_gene = Vec::with_capacity(spans.len());
    for span in spans {
        let count = alignment
            .rows
            .iter()
            .map(|row| {
                row.data[span.start - 1..span.end]
                    .chars()
                    .filter(|c| MISSING_CHARS.contains(c))
                    .count()
            })
            .sum();
        missing_per_gene.push((span.name.clone(), count));
    }

    let cells = taxon_count * total_length;
    let overall_missing_percent = if cells > 0 {
        total_missing as f64 / cells as f64 * 100.0
    } else {
        0.0
    };

    AlignmentStats {
        taxon_count,
        gene_count: spans.len(),
        total_length,
        missing_per_taxon,
        missing_per_gene,
        gene_lengths: spans.iter().map(|s| (s.name.clone(), s.len())).collect(),
        overall_missing_percent,
        adjustments: spans
            .iter()
            .map(|s| GeneAdjustments {
                gene: s.name.clone(),
                padded: s.padded,
                truncated: s.truncated,
            })
            .collect(),
    }
}

/// Replaces every run of non-alphanumeric characters with `_`, yielding a
/// name safe for charset labels.
pub fn sanitize_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out
}
