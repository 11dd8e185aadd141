//! Text renderers for processed results.
//!
//! Pure string producers over the value snapshots from [`crate::concat`]
//! and [`crate::stats`]; writing to disk is the caller's concern. Two
//! partition conventions are supported: a PAUP*-style charset/link block
//! and a MrBayes block with `partition` commands.

use std::fmt::Write;

use crate::concat::ConcatenatedAlignment;
use crate::model::SequenceType;
use crate::stats::{codon_partitions, sanitize_label, AlignmentStats, PartitionRecord};

/// Line width used for sequence wrapping in exported files.
pub const WRAP_WIDTH: usize = 60;

/// Partition block output convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStyle {
    /// `BEGIN PAUP;` block with charsets and link lines
    Paup,
    /// `BEGIN mrbayes;` block with charsets and partition commands
    MrBayes,
}

/// Renders the alignment as FASTA text, one record per taxon in row order.
///
/// `line_width` wraps sequence lines at a fixed width; `None` writes each
/// sequence on a single line.
pub fn render_fasta(alignment: &ConcatenatedAlignment, line_width: Option<usize>) -> String {
    let mut out = String::new();
    for row in &alignment.rows {
        out.push('>');
        out.push_str(&row.taxon);
        out.push('\n');
        match line_width {
            Some(width) if width > 0 => {
                for chunk in wrap(&row.data, width) {
                    out.push_str(chunk);
                    out.push('\n');
                }
            }
            _ => {
                out.push_str(&row.data);
                out.push('\n');
            }
        }
    }
    out
}

/// Renders a partition block in the requested style.
pub fn render_partition_block(records: &[PartitionRecord], style: PartitionStyle) -> String {
    match style {
        PartitionStyle::Paup => render_paup_block(records),
        PartitionStyle::MrBayes => render_mrbayes_block(records),
    }
}

fn render_paup_block(records: &[PartitionRecord]) -> String {
    let codons = codon_partitions(records);
    let mut out = String::new();

    out.push_str("BEGIN PAUP;\n");
    out.push_str("  [ Charsets for gene partitions ]\n");
    for record in records {
        let _ = writeln!(
            out,
            "  charset {} = {}-{};",
            sanitize_label(&record.gene),
            record.start,
            record.end
        );
    }

    if !codons.is_empty() {
        out.push_str("\n  [ Charsets for codon positions (DNA genes only) ]\n");
        for sub in &codons {
            let _ = writeln!(
                out,
                "  charset {} = {}-{}\\3;",
                sub.label(),
                sub.start,
                sub.end
            );
        }
    }

    out.push_str("\n  [ Link block (gene level) ]\n");
    let links: Vec<String> = records
        .iter()
        .map(|r| format!("{} : {}-{}", sanitize_label(&r.gene), r.start, r.end))
        .collect();
    let _ = writeln!(out, "  link characters = {};", links.join(", "));

    if !codons.is_empty() {
        out.push_str("\n  [ Link block (by codon position, DNA genes only) ]\n");
        let mut codon_links: Vec<String> = Vec::with_capacity(codons.len());
        for position in 1..=3u8 {
            for sub in codons.iter().filter(|s| s.position == position) {
                codon_links.push(format!("{} : {}-{}\\3", sub.label(), sub.start, sub.end));
            }
        }
        let _ = writeln!(out, "  link characters = {};", codon_links.join(", "));
    }

    out.push_str("END; [PAUP]\n");
    out
}

fn render_mrbayes_block(records: &[PartitionRecord]) -> String {
    let codons = codon_partitions(records);
    let mut out = String::new();

    out.push_str("BEGIN mrbayes;\n");
    for record in records {
        let _ = writeln!(
            out,
            "  charset {} = {}-{};",
            sanitize_label(&record.gene),
            record.start,
            record.end
        );
    }
    for sub in &codons {
        let _ = writeln!(
            out,
            "  charset {} = {}-{}\\3;",
            sub.label(),
            sub.start,
            sub.end
        );
    }

    let gene_labels: Vec<String> = records.iter().map(|r| sanitize_label(&r.gene)).collect();
    if !gene_labels.is_empty() {
        let _ = writeln!(
            out,
            "\n  partition by_gene = {}: {};",
            gene_labels.len(),
            gene_labels.join(" ")
        );
    }

    if !codons.is_empty() {
        let groups: Vec<String> = (1..=3u8)
            .map(|position| {
                codons
                    .iter()
                    .filter(|s| s.position == position)
                    .map(|s| s.label())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let _ = writeln!(out, "  partition by_codon_pos = 3: {};", groups.join(", "));
    }

    if !gene_labels.is_empty() {
        out.push_str("\n  set partition = by_gene;\n");
    }

    out.push_str("END;\n");
    out
}

/// Renders a complete NEXUS document: TAXA block, DATA block with the full
/// matrix, and both partition blocks.
pub fn render_full_nexus(
    alignment: &ConcatenatedAlignment,
    records: &[PartitionRecord],
) -> String {
    let mut out = String::new();
    out.push_str("#NEXUS\n\n");

    // TAXA block
    out.push_str("BEGIN TAXA;\n");
    let _ = writeln!(out, "  DIMENSIONS NTAX={};", alignment.taxon_count());
    out.push_str("  TAXLABELS\n");
    for taxon in alignment.taxa() {
        let _ = writeln!(out, "    {}", quote_taxon(taxon));
    }
    out.push_str("  ;\nEND;\n\n");

    // DATA block
    out.push_str("BEGIN DATA;\n");
    let _ = writeln!(
        out,
        "  DIMENSIONS NTAX={} NCHAR={};",
        alignment.taxon_count(),
        alignment.total_length()
    );
    let _ = writeln!(
        out,
        "  FORMAT DATATYPE={} MISSING=- GAP=- INTERLEAVE=NO;",
        matrix_datatype(records)
    );
    if is_mixed(records) {
        out.push_str("  [ WARNING: Mixed DNA/Protein data, DATATYPE=DNA may be unsuitable. ]\n");
    }
    // One row per taxon keeps the matrix readable by line-based parsers
    out.push_str("  MATRIX\n");
    for row in &alignment.rows {
        let _ = writeln!(out, "  {} {}", quote_taxon(&row.taxon), row.data);
    }
    out.push_str("  ;\nEND;\n\n");

    out.push_str(&render_paup_block(records));
    out.push('\n');
    out.push_str(&render_mrbayes_block(records));
    out
}

/// Renders the statistics snapshot as a plain-text report.
pub fn render_statistics(stats: &AlignmentStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Number of taxa: {}", stats.taxon_count);
    let _ = writeln!(out, "Number of genes: {}", stats.gene_count);
    let _ = writeln!(out, "Total length: {}", stats.total_length);
    let _ = writeln!(
        out,
        "Overall missing data: {:.2}%",
        stats.overall_missing_percent
    );

    out.push_str("Missing data per taxon:\n");
    for (taxon, count) in &stats.missing_per_taxon {
        let _ = writeln!(out, "  {}: {}", taxon, count);
    }

    out.push_str("Gene lengths:\n");
    for ((gene, length), (_, missing)) in stats.gene_lengths.iter().zip(&stats.missing_per_gene) {
        let _ = writeln!(out, "  {}: {} ({} missing)", gene, length, missing);
    }

    let adjusted: Vec<_> = stats
        .adjustments
        .iter()
        .filter(|a| a.padded > 0 || a.truncated > 0)
        .collect();
    if !adjusted.is_empty() {
        out.push_str("Length adjustments during reconciliation:\n");
        for adj in adjusted {
            let _ = writeln!(
                out,
                "  {}: {} taxa padded, {} truncated",
                adj.gene, adj.padded, adj.truncated
            );
        }
    }

    out
}

/// Splits a sequence into fixed-width chunks.
fn wrap(data: &str, width: usize) -> impl Iterator<Item = &str> {
    data.as_bytes()
        .chunks(width.max(1))
        // Sequence data is ASCII; chunk boundaries cannot split characters
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
}

/// Quotes a taxon label when it contains characters NEXUS readers treat as
/// delimiters.
fn quote_taxon(taxon: &str) -> String {
    let needs_quoting = taxon
        .chars()
        .any(|c| c.is_whitespace() || "'\"`=;:,[]()".contains(c));
    if needs_quoting {
        format!("'{}'", taxon.replace('\'', "''"))
    } else {
        taxon.to_string()
    }
}

fn matrix_datatype(records: &[PartitionRecord]) -> &'static str {
    let has_dna = records.iter().any(|r| r.seq_type == SequenceType::Dna);
    let has_protein = records.iter().any(|r| r.seq_type == SequenceType::Protein);
    if has_protein && !has_dna {
        "Protein"
    } else {
        "DNA"
    }
}

fn is_mixed(records: &[PartitionRecord]) -> bool {
    records.iter().any(|r| r.seq_type == SequenceType::Dna)
        && records.iter().any(|r| r.seq_type == SequenceType::Protein)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concat::concatenate;
    use crate::formats::fasta::parse_fasta_str;
    use crate::model::{Gene, Sequence};

    fn fixture() -> (ConcatenatedAlignment, Vec<PartitionRecord>) {
        let mut gene_a = Gene::new("geneA", vec![
            Sequence::new("X", "ACGT"),
            Sequence::new("Y", "AC"),
        ]);
        gene_a.seq_type = SequenceType::Dna;
        gene_a.reconciled_len = 4;
        let mut gene_b = Gene::new("geneB", vec![
            Sequence::new("Y", "GGGG"),
            Sequence::new("Z", "TTTT"),
        ]);
        gene_b.seq_type = SequenceType::Dna;
        gene_b.reconciled_len = 4;

        let (alignment, spans) = concatenate(&[gene_a, gene_b]).unwrap();
        let records = crate::stats::build_partitions(&spans);
        (alignment, records)
    }

    #[test]
    fn test_render_fasta_unwrapped() {
        let (alignment, _) = fixture();
        let text = render_fasta(&alignment, None);
        assert_eq!(text, ">X\nACGT----\n>Y\nAC--GGGG\n>Z\n----TTTT\n");
    }

    #[test]
    fn test_render_fasta_wrapped() {
        let (alignment, _) = fixture();
        let text = render_fasta(&alignment, Some(3));
        assert!(text.starts_with(">X\nACG\nT--\n--\n"));
    }

    #[test]
    fn test_fasta_round_trip() {
        let (alignment, _) = fixture();
        let text = render_fasta(&alignment, Some(WRAP_WIDTH));
        let reparsed = parse_fasta_str(&text).unwrap();

        assert_eq!(reparsed.len(), alignment.taxon_count());
        for seq in &reparsed {
            assert_eq!(Some(seq.data.as_str()), alignment.get(&seq.taxon));
        }
    }

    #[test]
    fn test_paup_block() {
        let (_, records) = fixture();
        let text = render_partition_block(&records, PartitionStyle::Paup);

        assert!(text.starts_with("BEGIN PAUP;\n"));
        assert!(text.contains("  charset geneA = 1-4;\n"));
        assert!(text.contains("  charset geneB = 5-8;\n"));
        assert!(text.contains("  charset geneA_pos1 = 1-4\\3;\n"));
        assert!(text.contains("  charset geneB_pos3 = 7-8\\3;\n"));
        assert!(text.contains("link characters = geneA : 1-4, geneB : 5-8;"));
        assert!(text.ends_with("END; [PAUP]\n"));
    }

    #[test]
    fn test_mrbayes_block() {
        let (_, records) = fixture();
        let text = render_partition_block(&records, PartitionStyle::MrBayes);

        assert!(text.starts_with("BEGIN mrbayes;\n"));
        assert!(text.contains("  partition by_gene = 2: geneA geneB;\n"));
        assert!(text.contains(
            "  partition by_codon_pos = 3: geneA_pos1 geneB_pos1, geneA_pos2 geneB_pos2, geneA_pos3 geneB_pos3;\n"
        ));
        assert!(text.contains("  set partition = by_gene;\n"));
        assert!(text.ends_with("END;\n"));
    }

    #[test]
    fn test_full_nexus() {
        let (alignment, records) = fixture();
        let text = render_full_nexus(&alignment, &records);

        assert!(text.starts_with("#NEXUS\n\n"));
        assert!(text.contains("BEGIN TAXA;\n  DIMENSIONS NTAX=3;"));
        assert!(text.contains("DIMENSIONS NTAX=3 NCHAR=8;"));
        assert!(text.contains("FORMAT DATATYPE=DNA MISSING=- GAP=- INTERLEAVE=NO;"));
        assert!(text.contains("  MATRIX\n  X ACGT----\n"));
        assert!(text.contains("BEGIN PAUP;"));
        assert!(text.contains("BEGIN mrbayes;"));
    }

    #[test]
    fn test_full_nexus_reparses_as_nexus() {
        let (alignment, records) = fixture();
        let text = render_full_nexus(&alignment, &records);
        let reparsed = crate::formats::nexus::parse_nexus_str(&text).unwrap();

        assert_eq!(reparsed.len(), 3);
        assert_eq!(reparsed[0].taxon, "X");
        assert_eq!(reparsed[0].data, "ACGT----");
    }

    #[test]
    fn test_quote_taxon() {
        assert_eq!(quote_taxon("Homo_sapiens"), "Homo_sapiens");
        assert_eq!(quote_taxon("Homo sapiens"), "'Homo sapiens'");
        assert_eq!(quote_taxon("odd;name"), "'odd;name'");
    }

    #[test]
    fn test_protein_only_datatype() {
        let records = vec![PartitionRecord {
            gene: "p1".to_string(),
            start: 1,
            end: 10,
            seq_type: SequenceType::Protein,
        }];
        assert_eq!(matrix_datatype(&records), "Protein");
        assert!(!is_mixed(&records));
    }
}
