//! End-to-end tests: load mixed-format gene files from disk, process, and
//! render.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use seqcat::formats::fasta::parse_fasta_str;
use seqcat::output::{render_fasta, render_full_nexus};
use seqcat::registry::GeneRegistry;

const FASTA_GENE: &str = ">Homo_sapiens\nACGTACGT\n>Mus_musculus\nACGTAC\n";

const NEXUS_GENE: &str = "#NEXUS
BEGIN DATA;
  DIMENSIONS NTAX=2 NCHAR=4;
  FORMAT DATATYPE=DNA GAP=-;
  MATRIX
    Mus_musculus GGCC
    Danio_rerio  TTAA
  ;
END;
";

const GENBANK_GENE: &str = "LOCUS       AB000001     6 bp    DNA     linear
DEFINITION  Example locus.
  ORGANISM  Homo_sapiens
ORIGIN
        1 acgtgc
//
";

fn write_genes(dir: &TempDir) -> Vec<PathBuf> {
    let fasta = dir.path().join("coi.fasta");
    let nexus = dir.path().join("rbcl.nex");
    let genbank = dir.path().join("cytb.gb");
    fs::write(&fasta, FASTA_GENE).unwrap();
    fs::write(&nexus, NEXUS_GENE).unwrap();
    fs::write(&genbank, GENBANK_GENE).unwrap();
    vec![fasta, nexus, genbank]
}

#[test]
fn test_mixed_format_concatenation() {
    let dir = TempDir::new().unwrap();
    let paths = write_genes(&dir);

    let mut registry = GeneRegistry::new();
    let results = registry.add_genes_from_files(&paths, None, None);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert_eq!(registry.gene_count(), 3);

    // Gene names come from the file stems
    assert!(registry.gene("coi").is_some());
    assert!(registry.gene("rbcl").is_some());
    assert!(registry.gene("cytb").is_some());

    let output = registry.process().unwrap();

    // coi: width 8 (Mus padded), rbcl: width 4, cytb: width 6
    assert_eq!(output.alignment.total_length(), 18);
    assert_eq!(
        registry.taxon_universe(),
        vec!["Homo_sapiens", "Mus_musculus", "Danio_rerio"]
    );
    assert_eq!(output.alignment.get("Homo_sapiens"), Some("ACGTACGT----acgtgc"));
    assert_eq!(output.alignment.get("Mus_musculus"), Some("ACGTAC--GGCC------"));
    assert_eq!(output.alignment.get("Danio_rerio"), Some("--------TTAA------"));

    // Partition records cover [1, 18] contiguously
    let parts = &output.partitions;
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].start, 1);
    assert_eq!(parts.last().unwrap().end, 18);
    for pair in parts.windows(2) {
        assert_eq!(pair[1].start, pair[0].end + 1);
    }

    // One taxon was padded in coi
    assert_eq!(output.stats.adjustments[0].gene, "coi");
    assert_eq!(output.stats.adjustments[0].padded, 1);
}

#[test]
fn test_rendered_outputs_round_trip() {
    let dir = TempDir::new().unwrap();
    let paths = write_genes(&dir);

    let mut registry = GeneRegistry::new();
    registry.add_genes_from_files(&paths, None, None);
    let output = registry.process().unwrap();

    // FASTA round-trip preserves every sequence character-for-character
    let fasta = render_fasta(&output.alignment, Some(60));
    let reparsed = parse_fasta_str(&fasta).unwrap();
    assert_eq!(reparsed.len(), output.alignment.taxon_count());
    for seq in &reparsed {
        assert_eq!(Some(seq.data.as_str()), output.alignment.get(&seq.taxon));
    }

    // The full NEXUS document carries the matrix and both partition styles
    let nexus = render_full_nexus(&output.alignment, &output.partitions);
    assert!(nexus.contains("DIMENSIONS NTAX=3 NCHAR=18;"));
    assert!(nexus.contains("charset coi = 1-8;"));
    assert!(nexus.contains("charset rbcl = 9-12;"));
    assert!(nexus.contains("charset cytb = 13-18;"));
    assert!(nexus.contains("BEGIN mrbayes;"));
}

#[test]
fn test_colliding_file_stems_are_uniquified() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    let first = dir.path().join("coi.fasta");
    let second = sub.join("coi.fasta");
    fs::write(&first, FASTA_GENE).unwrap();
    fs::write(&second, ">Danio_rerio\nTTTT\n").unwrap();

    let mut registry = GeneRegistry::new();
    let results = registry.add_genes_from_files(&[first, second], None, None);

    let names: Vec<&str> = results
        .iter()
        .map(|(_, r)| r.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(names, vec!["coi", "coi_2"]);
    assert_eq!(registry.gene_count(), 2);
}

#[test]
fn test_unparseable_file_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("coi.fasta");
    let bad = dir.path().join("notes.txt");
    fs::write(&good, FASTA_GENE).unwrap();
    fs::write(&bad, "no sequences in here\n").unwrap();

    let mut registry = GeneRegistry::new();
    let results = registry.add_genes_from_files(&[good, bad], None, None);

    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert_eq!(registry.gene_count(), 1);
}
