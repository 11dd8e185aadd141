//! # seqcat - Multi-Gene Sequence Concatenation
//!
//! Builds a concatenated multi-gene alignment from per-gene sequence files
//! in FASTA, NEXUS, or GenBank format, together with the partition metadata
//! phylogenetic software needs (RAxML, IQ-TREE, PAUP*, MrBayes).
//!
//! ## Architecture
//!
//! The engine is a pipeline over one owned session object:
//! - `formats`: per-format parsers and structural-signature detection
//! - `model`: sequences, genes, and the inferred sequence type
//! - `registry`: the gene registry (add/remove/reset) and processing entry point
//! - `typing`: heuristic DNA/Protein classification
//! - `concat`: taxon-set reconciliation and concatenation
//! - `stats`: statistics snapshot, partition records, codon subdivisions
//! - `output`: FASTA, partition-block, and full-NEXUS renderers
//!
//! ## Example
//!
//! ```
//! use seqcat::registry::GeneRegistry;
//!
//! let mut registry = GeneRegistry::new();
//! registry.add_gene_from_text("geneA", ">X\nACGT\n>Y\nAC\n", None).unwrap();
//! registry.add_gene_from_text("geneB", ">Y\nGGGG\n>Z\nTTTT\n", None).unwrap();
//!
//! let output = registry.process().unwrap();
//! assert_eq!(output.alignment.get("Y"), Some("AC--GGGG"));
//! assert_eq!(output.partitions.len(), 2);
//! ```

pub mod concat;
pub mod formats;
pub mod model;
pub mod output;
pub mod registry;
pub mod stats;
pub mod typing;
