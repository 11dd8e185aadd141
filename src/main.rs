//! seqcat - Multi-gene sequence concatenation
//!
//! Loads one gene per input file (FASTA, NEXUS, or GenBank), reconciles
//! the taxon sets, and writes the concatenated alignment with partition
//! metadata for downstream phylogenetic software.
//!
//! ## Usage
//!
//! ```bash
//! seqcat genes/*.fasta -o concat.fasta
//! seqcat coi.gb rbcl.nex -f auto --nexus concat.nex
//! seqcat genes/*.fa --partitions parts.txt --partition-style mrbayes
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use seqcat::formats::FileFormat;
use seqcat::output::{
    render_fasta, render_full_nexus, render_partition_block, render_statistics, PartitionStyle,
    WRAP_WIDTH,
};
use seqcat::registry::GeneRegistry;
use seqcat::typing::TypeInference;

/// File format specification for the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Auto-detect from extension and content
    Auto,
    /// FASTA format
    Fasta,
    /// NEXUS format
    Nexus,
    /// GenBank format
    Genbank,
}

impl From<FormatArg> for Option<FileFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => None,
            FormatArg::Fasta => Some(FileFormat::Fasta),
            FormatArg::Nexus => Some(FileFormat::Nexus),
            FormatArg::Genbank => Some(FileFormat::GenBank),
        }
    }
}

/// Partition block style for the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    /// PAUP* charset/link block
    Paup,
    /// MrBayes partition block
    Mrbayes,
}

impl From<StyleArg> for PartitionStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Paup => PartitionStyle::Paup,
            StyleArg::Mrbayes => PartitionStyle::MrBayes,
        }
    }
}

/// seqcat - concatenate per-gene sequence files into one partitioned alignment
///
/// Each input file becomes one gene named after its file stem (or --name).
/// The statistics report is printed to stdout; alignment and partition
/// outputs are written where the flags point.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gene files to concatenate (FASTA, NEXUS, or GenBank format)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Force a specific file format (overrides auto-detection)
    #[arg(short = 'f', long = "format", value_enum, default_value = "auto")]
    format: FormatArg,

    /// Base gene name for all files (default: each file's stem)
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Write the concatenated alignment as FASTA. Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Write a full NEXUS document (matrix plus partition blocks)
    #[arg(long = "nexus")]
    nexus: Option<PathBuf>,

    /// Write a standalone partition block
    #[arg(long = "partitions")]
    partitions: Option<PathBuf>,

    /// Partition block style
    #[arg(long = "partition-style", value_enum, default_value = "paup")]
    partition_style: StyleArg,

    /// Minimum nucleotide fraction for classifying a gene as DNA
    #[arg(long = "dna-threshold", default_value_t = 0.9)]
    dna_threshold: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !(0.0..=1.0).contains(&args.dna_threshold) {
        anyhow::bail!(
            "DNA threshold must be between 0 and 1 (got {})",
            args.dna_threshold
        );
    }

    let mut registry = GeneRegistry::with_typing(TypeInference::with_threshold(args.dna_threshold));

    let mut loaded = 0usize;
    for (path, result) in
        registry.add_genes_from_files(&args.files, args.name.as_deref(), args.format.into())
    {
        match result {
            Ok(name) => {
                eprintln!("Loaded {} as gene '{}'", path.display(), name);
                loaded += 1;
            }
            Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
        }
    }

    if loaded == 0 {
        anyhow::bail!("no gene files could be loaded");
    }

    let output = registry.process()?;

    print!("{}", render_statistics(&output.stats));

    if let Some(target) = &args.output {
        let fasta = render_fasta(&output.alignment, Some(WRAP_WIDTH));
        if target == "-" {
            io::stdout().write_all(fasta.as_bytes())?;
        } else {
            fs::write(target, fasta)?;
            eprintln!(
                "Wrote {} taxa to {}",
                output.alignment.taxon_count(),
                target
            );
        }
    }

    if let Some(path) = &args.nexus {
        fs::write(path, render_full_nexus(&output.alignment, &output.partitions))?;
        eprintln!("Wrote NEXUS document to {}", path.display());
    }

    if let Some(path) = &args.partitions {
        fs::write(
            path,
            render_partition_block(&output.partitions, args.partition_style.into()),
        )?;
        eprintln!("Wrote partition block to {}", path.display());
    }

    Ok(())
}
