//! The gene registry: the session object owning all loaded genes.
//!
//! The registry is plain owned state, passed by reference wherever it is
//! needed; there are no module-level singletons. Mutations never trigger
//! reprocessing: the host calls [`GeneRegistry::process`] explicitly, and
//! every earlier output snapshot simply goes stale.
//!
//! A failed add leaves the registry unchanged; there is no partial
//! registration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::concat::{self, ConcatError, ConcatenatedAlignment};
use crate::formats::{self, FileFormat, ParseError};
use crate::model::{Gene, Sequence, SequenceType};
use crate::stats::{self, AlignmentStats, PartitionRecord};
use crate::typing::TypeInference;

/// Errors from registry mutations.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("gene '{name}' is already registered")]
    DuplicateGene { name: String },

    #[error("gene '{name}' is not registered")]
    GeneNotFound { name: String },

    #[error("failed to parse gene '{name}' from {origin}: {source}")]
    Parse {
        name: String,
        /// Input source identifier: a file path or "pasted text"
        origin: String,
        #[source]
        source: ParseError,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Everything one processing run produces.
///
/// All three parts are value snapshots: they hold no reference into the
/// registry and stay valid across later mutation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub alignment: ConcatenatedAlignment,
    pub partitions: Vec<PartitionRecord>,
    pub stats: AlignmentStats,
}

/// The registry of loaded genes, in registration order.
#[derive(Debug, Default)]
pub struct GeneRegistry {
    genes: Vec<Gene>,
    typing: TypeInference,
}

impl GeneRegistry {
    /// Creates an empty registry with the default type-inference threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with a custom type-inference
    /// configuration.
    pub fn with_typing(typing: TypeInference) -> Self {
        Self {
            genes: Vec::new(),
            typing,
        }
    }

    /// Returns the registered genes in registration order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Returns the number of registered genes.
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Returns true if no genes are registered.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Looks up a gene by name.
    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.name == name)
    }

    /// Registers a gene from already-parsed sequences.
    ///
    /// Fails with `DuplicateGene` when the name is taken; the type starts
    /// `Unknown` and is classified on the first processing run.
    pub fn add_gene(
        &mut self,
        name: impl Into<String>,
        sequences: Vec<Sequence>,
    ) -> RegistryResult<&Gene> {
        let name = name.into();
        if self.gene(&name).is_some() {
            return Err(RegistryError::DuplicateGene { name });
        }
        self.genes.push(Gene::new(name, sequences));
        Ok(self.genes.last().expect("gene just pushed"))
    }

    /// Parses raw text (file content or pasted data) and registers it as
    /// one gene.
    ///
    /// With no declared format the content is dispatched on its structural
    /// signature. A parse failure leaves the registry unchanged.
    pub fn add_gene_from_text(
        &mut self,
        name: impl Into<String>,
        text: &str,
        declared: Option<FileFormat>,
    ) -> RegistryResult<&Gene> {
        let name = name.into();
        if self.gene(&name).is_some() {
            return Err(RegistryError::DuplicateGene { name });
        }
        let sequences =
            formats::parse_gene_text(text, &name, declared).map_err(|source| {
                RegistryError::Parse {
                    name: name.clone(),
                    origin: "pasted text".to_string(),
                    source,
                }
            })?;
        self.add_gene(name, sequences)
    }

    /// Loads each path as one gene, returning a per-file result.
    ///
    /// The gene name defaults to the file stem, or `base_name` when given,
    /// and colliding names are uniquified with `_2`, `_3`, ... suffixes so
    /// a batch import never fails on names alone. Parse failures are
    /// reported per file and skip only that file.
    pub fn add_genes_from_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        base_name: Option<&str>,
        declared: Option<FileFormat>,
    ) -> Vec<(PathBuf, RegistryResult<String>)> {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref().to_path_buf();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("gene")
                .to_string();
            let name = self.unique_name(base_name.unwrap_or(&stem));

            let result = match formats::parse_gene_file(&path, &name, declared) {
                Ok(sequences) => match self.add_gene(name.clone(), sequences) {
                    Ok(_) => Ok(name),
                    Err(err) => Err(err),
                },
                Err(source) => Err(RegistryError::Parse {
                    name,
                    origin: path.display().to_string(),
                    source,
                }),
            };

            results.push((path, result));
        }

        results
    }

    /// Removes a gene by name.
    pub fn remove_gene(&mut self, name: &str) -> RegistryResult<()> {
        match self.genes.iter().position(|g| g.name == name) {
            Some(index) => {
                self.genes.remove(index);
                Ok(())
            }
            None => Err(RegistryError::GeneNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Removes all genes. Idempotent.
    pub fn reset(&mut self) {
        self.genes.clear();
    }

    /// Returns all taxa in first-seen order across genes in registration
    /// order. Recomputed on every call.
    pub fn taxon_universe(&self) -> Vec<String> {
        concat::taxon_universe(&self.genes)
    }

    /// Runs reconciliation and produces the concatenated alignment,
    /// partition records, and statistics snapshot.
    ///
    /// Classifies each still-unclassified gene and fixes its reconciled
    /// length to the maximum observed sequence length. Raw sequences are
    /// left untouched, so calling this twice on an unchanged registry
    /// yields identical output.
    pub fn process(&mut self) -> Result<ProcessOutput, ConcatError> {
        if self.genes.is_empty() {
            return Err(ConcatError::EmptyRegistry);
        }

        let typing = self.typing;
        for gene in &mut self.genes {
            if gene.seq_type == SequenceType::Unknown {
                gene.seq_type = typing.infer(gene);
            }
            gene.reconciled_len = gene.max_sequence_length();
        }

        let (alignment, spans) = concat::concatenate(&self.genes)?;
        let partitions = stats::build_partitions(&spans);
        let stats = stats::compute_stats(&alignment, &spans);

        Ok(ProcessOutput {
            alignment,
            partitions,
            stats,
        })
    }

    /// Returns `base`, or the first `base_2`, `base_3`, ... not yet
    /// registered.
    fn unique_name(&self, base: &str) -> String {
        if self.gene(base).is_none() {
            return base.to_string();
        }
        let mut counter = 2usize;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if self.gene(&candidate).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }
}
