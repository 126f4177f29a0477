//! # core-genes
//!
//! A library for extracting core gene alignments from a set of bacterial genomes.
//!
//! A core gene is a gene cluster with exactly one member in every genome of a
//! study set. Starting from NCBI assemblies annotated by Prokka and clustered
//! by Roary, this crate stores every gene in SQLite, codon-aligns each
//! cluster and keeps the core clusters. Members of a core cluster whose
//! alignments carry different gap patterns are split into separate
//! sub-clusters, so every emitted block can be used without re-alignment.
//!
//! ## Example
//!
//! ```rust
//! use core_genes::parsing::alignment::AlignmentCorpus;
//! use core_genes::splitting::pipeline::CoreGeneExtractor;
//! use indicatif::ProgressBar;
//!
//! let csv = "c2,a,nucl,AC-\nc2,b,nucl,AC-\nc2,c,nucl,A-C\n";
//! let corpus = AlignmentCorpus::from_reader(csv.as_bytes()).unwrap();
//!
//! let mut out = Vec::new();
//! let summary = CoreGeneExtractor::new(3)
//!     .run(&corpus, &mut out, &ProgressBar::hidden())
//!     .unwrap();
//!
//! assert_eq!(summary.sub_clusters, 2);
//! assert!(String::from_utf8(out).unwrap().starts_with(">c2_0|a\nAC\n"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Accessions, sequence records, clusters and gap profiles
//! - [`parsing`]: Readers for accession lists, assembly summaries, FASTA, Roary clusters and alignment corpora
//! - [`fetch`]: Genome downloads from NCBI
//! - [`store`]: SQLite sequence store and its loader
//! - [`align`]: Codon alignment of stored clusters through an external aligner
//! - [`splitting`]: Core cluster selection and indel-profile splitting
//! - [`output`]: Writers for the alignment corpus and core gene groups
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod cli;
pub mod core;
pub mod fetch;
pub mod output;
pub mod parsing;
pub mod splitting;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::types::*;
pub use parsing::accession::AccessionSet;
pub use parsing::alignment::AlignmentCorpus;
pub use splitting::pipeline::{CoreGeneExtractor, ExtractSummary};
pub use store::SequenceStore;
