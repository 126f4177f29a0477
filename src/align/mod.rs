//! Codon alignment of stored gene clusters.
//!
//! For each cluster with enough members, the protein sequences are aligned by
//! an external multiple aligner and every nucleotide sequence is threaded
//! through its aligned protein ([`codon::back_translate`]). The result is the
//! alignment corpus read by core-gene extraction.
//!
//! No alignment algorithm lives here: [`MultipleAligner`] is the seam, with
//! [`muscle::MuscleAligner`] as the production implementation.

use std::path::PathBuf;

use thiserror::Error;

use crate::parsing::fasta::FastaEntry;

pub mod cluster;
pub mod codon;
pub mod muscle;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Failed to start aligner '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Aligner exited with {status}: {stderr}")]
    AlignerFailed { status: String, stderr: String },

    #[error("Failed to read aligner output: {0}")]
    Parse(#[from] crate::parsing::ParseError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A multiple sequence aligner: takes unaligned records, returns them aligned.
///
/// Output order may differ from input order; records are matched back by id.
pub trait MultipleAligner: Sync {
    fn align(&self, records: &[FastaEntry]) -> Result<Vec<FastaEntry>, AlignError>;
}

/// Options for the `align` stage
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Worker threads; 0 uses one per CPU
    pub threads: usize,
    /// Aligner executable
    pub muscle: PathBuf,
    /// Smallest cluster worth aligning
    pub min_members: usize,
    /// Clusters read from the store and aligned per round
    pub batch_size: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            muscle: PathBuf::from("muscle"),
            min_members: 2,
            batch_size: 256,
        }
    }
}
