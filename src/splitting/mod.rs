//! Core-cluster selection and indel-profile splitting.
//!
//! Extraction runs in three steps:
//!
//! 1. **Selection** ([`selector`]): keep clusters with exactly one member per genome
//! 2. **Splitting** ([`profile`]): partition each core cluster by gap profile,
//!    strip gaps and relabel members
//! 3. **Writing** ([`crate::output::alignment`]): emit each sub-cluster as an
//!    `=`-terminated block of FASTA records
//!
//! [`pipeline::CoreGeneExtractor`] ties the steps together and returns an
//! [`pipeline::ExtractSummary`].

use thiserror::Error;

pub mod pipeline;
pub mod profile;
pub mod selector;

/// Data integrity and output failures raised while extracting core genes
#[derive(Error, Debug)]
pub enum SplitError {
    #[error(
        "Cluster '{cluster}': sequence '{sequence_id}' has aligned length {found}, expected {expected}"
    )]
    LengthMismatch {
        cluster: String,
        sequence_id: String,
        expected: usize,
        found: usize,
    },

    #[error("Cluster '{cluster}' has {members} members but the study has only {genomes} genomes")]
    OversizedCluster {
        cluster: String,
        members: usize,
        genomes: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
