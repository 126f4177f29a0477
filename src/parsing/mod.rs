//! Parsers for the text inputs of each pipeline stage.
//!
//! This module provides parsers for:
//!
//! - **Accession lists**: one genome accession per line ([`accession`])
//! - **Alignment corpora**: `cluster,seqid,seqtype,seq[,genome]` lines ([`alignment`])
//! - **FASTA files**: annotated genes and aligner output, via noodles ([`fasta`])
//! - **Roary clusters**: the `clustered_proteins` membership file ([`roary`])
//! - **NCBI assembly summaries**: accession to download path ([`assembly_summary`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use core_genes::parsing::accession::AccessionSet;
//! use core_genes::parsing::alignment::AlignmentCorpus;
//! use std::path::Path;
//!
//! let genomes = AccessionSet::load(Path::new("accessions.txt")).unwrap();
//! let corpus = AlignmentCorpus::load(Path::new("alignments.csv")).unwrap();
//! println!("{} genomes, {} clusters", genomes.count(), corpus.len());
//! ```

use thiserror::Error;

pub mod accession;
pub mod alignment;
pub mod assembly_summary;
pub mod fasta;
pub mod roary;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}
