//! SQLite store of annotated sequences and their cluster membership.
//!
//! Two tables are kept:
//!
//! | Table      | Columns                          |
//! |------------|----------------------------------|
//! | `sequence` | `genome, seqid, seqtype, seq`    |
//! | `cluster`  | `cluster, seqid`                 |
//!
//! with indices on `sequence.genome`, `sequence.seqid` and `sequence.seqtype`.
//! The `load` stage fills the store; the `align` stage reads clusters back.

use thiserror::Error;

pub mod loader;
pub mod sqlite;

pub use sqlite::SequenceStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] crate::parsing::ParseError),

    #[error(transparent)]
    Validation(#[from] crate::utils::validation::ValidationError),
}
