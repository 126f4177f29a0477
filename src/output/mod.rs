//! Writers for the text outputs of the pipeline.
//!
//! - [`alignment`]: core-gene sub-clusters as `=`-terminated FASTA blocks
//! - [`corpus`]: the comma-separated alignment corpus produced by `align`
//!
//! Writers append to a caller-owned stream and never open or close it.

pub mod alignment;
pub mod corpus;
