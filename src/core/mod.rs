//! Core data types shared by every pipeline stage.
//!
//! - [`GenomeAccession`], [`SequenceType`], [`SequenceRecord`]: annotated genes as stored
//! - [`AlignedRecord`]: one line of the alignment corpus
//! - [`Cluster`], [`ClusterMember`]: nucleotide members of a gene cluster
//! - [`GapProfile`]: the equivalence key used to split a cluster
//! - [`SubCluster`], [`SplitRecord`]: relabeled, gap-stripped output groups
//!
//! ## Relabeling
//!
//! A member `seq17` of cluster `group_3` whose gap profile was the second one seen
//! is written as `group_3_1|seq17`, so every output sequence can be traced back to
//! its cluster and genome.

pub mod cluster;
pub mod types;

pub use cluster::{Cluster, ClusterMember, GapProfile, SplitRecord, SubCluster, GAP};
pub use types::{AlignedRecord, ClusterAssignment, GenomeAccession, SequenceRecord, SequenceType};
