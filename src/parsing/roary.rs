//! Parser for Roary's `clustered_proteins` file.
//!
//! Each line names a cluster followed by its member sequence ids:
//!
//! ```text
//! group_1: seq_a\tseq_b\tseq_c
//! ```

use std::path::Path;

use crate::core::types::ClusterAssignment;
use crate::parsing::ParseError;

/// Name of the cluster membership file inside a Roary output directory
pub const CLUSTERED_PROTEINS: &str = "clustered_proteins";

/// Parse a `clustered_proteins` file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a line has no `": "` separator.
pub fn parse_clusters_file(path: &Path) -> Result<Vec<ClusterAssignment>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_clusters_text(&content)
}

/// Parse `clustered_proteins` text into one assignment per member
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has no `": "` separator.
pub fn parse_clusters_text(text: &str) -> Result<Vec<ClusterAssignment>, ParseError> {
    let mut assignments = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let (cluster, members) = line.split_once(": ").ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Line {} has no cluster name separator ': '",
                i + 1
            ))
        })?;

        assignments.extend(
            members
                .split('\t')
                .filter(|seqid| !seqid.is_empty())
                .map(|seqid| ClusterAssignment {
                    cluster: cluster.to_string(),
                    seqid: seqid.to_string(),
                }),
        );
    }

    Ok(assignments)
}
