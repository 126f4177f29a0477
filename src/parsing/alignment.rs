//! Reader for the alignment corpus written by the `align` stage.
//!
//! Each line holds `cluster_id,sequence_id,sequence_type,aligned_sequence`,
//! optionally followed by a fifth `genome` field. Only nucleotide (`nucl`)
//! records take part in core-gene extraction.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::core::cluster::{Cluster, ClusterMember};
use crate::core::types::{AlignedRecord, GenomeAccession, SequenceType};
use crate::parsing::ParseError;

/// Minimum number of comma-separated fields on a corpus line
pub const MIN_FIELDS: usize = 4;

/// Parse one corpus line.
///
/// `line_num` is 1-based and only used in error messages.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the line has fewer than four fields.
pub fn parse_aligned_record(line: &str, line_num: usize) -> Result<AlignedRecord, ParseError> {
    let fields: Vec<&str> = line.trim_end().split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has {} fields, expected at least {MIN_FIELDS}",
            fields.len()
        )));
    }

    Ok(AlignedRecord {
        cluster_id: fields[0].to_string(),
        sequence_id: fields[1].to_string(),
        sequence_type: SequenceType::parse(fields[2]),
        aligned_sequence: fields[3].to_string(),
        genome: fields
            .get(4)
            .filter(|g| !g.is_empty())
            .map(|g| GenomeAccession::new(*g)),
    })
}

/// Nucleotide clusters of an alignment corpus, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct AlignmentCorpus {
    clusters: Vec<Cluster>,

    /// Index: cluster id -> position in `clusters`
    id_to_index: HashMap<String, usize>,
}

impl AlignmentCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a corpus file, keeping nucleotide records only.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read, or
    /// `ParseError::InvalidFormat` for a line with too few fields.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Stream corpus lines from any buffered reader
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if reading fails, or
    /// `ParseError::InvalidFormat` for a line with too few fields.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut corpus = Self::new();
        let mut skipped = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record = parse_aligned_record(&line, i + 1)?;
            if !corpus.push(record) {
                skipped += 1;
            }
        }

        debug!(
            "Read {} nucleotide clusters, skipped {} non-nucleotide records",
            corpus.len(),
            skipped
        );
        Ok(corpus)
    }

    /// Add a record to its cluster. Returns false if it was not a nucleotide record.
    pub fn push(&mut self, record: AlignedRecord) -> bool {
        if record.sequence_type != SequenceType::Nucleotide {
            return false;
        }

        let index = match self.id_to_index.get(&record.cluster_id) {
            Some(&index) => index,
            None => {
                let index = self.clusters.len();
                self.id_to_index.insert(record.cluster_id.clone(), index);
                self.clusters.push(Cluster::new(record.cluster_id));
                index
            }
        };

        self.clusters[index]
            .members
            .push(ClusterMember::new(record.sequence_id, record.aligned_sequence));
        true
    }

    /// Get a cluster by id
    pub fn get(&self, cluster_id: &str) -> Option<&Cluster> {
        self.id_to_index
            .get(cluster_id)
            .map(|&idx| &self.clusters[idx])
    }

    /// Clusters in the order their ids first appeared
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl<'a> IntoIterator for &'a AlignmentCorpus {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
