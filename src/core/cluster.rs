use serde::Serialize;

/// Alignment gap character
pub const GAP: char = '-';

/// One aligned member of a gene cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMember {
    pub sequence_id: String,
    pub aligned_sequence: String,
}

impl ClusterMember {
    pub fn new(sequence_id: impl Into<String>, aligned_sequence: impl Into<String>) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            aligned_sequence: aligned_sequence.into(),
        }
    }

    /// Aligned sequence with every gap removed
    #[must_use]
    pub fn ungapped(&self) -> String {
        self.aligned_sequence.chars().filter(|&c| c != GAP).collect()
    }
}

/// Nucleotide members sharing a cluster id, in corpus order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub members: Vec<ClusterMember>,
}

impl Cluster {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_members(mut self, members: &[(&str, &str)]) -> Self {
        self.members
            .extend(members.iter().map(|(id, seq)| ClusterMember::new(*id, *seq)));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Gap/no-gap pattern of one aligned sequence: `1` at gaps, `0` elsewhere.
///
/// Two members belong to the same sub-cluster iff their profiles are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GapProfile(String);

impl GapProfile {
    #[must_use]
    pub fn of(aligned_sequence: &str) -> Self {
        Self(
            aligned_sequence
                .chars()
                .map(|c| if c == GAP { '1' } else { '0' })
                .collect(),
        )
    }

    /// Number of alignment columns covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.0.bytes().filter(|&b| b == b'1').count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GapProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A relabeled, gap-stripped sequence ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRecord {
    /// `{cluster_id}_{sub_index}|{original_sequence_id}`
    pub id: String,
    pub sequence: String,
}

/// Members of one cluster that share a single gap profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCluster {
    pub cluster_id: String,
    /// Rank of the profile in first-seen order, unique within the parent cluster
    pub sub_index: usize,
    pub records: Vec<SplitRecord>,
}

impl SubCluster {
    /// Label shared by every record, e.g. `group_42_1`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}_{}", self.cluster_id, self.sub_index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
