use serde::{Deserialize, Serialize};

/// Identifier of one genome assembly (e.g. `GCF_000005845.2`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeAccession(pub String);

impl GenomeAccession {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GenomeAccession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Molecule type tag carried by every stored and aligned sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceType {
    /// Coding sequence, tagged `nucl`
    Nucleotide,
    /// Translated coding sequence, tagged `prot`
    Protein,
    Other(String),
}

impl SequenceType {
    /// Parse a type tag as written in the store and the alignment corpus
    pub fn parse(s: &str) -> Self {
        match s {
            "nucl" => Self::Nucleotide,
            "prot" => Self::Protein,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Nucleotide => "nucl",
            Self::Protein => "prot",
            Self::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the `sequence` table: an annotated gene of one genome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub genome: GenomeAccession,
    pub seqid: String,
    pub seqtype: SequenceType,
    pub seq: String,
}

impl SequenceRecord {
    pub fn new(
        genome: GenomeAccession,
        seqid: impl Into<String>,
        seqtype: SequenceType,
        seq: impl Into<String>,
    ) -> Self {
        Self {
            genome,
            seqid: seqid.into(),
            seqtype,
            seq: seq.into(),
        }
    }
}

/// One row of the `cluster` table: membership of a sequence in a gene cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    pub cluster: String,
    pub seqid: String,
}

/// One line of the alignment corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRecord {
    pub cluster_id: String,
    pub sequence_id: String,
    pub sequence_type: SequenceType,
    /// Aligned sequence, `-` marks a gap
    pub aligned_sequence: String,
    /// Genome of origin, present in corpora written by the `align` stage
    pub genome: Option<GenomeAccession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_type_tags() {
        assert_eq!(SequenceType::parse("nucl"), SequenceType::Nucleotide);
        assert_eq!(SequenceType::parse("prot"), SequenceType::Protein);
        assert_eq!(
            SequenceType::parse("rna"),
            SequenceType::Other("rna".to_string())
        );
        assert_eq!(SequenceType::Nucleotide.as_str(), "nucl");
        assert_eq!(SequenceType::Other("rna".to_string()).to_string(), "rna");
    }

    #[test]
    fn test_type_tags_are_case_sensitive() {
        assert_eq!(
            SequenceType::parse("NUCL"),
            SequenceType::Other("NUCL".to_string())
        );
    }
}
