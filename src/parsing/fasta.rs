//! Parser for FASTA files using noodles.
//!
//! Reads annotated gene sequences (`.faa`, `.ffn`) and aligner output.
//! Gzip-compressed files (`.gz`) are decompressed on the fly.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;

use crate::parsing::ParseError;

/// A named sequence as read from a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    /// Record name, i.e. the first word of the definition line
    pub id: String,
    pub sequence: String,
}

impl FastaEntry {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file.
///
/// An empty file yields an empty list; a genome may have no annotated genes
/// of one type.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or `ParseError::Noodles`
/// if parsing fails.
pub fn read_fasta_file(path: &Path) -> Result<Vec<FastaEntry>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        read_fasta(BufReader::new(GzDecoder::new(file)))
    } else {
        read_fasta(BufReader::new(file))
    }
}

/// Read every record from a buffered FASTA stream
///
/// # Errors
///
/// Returns `ParseError::Noodles` if a record cannot be parsed.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaEntry>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut entries = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let id = String::from_utf8_lossy(record.name()).to_string();
        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        entries.push(FastaEntry::new(id, sequence));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_fasta_file() {
        let fasta_content = b">gene_1 DNA polymerase\nATGAAA\nTAA\n>gene_2\nATGTGA\n";

        let mut temp = NamedTempFile::with_suffix(".ffn").unwrap();
        temp.write_all(fasta_content).unwrap();
        temp.flush().unwrap();

        let entries = read_fasta_file(temp.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                FastaEntry::new("gene_1", "ATGAAATAA"),
                FastaEntry::new("gene_2", "ATGTGA"),
            ]
        );
    }

    #[test]
    fn test_read_gzipped_fasta() {
        let temp = NamedTempFile::with_suffix(".faa.gz").unwrap();
        let mut encoder = GzEncoder::new(temp.reopen().unwrap(), Compression::default());
        encoder.write_all(b">p1\nMKV\n").unwrap();
        encoder.finish().unwrap();

        let entries = read_fasta_file(temp.path()).unwrap();
        assert_eq!(entries, vec![FastaEntry::new("p1", "MKV")]);
    }

    #[test]
    fn test_empty_fasta_is_not_an_error() {
        let entries = read_fasta(&b""[..]).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_aligned_sequences_keep_gaps() {
        let entries = read_fasta(&b">a\nMK-V\n>b\nM--V\n"[..]).unwrap();
        assert_eq!(entries[0].sequence, "MK-V");
        assert_eq!(entries[1].sequence, "M--V");
    }
}
