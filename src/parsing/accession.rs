use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::types::GenomeAccession;
use crate::parsing::ParseError;

/// The genomes of one study, in file order.
///
/// Its size is the member count a cluster needs to be called core.
/// Duplicates are kept as written.
#[derive(Debug, Clone, Default)]
pub struct AccessionSet {
    accessions: Vec<GenomeAccession>,
}

impl AccessionSet {
    /// Load an accession list, one accession per line.
    ///
    /// Trailing whitespace is stripped and blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read an accession list from any buffered reader
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut accessions = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let accession = line.trim_end();
            if accession.is_empty() {
                continue;
            }
            accessions.push(GenomeAccession::new(accession));
        }
        Ok(Self { accessions })
    }

    /// Number of genomes, duplicates included
    pub fn count(&self) -> usize {
        self.accessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenomeAccession> {
        self.accessions.iter()
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.accessions.iter().any(|a| a.as_str() == accession)
    }
}

impl FromIterator<GenomeAccession> for AccessionSet {
    fn from_iter<T: IntoIterator<Item = GenomeAccession>>(iter: T) -> Self {
        Self {
            accessions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_accession_list() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"GCF_000005845.2\nGCF_000008865.2  \n\nGCF_000005845.2\n")
            .unwrap();
        temp.flush().unwrap();

        let set = AccessionSet::load(temp.path()).unwrap();
        assert_eq!(set.count(), 3);
        let names: Vec<&str> = set.iter().map(GenomeAccession::as_str).collect();
        assert_eq!(
            names,
            vec!["GCF_000005845.2", "GCF_000008865.2", "GCF_000005845.2"]
        );
        assert!(set.contains("GCF_000008865.2"));
        assert!(!set.contains("GCF_000001405.40"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let set = AccessionSet::from_reader(&b"g1\r\ng2\r\n"[..]).unwrap();
        assert!(set.contains("g1"));
        assert!(set.contains("g2"));
    }

    #[test]
    fn test_missing_file() {
        let result = AccessionSet::load(Path::new("/nonexistent/accessions.txt"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_empty_list() {
        let set = AccessionSet::from_reader(&b""[..]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.count(), 0);
    }
}
