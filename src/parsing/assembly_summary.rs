//! Parser for NCBI `assembly_summary_*.txt` files.
//!
//! The summary is TAB-separated. Comment lines start with `#`; the last one
//! carries the column names (`# assembly_accession\tbioproject\t...`). The
//! column we need is `ftp_path`, the directory holding an assembly's files.

use std::collections::HashMap;
use std::path::Path;

use crate::parsing::ParseError;

/// Placeholder NCBI uses for assemblies without a download directory
pub const MISSING_PATH: &str = "na";

/// One assembly and where to download it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyEntry {
    pub accession: String,
    /// Directory URL, or `na` when NCBI has no files for this assembly
    pub ftp_path: String,
}

impl AssemblyEntry {
    /// True if NCBI publishes files for this assembly
    pub fn has_files(&self) -> bool {
        !self.ftp_path.is_empty() && self.ftp_path != MISSING_PATH
    }
}

/// Parse an assembly summary file, keeping the entries `keep` accepts
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if no header with an `ftp_path` column precedes the data.
pub fn parse_summary_file(
    path: &Path,
    keep: impl Fn(&str) -> bool,
) -> Result<HashMap<String, AssemblyEntry>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_summary_text(&content, keep)
}

/// Parse assembly summary text into accession -> entry
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if no header with an `ftp_path` column
/// precedes the data.
pub fn parse_summary_text(
    text: &str,
    keep: impl Fn(&str) -> bool,
) -> Result<HashMap<String, AssemblyEntry>, ParseError> {
    let mut entries = HashMap::new();
    let mut ftp_path_idx: Option<usize> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with('#') {
            let header_line = line.trim_start_matches('#').trim_start();
            ftp_path_idx = header_line
                .split('\t')
                .position(|col| col.trim() == "ftp_path");
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        let idx = ftp_path_idx.ok_or_else(|| {
            ParseError::InvalidFormat(
                "Assembly summary header with an ftp_path column not found".to_string(),
            )
        })?;

        let fields: Vec<&str> = line.split('\t').collect();
        let accession = fields[0].trim();
        if !keep(accession) {
            continue;
        }

        let ftp_path = fields.get(idx).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Line {} has no ftp_path field (column {})",
                i + 1,
                idx + 1
            ))
        })?;

        entries.insert(
            accession.to_string(),
            AssemblyEntry {
                accession: accession.to_string(),
                ftp_path: ftp_path.trim().to_string(),
            },
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
#   See ftp://ftp.ncbi.nlm.nih.gov/genomes/README_assembly_summary.txt
# assembly_accession\tbioproject\torganism_name\tftp_path
GCF_000005845.2\tPRJNA57779\tEscherichia coli\thttps://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2
GCF_000008865.2\tPRJNA226\tEscherichia coli O157\tna
GCF_000001405.40\tPRJNA168\tHomo sapiens\thttps://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/001/405/GCF_000001405.40_GRCh38.p14
";

    #[test]
    fn test_parse_summary() {
        let entries = parse_summary_text(SUMMARY, |acc| acc.starts_with("GCF_00000")).unwrap();

        assert_eq!(entries.len(), 2);
        let ecoli = &entries["GCF_000005845.2"];
        assert!(ecoli.has_files());
        assert!(ecoli.ftp_path.ends_with("GCF_000005845.2_ASM584v2"));
        assert!(!entries["GCF_000008865.2"].has_files());
        assert!(!entries.contains_key("GCF_000001405.40"));
    }

    #[test]
    fn test_missing_header() {
        let result = parse_summary_text("GCF_1\tPRJ\tx\thttps://example\n", |_| true);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_header_without_ftp_path() {
        let text = "# assembly_accession\tbioproject\nGCF_1\tPRJ\n";
        let result = parse_summary_text(text, |_| true);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_short_line_is_an_error() {
        let text = "# assembly_accession\tbioproject\tftp_path\nGCF_1\tPRJ\n";
        let result = parse_summary_text(text, |_| true);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }
}
