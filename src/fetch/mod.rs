//! Downloading genome assemblies from NCBI.
//!
//! NCBI's assembly summary gives each assembly a directory (`ftp_path`). The
//! same tree is served over HTTPS, so `ftp://` paths are rewritten to
//! `https://` and fetched with a blocking HTTP client. Each requested file is
//! staged in a temporary file, decompressed next to it and the compressed copy
//! is discarded.
//!
//! There is no retry: the first failed download aborts the run.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::MultiGzDecoder;
use indicatif::ProgressBar;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parsing::accession::AccessionSet;
use crate::parsing::assembly_summary::AssemblyEntry;
use crate::utils::validation::{ensure_dir, validate_path_component, ValidationError};

/// Host serving NCBI's genomes tree
pub const NCBI_HOST: &str = "ftp.ncbi.nlm.nih.gov";

/// File suffix of an assembly's genomic nucleotide FASTA
pub const GENOMIC_FNA_SUFFIX: &str = "_genomic.fna.gz";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const READ_TIMEOUT_SECS: u64 = 600;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Download options
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Replaces `https://ftp.ncbi.nlm.nih.gov` in download URLs (e.g. a mirror)
    pub base_url: Option<String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Files to fetch per assembly, as suffixes of the assembly directory name
    pub suffixes: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            suffixes: vec![GENOMIC_FNA_SUFFIX.to_string()],
        }
    }
}

/// Counts reported after a fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub genomes_fetched: usize,
    pub files_written: usize,
    /// Requested accessions absent from the assembly summary
    pub not_in_summary: Vec<String>,
    /// Requested accessions NCBI lists without a download directory
    pub without_files: Vec<String>,
}

/// Rewrite an assembly directory path to the HTTPS URL to fetch from
pub fn directory_url(ftp_path: &str, base_url: Option<&str>) -> String {
    let path = ftp_path.trim_end_matches('/');
    let relative = path
        .strip_prefix("ftp://")
        .or_else(|| path.strip_prefix("https://"))
        .or_else(|| path.strip_prefix("http://"))
        .map(|rest| rest.strip_prefix(NCBI_HOST).unwrap_or(rest));

    match (relative, base_url) {
        (Some(rest), Some(base)) if path.contains(NCBI_HOST) => {
            format!("{}{rest}", base.trim_end_matches('/'))
        }
        (Some(rest), _) if path.contains(NCBI_HOST) => format!("https://{NCBI_HOST}{rest}"),
        _ => path.replacen("ftp://", "https://", 1),
    }
}

/// URL of one file inside an assembly directory: `<dir>/<basename(dir)><suffix>`
pub fn file_url(directory_url: &str, suffix: &str) -> String {
    let dir = directory_url.trim_end_matches('/');
    let base_name = dir.rsplit('/').next().unwrap_or(dir);
    format!("{dir}/{base_name}{suffix}")
}

/// True if files with this suffix are served gzip-compressed
pub fn is_gzip_suffix(suffix: &str) -> bool {
    suffix.ends_with(".gz")
}

/// Local file name for a downloaded file after decompression
pub fn local_file_name(accession: &str, suffix: &str) -> String {
    format!("{accession}{}", suffix.strip_suffix(".gz").unwrap_or(suffix))
}

/// Decompress a gzip stream into `dest`, atomically replacing any existing file.
///
/// Returns the number of decompressed bytes.
///
/// # Errors
///
/// Returns any read, decode or write error.
pub fn gunzip_to<R: Read>(compressed: R, dest: &Path) -> std::io::Result<u64> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let staged = NamedTempFile::new_in(dir)?;
    let bytes = {
        let mut decoder = MultiGzDecoder::new(BufReader::new(compressed));
        let mut writer = BufWriter::new(staged.as_file());
        let bytes = std::io::copy(&mut decoder, &mut writer)?;
        writer.flush()?;
        bytes
    };
    staged.persist(dest)?;
    Ok(bytes)
}

/// Pick the summary entries to download, in accession-list order
pub fn plan_downloads(
    accessions: &AccessionSet,
    entries: &HashMap<String, AssemblyEntry>,
) -> (Vec<AssemblyEntry>, FetchSummary) {
    let mut planned: Vec<AssemblyEntry> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut summary = FetchSummary::default();

    for accession in accessions.iter() {
        let accession = accession.as_str();
        if !seen.insert(accession) {
            continue;
        }
        match entries.get(accession) {
            Some(entry) if entry.has_files() => planned.push(entry.clone()),
            Some(_) => {
                warn!("{accession}: no download directory in assembly summary");
                summary.without_files.push(accession.to_string());
            }
            None => {
                warn!("{accession}: not found in assembly summary");
                summary.not_in_summary.push(accession.to_string());
            }
        }
    }

    (planned, summary)
}

/// Downloads assemblies over HTTPS
pub struct GenomeFetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl GenomeFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(concat!("core-genes/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Download every configured file of one assembly into
    /// `<out_dir>/<accession>/`.
    ///
    /// Files with a `.gz` suffix are decompressed; others are stored as served.
    pub fn fetch_genome(
        &self,
        entry: &AssemblyEntry,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let accession = validate_path_component(&entry.accession)?;
        let genome_dir = out_dir.join(accession);
        ensure_dir(&genome_dir)?;

        let dir_url = directory_url(&entry.ftp_path, self.config.base_url.as_deref());
        let mut written = Vec::new();

        for suffix in &self.config.suffixes {
            let url = file_url(&dir_url, suffix);
            let dest = genome_dir.join(local_file_name(accession, suffix));
            debug!("Downloading {url}");

            let mut response = self.client.get(&url).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let mut staged = NamedTempFile::new_in(&genome_dir)?;
            response.copy_to(staged.as_file_mut())?;
            let bytes = if is_gzip_suffix(suffix) {
                gunzip_to(File::open(staged.path())?, &dest)?
            } else {
                let bytes = staged.as_file().metadata()?.len();
                staged.persist(&dest).map_err(std::io::Error::from)?;
                bytes
            };
            debug!("{} bytes written to {}", bytes, dest.display());

            written.push(dest);
        }

        Ok(written)
    }

    /// Fetch every requested accession found in the summary
    pub fn fetch_all(
        &self,
        accessions: &AccessionSet,
        entries: &HashMap<String, AssemblyEntry>,
        out_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<FetchSummary, FetchError> {
        let (planned, mut summary) = plan_downloads(accessions, entries);
        progress.set_length(planned.len() as u64);

        for entry in &planned {
            let files = self.fetch_genome(entry, out_dir)?;
            summary.files_written += files.len();
            summary.genomes_fetched += 1;
            progress.inc(1);
        }

        info!(
            "Fetched {} genomes into {}",
            summary.genomes_fetched,
            out_dir.display()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GenomeAccession;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::BufRead;
    use std::net::TcpListener;
    use tempfile::tempdir;

    const DIR: &str = "ftp://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2";

    #[test]
    fn test_directory_url() {
        assert_eq!(
            directory_url(DIR, None),
            "https://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2"
        );
        assert_eq!(
            directory_url(&DIR.replace("ftp://", "https://"), None),
            directory_url(DIR, None)
        );
        assert_eq!(
            directory_url(DIR, Some("http://localhost:8000/")),
            "http://localhost:8000/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2"
        );
    }

    fn gzip(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    /// Answer one request per response on a local port, in order. Returns the base URL.
    fn serve(responses: Vec<(u16, Vec<u8>)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                loop {
                    line.clear();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }
                let reason = if status == 200 { "OK" } else { "Not Found" };
                write!(
                    stream,
                    "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                )
                .unwrap();
                stream.write_all(&body).unwrap();
            }
        });
        format!("http://{addr}")
    }

    fn fetcher(base_url: String, suffixes: &[&str]) -> GenomeFetcher {
        GenomeFetcher::new(FetchConfig {
            base_url: Some(base_url),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            ..FetchConfig::default()
        })
        .unwrap()
    }

    fn entry(accession: &str) -> AssemblyEntry {
        AssemblyEntry {
            accession: accession.to_string(),
            ftp_path: DIR.to_string(),
        }
    }

    #[test]
    fn test_file_url_and_local_name() {
        let dir = directory_url(DIR, None);
        assert_eq!(
            file_url(&dir, GENOMIC_FNA_SUFFIX),
            "https://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2/GCF_000005845.2_ASM584v2_genomic.fna.gz"
        );
        assert_eq!(
            local_file_name("GCF_000005845.2", GENOMIC_FNA_SUFFIX),
            "GCF_000005845.2_genomic.fna"
        );
    }

    #[test]
    fn test_gzip_suffix() {
        assert!(is_gzip_suffix(GENOMIC_FNA_SUFFIX));
        assert!(!is_gzip_suffix("_assembly_report.txt"));
        assert_eq!(
            local_file_name("GCF_1", "_assembly_report.txt"),
            "GCF_1_assembly_report.txt"
        );
    }

    #[test]
    fn test_gunzip_to() {
        let dir = tempdir().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">chr\nACGT\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let dest = dir.path().join("g_genomic.fna");
        let bytes = gunzip_to(&compressed[..], &dest).unwrap();
        assert_eq!(bytes, 10);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), ">chr\nACGT\n");

        // Only the decompressed file is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_gunzip_rejects_plain_text() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.fna");
        assert!(gunzip_to(&b"not gzip"[..], &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_plan_downloads() {
        let mut entries = HashMap::new();
        for (acc, path) in [("A", DIR), ("B", "na")] {
            entries.insert(
                acc.to_string(),
                AssemblyEntry {
                    accession: acc.to_string(),
                    ftp_path: path.to_string(),
                },
            );
        }
        let accessions: AccessionSet = ["C", "B", "A", "A"]
            .into_iter()
            .map(GenomeAccession::new)
            .collect();

        let (planned, summary) = plan_downloads(&accessions, &entries);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].accession, "A");
        assert_eq!(summary.not_in_summary, vec!["C"]);
        assert_eq!(summary.without_files, vec!["B"]);
    }

    #[test]
    fn test_fetch_genome_decompresses_download() {
        let dir = tempdir().unwrap();
        let base = serve(vec![(200, gzip(b">c\nACGT\n"))]);

        let files = fetcher(base, &[GENOMIC_FNA_SUFFIX])
            .fetch_genome(&entry("GCF_1"), dir.path())
            .unwrap();

        let genome_dir = dir.path().join("GCF_1");
        assert_eq!(files, vec![genome_dir.join("GCF_1_genomic.fna")]);
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), ">c\nACGT\n");
        // The compressed download is not kept
        assert_eq!(std::fs::read_dir(&genome_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_fetch_genome_stores_uncompressed_suffix_as_served() {
        let dir = tempdir().unwrap();
        let report = b"# Assembly name:  ASM584v2\n".to_vec();
        let base = serve(vec![(200, report.clone())]);

        let files = fetcher(base, &["_assembly_report.txt"])
            .fetch_genome(&entry("GCF_1"), dir.path())
            .unwrap();

        let genome_dir = dir.path().join("GCF_1");
        assert_eq!(files, vec![genome_dir.join("GCF_1_assembly_report.txt")]);
        assert_eq!(std::fs::read(&files[0]).unwrap(), report);
        assert_eq!(std::fs::read_dir(&genome_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_fetch_genome_http_error_status() {
        let dir = tempdir().unwrap();
        let base = serve(vec![(404, b"not found".to_vec())]);

        let result =
            fetcher(base, &[GENOMIC_FNA_SUFFIX]).fetch_genome(&entry("GCF_1"), dir.path());
        match result {
            Err(FetchError::Status { url, status }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("_genomic.fna.gz"));
            }
            other => panic!("expected HTTP status error, got {other:?}"),
        }
        assert!(!dir.path().join("GCF_1/GCF_1_genomic.fna").exists());
    }

    #[test]
    fn test_fetch_all_counts_genomes_and_files() {
        let dir = tempdir().unwrap();
        let base = serve(vec![(200, gzip(b">a\nAC\n")), (200, gzip(b">b\nGT\n"))]);

        let mut entries = HashMap::new();
        for acc in ["GCF_1", "GCF_2"] {
            entries.insert(acc.to_string(), entry(acc));
        }
        let accessions: AccessionSet = ["GCF_1", "GCF_3", "GCF_2", "GCF_1"]
            .into_iter()
            .map(GenomeAccession::new)
            .collect();

        let summary = fetcher(base, &[GENOMIC_FNA_SUFFIX])
            .fetch_all(&accessions, &entries, dir.path(), &ProgressBar::hidden())
            .unwrap();

        assert_eq!(summary.genomes_fetched, 2);
        assert_eq!(summary.files_written, 2);
        assert_eq!(summary.not_in_summary, vec!["GCF_3"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("GCF_2/GCF_2_genomic.fna")).unwrap(),
            ">b\nGT\n"
        );
    }
}
