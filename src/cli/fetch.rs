use std::path::PathBuf;

use clap::Args;

use crate::cli::{progress_bar, OutputFormat};
use crate::fetch::{FetchConfig, FetchSummary, GenomeFetcher, GENOMIC_FNA_SUFFIX};
use crate::parsing::accession::AccessionSet;
use crate::parsing::assembly_summary::parse_summary_file;
use crate::utils::validation::{ensure_dir, require_file};

#[derive(Args)]
pub struct FetchArgs {
    /// NCBI assembly summary (assembly_summary_refseq.txt or similar)
    pub assembly_summary: PathBuf,

    /// Accessions to download, one per line
    pub accessions: PathBuf,

    /// Directory receiving one sub-directory per genome
    pub out_dir: PathBuf,

    /// Download from this base URL instead of https://ftp.ncbi.nlm.nih.gov
    #[arg(long)]
    pub base_url: Option<String>,

    /// File suffixes to download per assembly (repeatable)
    #[arg(long = "suffix", default_value = GENOMIC_FNA_SUFFIX)]
    pub suffixes: Vec<String>,
}

/// Execute fetch subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read or a download fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FetchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    require_file(&args.assembly_summary)?;
    require_file(&args.accessions)?;
    ensure_dir(&args.out_dir)?;

    let accessions = AccessionSet::load(&args.accessions)?;
    let entries = parse_summary_file(&args.assembly_summary, |acc| accessions.contains(acc))?;

    if verbose {
        eprintln!(
            "{} of {} requested accessions found in assembly summary",
            entries.len(),
            accessions.count()
        );
    }

    let config = FetchConfig {
        base_url: args.base_url,
        suffixes: args.suffixes,
        ..FetchConfig::default()
    };
    let fetcher = GenomeFetcher::new(config)?;

    let progress = progress_bar("genomes downloaded")?;
    let summary = fetcher.fetch_all(&accessions, &entries, &args.out_dir, &progress)?;
    progress.finish_and_clear();

    match format {
        OutputFormat::Text => print_text_summary(&summary, &args.out_dir),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(summary: &FetchSummary, out_dir: &std::path::Path) {
    println!(
        "Downloaded {} genomes ({} files) into {}",
        summary.genomes_fetched,
        summary.files_written,
        out_dir.display()
    );
    if !summary.not_in_summary.is_empty() {
        println!(
            "Not in assembly summary: {}",
            summary.not_in_summary.join(", ")
        );
    }
    if !summary.without_files.is_empty() {
        println!("No files at NCBI: {}", summary.without_files.join(", "));
    }
}

fn print_tsv_summary(summary: &FetchSummary) {
    println!("genomes_fetched\tfiles_written\tnot_in_summary\twithout_files");
    println!(
        "{}\t{}\t{}\t{}",
        summary.genomes_fetched,
        summary.files_written,
        summary.not_in_summary.len(),
        summary.without_files.len()
    );
}
