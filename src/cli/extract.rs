use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{progress_bar, OutputFormat};
use crate::parsing::accession::AccessionSet;
use crate::parsing::alignment::AlignmentCorpus;
use crate::splitting::pipeline::{CoreGeneExtractor, ExtractConfig, ExtractSummary};
use crate::utils::validation::require_file;

#[derive(Args)]
pub struct ExtractArgs {
    /// Accessions of the study set, one per line; their count defines "core"
    pub accessions: PathBuf,

    /// Alignment corpus written by `align` (CSV: cluster,seqid,seqtype,seq[,genome])
    pub alignments: PathBuf,

    /// Output file of `=`-terminated FASTA groups, one per sub-cluster
    pub output: PathBuf,

    /// Fail on a cluster with more members than genomes instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if an input is missing or malformed, a core cluster fails
/// a data integrity check, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    require_file(&args.accessions)?;
    require_file(&args.alignments)?;

    let accessions = AccessionSet::load(&args.accessions)?;
    let corpus = AlignmentCorpus::load(&args.alignments)?;

    if verbose {
        eprintln!(
            "Loaded {} nucleotide clusters for {} genomes",
            corpus.len(),
            accessions.count()
        );
    }

    let extractor = CoreGeneExtractor::with_config(
        accessions.count(),
        ExtractConfig {
            strict: args.strict,
        },
    );

    let mut writer = BufWriter::new(File::create(&args.output)?);
    let progress = progress_bar("core clusters written")?;
    let summary = extractor.run(&corpus, &mut writer, &progress)?;
    writer.flush()?;
    progress.finish_and_clear();

    match format {
        OutputFormat::Text => print_text_summary(&summary, &args.output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("clusters_seen\tcore_clusters\tsub_clusters\tsplit_clusters\tsequences_written\toversized_clusters");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                summary.clusters_seen,
                summary.core_clusters,
                summary.sub_clusters,
                summary.split_clusters,
                summary.sequences_written,
                summary.oversized_clusters
            );
        }
    }

    Ok(())
}

fn print_text_summary(summary: &ExtractSummary, output: &Path) {
    println!(
        "Total {} core gene alignments extracted, which were saved to {}",
        summary.core_clusters,
        output.display()
    );
    if summary.split_clusters > 0 {
        println!(
            "{} of them were split by indel pattern into {} groups",
            summary.split_clusters, summary.sub_clusters
        );
    }
    if summary.oversized_clusters > 0 {
        println!(
            "{} clusters had more members than genomes and were skipped",
            summary.oversized_clusters
        );
    }
}
