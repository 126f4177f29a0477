use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::align::cluster::{AlignSummary, ClusterAligner};
use crate::align::muscle::MuscleAligner;
use crate::align::AlignConfig;
use crate::cli::{progress_bar, OutputFormat};
use crate::store::SequenceStore;
use crate::utils::validation::require_file;

#[derive(Args)]
pub struct AlignArgs {
    /// SQLite database written by `load`
    pub database: PathBuf,

    /// Alignment corpus to write (CSV: cluster,seqid,seqtype,seq,genome)
    pub output: PathBuf,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// MUSCLE executable
    #[arg(long, default_value = "muscle")]
    pub muscle: PathBuf,

    /// Extra argument passed to the aligner (repeatable)
    #[arg(long = "muscle-arg", allow_hyphen_values = true)]
    pub muscle_args: Vec<String>,

    /// Smallest cluster to align
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
    pub min_members: u32,
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if the database cannot be read, the aligner fails, or
/// the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    require_file(&args.database)?;

    let config = AlignConfig {
        threads: args.threads,
        muscle: args.muscle,
        min_members: args.min_members as usize,
        ..AlignConfig::default()
    };
    if verbose {
        eprintln!("Aligning clusters with {}", config.muscle.display());
    }

    let store = SequenceStore::open(&args.database)?;
    let aligner = MuscleAligner::new(config.muscle.clone()).with_args(args.muscle_args);

    let mut writer = BufWriter::new(File::create(&args.output)?);
    let progress = progress_bar("clusters aligned")?;
    let summary = ClusterAligner::new(&store, &aligner, config).run(&mut writer, &progress)?;
    writer.flush()?;
    progress.finish_and_clear();

    match format {
        OutputFormat::Text => print_text_summary(&summary, &args.output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("clusters_aligned\tclusters_skipped\tnucleotide_records\tprotein_records\tdropped_nucleotides");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                summary.clusters_aligned,
                summary.clusters_skipped,
                summary.nucleotide_records,
                summary.protein_records,
                summary.dropped_nucleotides
            );
        }
    }

    Ok(())
}

fn print_text_summary(summary: &AlignSummary, output: &std::path::Path) {
    println!(
        "Aligned {} clusters ({} nucleotide and {} protein records), which were saved to {}",
        summary.clusters_aligned,
        summary.nucleotide_records,
        summary.protein_records,
        output.display()
    );
    if summary.dropped_nucleotides > 0 {
        println!(
            "{} nucleotide sequences were shorter than their protein and were dropped",
            summary.dropped_nucleotides
        );
    }
}
