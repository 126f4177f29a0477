use std::path::PathBuf;

use clap::Args;

use crate::cli::{progress_bar, OutputFormat};
use crate::parsing::accession::AccessionSet;
use crate::parsing::roary::CLUSTERED_PROTEINS;
use crate::store::loader::{LoadSummary, SequenceLoader};
use crate::store::SequenceStore;
use crate::utils::validation::{require_dir, require_file};

#[derive(Args)]
pub struct LoadArgs {
    /// Accessions to load, one per line
    pub accessions: PathBuf,

    /// Prokka output: one `<accession>/<accession>.{faa,ffn}` pair per genome
    pub annotation_dir: PathBuf,

    /// Roary output directory containing `clustered_proteins`
    pub roary_dir: PathBuf,

    /// SQLite database to create; existing tables are replaced
    pub database: PathBuf,
}

/// Execute load subcommand
///
/// # Errors
///
/// Returns an error if an input is missing or malformed, or the database
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LoadArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    require_file(&args.accessions)?;
    require_dir(&args.annotation_dir)?;
    require_file(&args.roary_dir.join(CLUSTERED_PROTEINS))?;

    let accessions = AccessionSet::load(&args.accessions)?;
    if verbose {
        eprintln!("Loading {} genomes into {}", accessions.count(), args.database.display());
    }

    let store = SequenceStore::open(&args.database)?;

    let progress = progress_bar("genomes loaded")?;
    let summary = SequenceLoader::new(&store).load_all(
        &accessions,
        &args.annotation_dir,
        &args.roary_dir,
        &progress,
    )?;
    progress.finish_and_clear();

    match format {
        OutputFormat::Text => print_text_summary(&summary, &args.database),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("genomes\tsequences\tcluster_rows\tclusters");
            println!(
                "{}\t{}\t{}\t{}",
                summary.genomes, summary.sequences, summary.cluster_rows, summary.clusters
            );
        }
    }

    Ok(())
}

fn print_text_summary(summary: &LoadSummary, database: &std::path::Path) {
    println!(
        "Loaded {} sequences from {} genomes and {} clusters into {}",
        summary.sequences,
        summary.genomes,
        summary.clusters,
        database.display()
    );
}
