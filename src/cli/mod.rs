//! Command-line interface for core-genes.
//!
//! The pipeline runs as four commands, each consuming the previous one's
//! output:
//!
//! - **fetch**: Download genome assemblies listed in an NCBI assembly summary
//! - **load**: Load Prokka annotations and Roary clusters into a SQLite database
//! - **align**: Codon-align every cluster in the database into an alignment corpus
//! - **extract**: Select core gene clusters and split them by indel pattern
//!
//! Annotation (Prokka) and pan-genome clustering (Roary) run between `fetch`
//! and `load` and are not part of this tool.
//!
//! ## Usage
//!
//! ```text
//! core-genes fetch assembly_summary.txt genomes.txt genomes/
//! core-genes load genomes.txt prokka/ roary/ sequences.db
//! core-genes align sequences.db alignments.csv --threads 8
//! core-genes extract genomes.txt alignments.csv core_genes.aln
//!
//! # JSON summary for scripting
//! core-genes extract genomes.txt alignments.csv core_genes.aln --format json
//! ```

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

pub mod align;
pub mod extract;
pub mod fetch;
pub mod load;

#[derive(Parser)]
#[command(name = "core-genes")]
#[command(version)]
#[command(about = "Extract core gene alignments from a set of bacterial genomes")]
#[command(
    long_about = "core-genes builds per-gene codon alignments for a set of genome assemblies.\n\nGiven Prokka annotations and Roary clusters it stores every gene, aligns each cluster and keeps the core genes: clusters with exactly one member per genome. Core clusters whose members differ in indel pattern are split so that every output block shares one gap layout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download genome assemblies from NCBI
    Fetch(fetch::FetchArgs),

    /// Load annotated genes and clusters into a database
    Load(load::LoadArgs),

    /// Codon-align every gene cluster in a database
    Align(align::AlignArgs),

    /// Extract core gene alignments split by indel pattern
    Extract(extract::ExtractArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Progress bar on stderr; indicatif hides it when stderr is not a terminal
pub(crate) fn progress_bar(message: &'static str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message(message);
    Ok(pb)
}
