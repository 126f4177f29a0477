use clap::Parser;
use tracing_subscriber::EnvFilter;

use core_genes::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("core_genes=debug,info")
    } else {
        EnvFilter::new("core_genes=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Fetch(args) => {
            cli::fetch::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Load(args) => {
            cli::load::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Extract(args) => {
            cli::extract::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
