//! vaultcheck - run yield-vault scenarios on a forked sandbox.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_fee, run_scenarios, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run_scenarios(&args, cli.format).await?,
        Commands::Validate(args) => run_validate(&args, cli.format)?,
        Commands::Fee(args) => run_fee(&args, cli.format)?,
    }

    Ok(())
}
