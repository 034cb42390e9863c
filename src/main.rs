//! Realty - Main Entry Point
//!
//! Trains the price regressor and scores an example row.

use clap::Parser;
use realty_regressor::cli::{cmd_inspect, cmd_predict, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realty=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { source } => cmd_train(&source.into_config())?,
        Commands::Predict { source } => cmd_predict(&source.into_config())?,
        Commands::Inspect { source } => cmd_inspect(&source.into_config())?,
    }

    Ok(())
}
