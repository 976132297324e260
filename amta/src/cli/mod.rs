//! amta CLI - Command-line interface for AMTA container tools

pub mod commands;
pub mod progress;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use tracing::Level;

use crate::config::BatchOptions;

#[derive(Parser)]
#[command(name = "amta")]
#[command(about = "amta: decode LZO payloads from AMTA containers", long_about = None)]
#[command(version)]
struct Cli {
    /// Log every file processed and every skip reason
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Load batch options from a TOML file (flags override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Run the amta CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => BatchOptions::load(path)?,
        None => BatchOptions::default(),
    };
    options.verbose |= cli.verbose;

    // Setup logging
    let level = if options.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute(options)?;

    Ok(())
}
