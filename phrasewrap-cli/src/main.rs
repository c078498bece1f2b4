//! phrasewrap command-line entry point

use anyhow::Result;
use clap::Parser;
use phrasewrap_cli::commands::Commands;

/// Insert phrase-aware line break opportunities into HTML
#[derive(Debug, Parser)]
#[command(name = "phrasewrap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
