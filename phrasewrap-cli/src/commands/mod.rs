//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use phrasewrap_core::ParserRegistry;

pub mod apply;
pub mod segment;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Insert break opportunities into HTML files
    Apply(apply::ApplyArgs),

    /// Split a piece of text into phrases
    Segment(segment::SegmentArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List languages with a registered phrase parser
    Languages,
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Apply(args) => args.execute(),
            Commands::Segment(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

impl ListCommands {
    /// Execute the list command
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Languages => {
                let registry = ParserRegistry::with_builtin();
                println!("Available languages:");
                for tag in registry.languages() {
                    println!("  {tag}");
                }
                println!("Other languages use the default parser.");
            }
        }
        Ok(())
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(quiet: bool, verbose: u8) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    // A logger may already be installed when commands run inside tests
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
