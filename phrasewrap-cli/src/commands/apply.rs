//! Apply command implementation

use super::init_logging;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::OutputTarget;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use phrasewrap_core::{dom, DocumentApplier, ParserRegistry, Settings, SettingsSource};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

/// Arguments for the apply command
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Input HTML files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file, or directory for several inputs (default: stdout)
    #[arg(short, long, value_name = "FILE|DIR")]
    pub output: Option<PathBuf>,

    /// String inserted at break opportunities (empty inserts <wbr>)
    #[arg(short, long, value_name = "STRING", conflicts_with = "no_separator")]
    pub separator: Option<String>,

    /// Insert <wbr> elements instead of a separator character
    #[arg(long)]
    pub no_separator: bool,

    /// Class added to processed blocks
    #[arg(long, value_name = "NAME", conflicts_with = "inline_style")]
    pub class_name: Option<String>,

    /// Write inline styles instead of a class and a style rule
    #[arg(long)]
    pub inline_style: bool,

    /// Language tag overriding the documents' lang attributes
    #[arg(short, long, value_name = "TAG")]
    pub lang: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print block counts as JSON to stderr
    #[arg(long)]
    pub stats: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ApplyArgs {
    /// Execute the apply command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.quiet, self.verbose);

        log::info!("Starting HTML processing");
        log::debug!("Arguments: {self:?}");

        let config = CliConfig::load_or_default(self.config.as_deref())?;
        let settings: Rc<dyn SettingsSource> = Rc::new(self.settings(&config));
        let registry = Arc::new(ParserRegistry::with_builtin());

        let files = resolve_patterns(&self.input)?;
        let target = OutputTarget::resolve(self.output.as_deref(), files.len());
        target.check_collisions(&files)?;
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        for path in &files {
            let html = FileReader::read_html(path)?;
            let document = dom::parse_html(&html);

            let mut applier =
                DocumentApplier::new(document.clone(), registry.clone(), settings.clone());
            if let Some(lang) = self.language(&applier, &config) {
                applier = applier.with_language(lang);
            }
            let report = applier
                .apply()
                .map_err(CliError::from)
                .with_context(|| format!("Failed to process {}", path.display()))?;
            log::debug!("{}: {report:?}", path.display());

            let output = dom::serialize_html(&document)
                .with_context(|| format!("Failed to serialize {}", path.display()))?;
            target.write(path, &output)?;
            progress.file_completed(&path.display().to_string(), &report);
        }

        progress.finish();
        if self.stats {
            eprintln!("{}", serde_json::to_string(progress.totals())?);
        }
        Ok(())
    }

    /// Settings from the config file with command-line flags on top
    pub fn settings(&self, config: &CliConfig) -> Settings {
        let mut settings = config.settings.clone();
        if self.no_separator {
            settings.separator = String::new();
        } else if let Some(separator) = &self.separator {
            settings.separator = separator.clone();
        }

        if self.inline_style {
            settings.class_name = None;
        } else if let Some(class_name) = &self.class_name {
            settings.class_name = Some(class_name.clone());
        }
        settings
    }

    /// Language override: the flag, else the configured default for
    /// documents without a `lang` attribute
    fn language(&self, applier: &DocumentApplier, config: &CliConfig) -> Option<String> {
        if self.lang.is_some() {
            return self.lang.clone();
        }
        if applier.language().is_none() {
            return config.locale.default.clone();
        }
        None
    }
}
