//! Segment command implementation

use super::init_logging;
use crate::output::{JsonFormatter, OutputFormatter, TextFormatter};
use anyhow::Result;
use clap::Args;
use phrasewrap_core::{ParserRegistry, PhraseParser, SharedParser};
use std::io;

/// Arguments for the segment command
#[derive(Debug, Args)]
pub struct SegmentArgs {
    /// Text to split into phrases
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Language tag selecting the parser
    #[arg(short, long, value_name = "TAG")]
    pub lang: Option<String>,

    /// Separator between phrases in text output
    #[arg(short, long, default_value = "|")]
    pub separator: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Phrases joined by the separator on one line
    Text,
    /// JSON array of phrases with byte offsets
    Json,
}

impl SegmentArgs {
    /// Execute the segment command
    pub fn execute(&self) -> Result<()> {
        init_logging(false, 0);
        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::stdout(self.separator.clone())),
            OutputFormat::Json => Box::new(JsonFormatter::new(io::stdout())),
        };
        self.write_phrases(formatter.as_mut())
    }

    /// Parser for `--lang`, or the default parser without one
    pub fn parser(&self, registry: &ParserRegistry) -> SharedParser {
        match &self.lang {
            Some(lang) => registry.resolve(Some(lang.as_str())),
            None => registry.default_parser(),
        }
    }

    fn write_phrases(&self, formatter: &mut dyn OutputFormatter) -> Result<()> {
        let registry = ParserRegistry::with_builtin();
        let mut offset = 0;
        for phrase in self.parser(&registry).parse(&self.text) {
            formatter.format_phrase(&phrase, offset)?;
            offset += phrase.len();
        }
        formatter.finish()
    }
}
