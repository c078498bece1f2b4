//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs phrases as JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    phrases: Vec<PhraseData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseData {
    /// The phrase text
    pub text: String,
    /// Starting byte offset in the original text
    pub offset: usize,
    /// Length of the phrase in bytes
    pub length: usize,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            phrases: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_phrase(&mut self, phrase: &str, offset: usize) -> Result<()> {
        self.phrases.push(PhraseData {
            text: phrase.to_string(),
            offset,
            length: phrase.len(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.phrases)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
