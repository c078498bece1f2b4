//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - outputs phrases joined by a separator on one line
pub struct TextFormatter<W: Write> {
    writer: W,
    separator: String,
    started: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, separator: impl Into<String>) -> Self {
        Self {
            writer,
            separator: separator.into(),
            started: false,
        }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout(separator: impl Into<String>) -> Self {
        Self::new(io::stdout(), separator)
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_phrase(&mut self, phrase: &str, _offset: usize) -> Result<()> {
        if self.started {
            self.writer.write_all(self.separator.as_bytes())?;
        }
        self.writer.write_all(phrase.as_bytes())?;
        self.started = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
