//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read an HTML file, dropping a leading byte order mark
    pub fn read_html(path: &Path) -> Result<String> {
        let content = Self::read_text(path)?;
        Ok(match content.strip_prefix('\u{FEFF}') {
            Some(rest) => rest.to_string(),
            None => content,
        })
    }
}
