//! Output module
//!
//! Processed documents go to stdout, a file, or a directory; phrases from
//! `segment` go through an [`OutputFormatter`].

use crate::error::CliError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Trait for phrase output formatters
pub trait OutputFormatter {
    /// Format and output a single phrase
    fn format_phrase(&mut self, phrase: &str, offset: usize) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Where processed documents are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Every document to stdout, in input order
    Stdout,
    /// A single output file
    File(PathBuf),
    /// One file per input, named after the input
    Directory(PathBuf),
}

impl OutputTarget {
    /// Choose a target for `inputs` documents.
    ///
    /// An existing directory, a path ending in a separator, or more than one
    /// input selects directory output.
    pub fn resolve(output: Option<&Path>, inputs: usize) -> Self {
        match output {
            None => OutputTarget::Stdout,
            Some(path) => {
                let trailing_separator = path
                    .to_str()
                    .is_some_and(|s| s.ends_with(std::path::MAIN_SEPARATOR) || s.ends_with('/'));
                if path.is_dir() || trailing_separator || inputs > 1 {
                    OutputTarget::Directory(path.to_path_buf())
                } else {
                    OutputTarget::File(path.to_path_buf())
                }
            }
        }
    }

    /// Fail if two of `sources` would be written to the same file.
    ///
    /// Directory output names files after their inputs, so inputs sharing a
    /// file name from different directories collide.
    pub fn check_collisions(&self, sources: &[PathBuf]) -> Result<()> {
        let OutputTarget::Directory(dir) = self else {
            return Ok(());
        };
        let mut seen: HashMap<&std::ffi::OsStr, &Path> = HashMap::new();
        for source in sources {
            let Some(name) = source.file_name() else {
                continue;
            };
            if let Some(first) = seen.insert(name, source) {
                return Err(CliError::ConfigError(format!(
                    "{} and {} would both be written to {}",
                    first.display(),
                    source.display(),
                    dir.join(name).display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Write the processed document read from `source`.
    pub fn write(&self, source: &Path, html: &str) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                if !html.ends_with('\n') {
                    writeln!(stdout)?;
                }
                stdout.flush()?;
                Ok(())
            }
            OutputTarget::File(path) => write_file(path, html),
            OutputTarget::Directory(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
                let name = source
                    .file_name()
                    .with_context(|| format!("Input has no file name: {}", source.display()))?;
                write_file(&dir.join(name), html)
            }
        }
    }
}

fn write_file(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).with_context(|| format!("Failed to write file: {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
