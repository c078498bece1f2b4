//! User settings and where they come from

use crate::error::SettingsError;
use crate::splitter::ZWSP;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Class name stamped on processed blocks by [`crate::DocumentApplier`]
pub const DEFAULT_CLASS_NAME: &str = "phrasewrap";

/// Settings read once per application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inserted at every break opportunity; empty inserts `<wbr>` instead
    pub separator: String,

    /// Class for processed blocks; `None` or empty writes inline styles instead
    pub class_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: ZWSP.to_string(),
            class_name: Some(DEFAULT_CLASS_NAME.to_string()),
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }
}

/// Capability that provides [`Settings`]
pub trait SettingsSource {
    /// Load the current settings.
    fn load(&self) -> Result<Settings, SettingsError>;
}

impl SettingsSource for Settings {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.clone())
    }
}

/// Settings stored in a TOML file, read on every load
#[derive(Debug, Clone)]
pub struct TomlSettingsFile {
    path: PathBuf,
}

impl TomlSettingsFile {
    /// Read settings from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for TomlSettingsFile {
    fn load(&self) -> Result<Settings, SettingsError> {
        let source = fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        let settings = Settings::from_toml_str(&source)?;
        log::debug!("loaded settings from {}", self.path.display());
        Ok(settings)
    }
}
