//! Error types
//!
//! A failed block is reported and skipped; it never aborts the rest of the
//! document. Settings and document-level failures surface to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// The phrase list or boundary list broke an invariant the splitter relies on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The parser returned no phrases for non-empty text
    #[error("parser returned no phrases")]
    NoPhrases,

    /// The parser returned an empty phrase
    #[error("phrase {index} is empty")]
    EmptyPhrase {
        /// Index of the empty phrase
        index: usize,
    },

    /// Phrases do not concatenate back to the block text
    #[error("phrases do not reproduce the text (expected {expected} bytes, got {actual})")]
    TextMismatch {
        /// Byte length of the block text
        expected: usize,
        /// Total byte length of the phrases
        actual: usize,
    },

    /// Boundaries are not strictly increasing
    #[error("boundary {next} does not follow {previous}")]
    NonIncreasingBoundary {
        /// The earlier boundary
        previous: usize,
        /// The offending boundary
        next: usize,
    },

    /// A boundary falls inside a UTF-8 sequence
    #[error("boundary {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Byte offset in the block text
        offset: usize,
    },

    /// The last boundary is not past the end of the text
    #[error("boundary list has no sentinel past {text_len}")]
    MissingSentinel {
        /// Byte length of the block text
        text_len: usize,
    },

    /// Not every real boundary landed in a text node
    #[error("consumed {consumed} of {expected} boundaries")]
    UnconsumedBoundaries {
        /// Boundaries cut
        consumed: usize,
        /// Real (non-sentinel) boundaries
        expected: usize,
    },
}

/// Settings could not be loaded
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// The settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Settings are not valid TOML for [`crate::Settings`]
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Document-level failures
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Settings could not be loaded
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The document has neither `<body>` nor a document element
    #[error("document has no body element")]
    MissingBody,
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, ApplyError>;
