//! Phrase-aware line breaking for HTML documents
//!
//! CJK text has no spaces, so browsers may wrap it between any two
//! characters. This crate walks a parsed HTML tree, groups text into the
//! inline formatting contexts a browser would lay out together, asks a
//! [`PhraseParser`] where the phrases are, and inserts break opportunities
//! (a separator character or `<wbr>`) only at phrase boundaries. Processed
//! blocks get `word-break: keep-all` so the browser wraps nowhere else.
//!
//! # Architecture
//!
//! - **Classification**: [`classifier`] decides per element whether it is
//!   inline, a block, skipped, or a forced break.
//! - **Collection**: [`collector`] partitions a subtree into
//!   [`BlockContext`]s.
//! - **Splitting**: [`splitter`] maps phrase boundaries onto text nodes and
//!   rewrites only the nodes a boundary falls in.
//! - **Application**: [`DomApplier`] runs the pipeline on a subtree,
//!   [`DocumentApplier`] on a whole document with settings and locale.
//!
//! # Example
//!
//! ```rust
//! use phrasewrap_core::{dom, DomApplier, ScriptRunParser};
//! use std::sync::Arc;
//!
//! let document = dom::parse_html("<p>今日は良い天気です。</p>");
//! let p = dom::find_element(&document, "p").unwrap();
//!
//! let applier = DomApplier::new(Arc::new(ScriptRunParser)).with_separator("|");
//! let report = applier.apply_to_element(&p);
//!
//! assert_eq!(report.split, 1);
//! assert_eq!(dom::text_content(&p), "今日は|良い|天気です。");
//! ```

#![warn(missing_docs)]

pub mod applier;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod document;
pub mod dom;
pub mod error;
pub mod locale;
pub mod parser;
pub mod splitter;
pub mod style;

pub use applier::{ApplyReport, BlockOutcome, DomApplier};
pub use classifier::{DefaultStyleResolver, Display, DomAction, StyleResolver, WhiteSpace};
pub use collector::{BlockCollector, BlockContext};
pub use config::{Settings, SettingsSource, TomlSettingsFile, DEFAULT_CLASS_NAME};
pub use document::{DocumentApplier, DocumentRegistry};
pub use error::{ApplyError, Result, SettingsError, SplitError};
pub use locale::{lang_from_element, normalize_locale};
pub use parser::{ParserRegistry, PhraseParser, ScriptRunParser, SharedParser};
pub use splitter::{JoinStrategy, ZWSP};
pub use style::BlockStyle;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_public_exports() {
        let registry = ParserRegistry::with_builtin();
        assert!(registry.get("ja").is_some());
        assert_eq!(normalize_locale("zh-HK").as_deref(), Some("zh-hant"));
        assert_eq!(JoinStrategy::from_separator(ZWSP), JoinStrategy::default());

        let applier = DomApplier::new(Arc::new(ScriptRunParser));
        assert_eq!(applier.block_style(), &BlockStyle::Inline);
    }
}
