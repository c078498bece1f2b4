//! Whole-document application
//!
//! A [`DocumentApplier`] ties one parsed document to a parser registry and a
//! settings source. [`DocumentRegistry`] hands out one applier per document.

use crate::applier::{ApplyReport, DomApplier};
use crate::config::SettingsSource;
use crate::dom;
use crate::error::{ApplyError, Result};
use crate::locale::lang_from_element;
use crate::parser::{ParserRegistry, SharedParser};
use kuchiki::NodeRef;
use std::rc::Rc;
use std::sync::Arc;

/// Applies phrase breaks to the body of one document
pub struct DocumentApplier {
    document: NodeRef,
    registry: Arc<ParserRegistry>,
    settings: Rc<dyn SettingsSource>,
    language: Option<String>,
}

impl DocumentApplier {
    /// Create an applier for `document`.
    pub fn new(
        document: NodeRef,
        registry: Arc<ParserRegistry>,
        settings: Rc<dyn SettingsSource>,
    ) -> Self {
        Self {
            document,
            registry,
            settings,
            language: None,
        }
    }

    /// Use `lang` instead of the document's `lang` attributes.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    /// The document this applier works on.
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// `<body>`, or the document element when there is none.
    pub fn body(&self) -> Option<NodeRef> {
        dom::find_element(&self.document, "body")
            .or_else(|| dom::find_element(&self.document, "html"))
    }

    /// Language tag the parser is chosen by.
    pub fn language(&self) -> Option<String> {
        if self.language.is_some() {
            return self.language.clone();
        }
        self.body().as_ref().and_then(lang_from_element)
    }

    /// Parser for the document's language, or the registry default.
    pub fn load_parser(&self) -> SharedParser {
        self.registry.resolve(self.language().as_deref())
    }

    /// Insert break opportunities into the document body.
    ///
    /// Settings are read once, before the traversal. Running again only
    /// touches blocks that were not processed before.
    pub fn apply(&self) -> Result<ApplyReport> {
        let body = self.body().ok_or(ApplyError::MissingBody)?;
        let settings = self.settings.load()?;
        let applier = DomApplier::new(self.load_parser())
            .with_separator(&settings.separator)
            .with_class_name(settings.class_name.as_deref());
        Ok(applier.apply_to_element(&body))
    }
}

/// One [`DocumentApplier`] per document, keyed by node identity
pub struct DocumentRegistry {
    registry: Arc<ParserRegistry>,
    settings: Rc<dyn SettingsSource>,
    appliers: Vec<Rc<DocumentApplier>>,
}

impl DocumentRegistry {
    /// Registry whose appliers share `registry` and `settings`.
    pub fn new(registry: Arc<ParserRegistry>, settings: Rc<dyn SettingsSource>) -> Self {
        Self {
            registry,
            settings,
            appliers: Vec::new(),
        }
    }

    /// The applier for `document`, created on first use.
    pub fn from_document(&mut self, document: &NodeRef) -> Rc<DocumentApplier> {
        if let Some(existing) = self.appliers.iter().find(|a| a.document() == document) {
            return existing.clone();
        }
        let applier = Rc::new(DocumentApplier::new(
            document.clone(),
            self.registry.clone(),
            self.settings.clone(),
        ));
        self.appliers.push(applier.clone());
        applier
    }

    /// Number of documents with an applier.
    pub fn len(&self) -> usize {
        self.appliers.len()
    }

    /// Whether no applier was created yet.
    pub fn is_empty(&self) -> bool {
        self.appliers.is_empty()
    }

    /// Drop the applier for `document`. Returns whether one existed.
    pub fn forget(&mut self, document: &NodeRef) -> bool {
        let before = self.appliers.len();
        self.appliers.retain(|a| a.document() != document);
        self.appliers.len() != before
    }
}
