//! Element classification
//!
//! Decides, per element, whether it joins the surrounding inline formatting
//! context, starts its own, is excluded from segmentation, or forces a line
//! break.
//!
//! Reference: HTML Living Standard - Rendering
//! https://html.spec.whatwg.org/multipage/rendering.html

use crate::dom;
use crate::style::InlineStyle;
use kuchiki::NodeRef;
use std::collections::HashMap;
use std::sync::OnceLock;

/// What the collector does with an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomAction {
    /// Belongs to the parent inline formatting context
    Inline,
    /// Starts a new inline formatting context
    Block,
    /// Neither the element nor its descendants are segmented
    Skip,
    /// Forces a line break; must not have children
    Break,
}

/// Tag names with a fixed action. Lookup never forces style resolution.
const DOM_ACTIONS: &[(&str, DomAction)] = &[
    // Hidden elements
    // https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements
    ("area", DomAction::Skip),
    ("base", DomAction::Skip),
    ("basefont", DomAction::Skip),
    ("datalist", DomAction::Skip),
    ("head", DomAction::Skip),
    ("link", DomAction::Skip),
    ("meta", DomAction::Skip),
    ("noembed", DomAction::Skip),
    ("noframes", DomAction::Skip),
    ("param", DomAction::Skip),
    ("rp", DomAction::Skip),
    ("script", DomAction::Skip),
    ("style", DomAction::Skip),
    ("template", DomAction::Skip),
    ("title", DomAction::Skip),
    ("noscript", DomAction::Skip),
    // Flow content
    // https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3
    ("hr", DomAction::Break),
    ("listing", DomAction::Skip),
    ("plaintext", DomAction::Skip),
    ("pre", DomAction::Skip),
    ("xmp", DomAction::Skip),
    // Phrasing content
    // https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3
    ("br", DomAction::Break),
    ("rt", DomAction::Skip),
    // Form controls
    ("input", DomAction::Skip),
    ("select", DomAction::Skip),
    ("button", DomAction::Skip),
    ("textarea", DomAction::Skip),
    // Content where phrase-based breaking does more harm than good
    ("abbr", DomAction::Skip),
    ("code", DomAction::Skip),
    ("iframe", DomAction::Skip),
    ("time", DomAction::Skip),
    ("var", DomAction::Skip),
];

static ACTION_TABLE: OnceLock<HashMap<&'static str, DomAction>> = OnceLock::new();

/// Fixed action for a tag name, if the table has one.
pub fn action_for_tag(tag: &str) -> Option<DomAction> {
    let table = ACTION_TABLE.get_or_init(|| DOM_ACTIONS.iter().copied().collect());
    table.get(tag.to_ascii_lowercase().as_str()).copied()
}

/// Tag names the table classifies as `action`.
pub fn tags_with_action(action: DomAction) -> impl Iterator<Item = &'static str> {
    DOM_ACTIONS
        .iter()
        .filter(move |(_, a)| *a == action)
        .map(|(tag, _)| *tag)
}

/// Effective `display` of an element, reduced to what classification needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// `display: inline`
    Inline,
    /// Inline-level but establishes its own formatting context
    InlineBlock,
    /// Any block-level or internal display type
    Block,
    /// `display: none`
    None,
}

impl Display {
    /// Parse a CSS `display` value. Unknown values are block-level.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "inline" => Display::Inline,
            "inline-block" | "inline-flex" | "inline-grid" | "inline-table" => {
                Display::InlineBlock
            }
            "none" => Display::None,
            _ => Display::Block,
        }
    }
}

/// Effective `white-space` of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpace {
    /// `normal`
    #[default]
    Normal,
    /// `nowrap`
    Nowrap,
    /// `pre`
    Pre,
    /// `pre-wrap`
    PreWrap,
    /// `pre-line`
    PreLine,
    /// `break-spaces`
    BreakSpaces,
}

impl WhiteSpace {
    /// Parse a CSS `white-space` value, `None` if unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim().to_ascii_lowercase().as_str() {
            "normal" => WhiteSpace::Normal,
            "nowrap" => WhiteSpace::Nowrap,
            "pre" => WhiteSpace::Pre,
            "pre-wrap" => WhiteSpace::PreWrap,
            "pre-line" => WhiteSpace::PreLine,
            "break-spaces" => WhiteSpace::BreakSpaces,
            _ => return None,
        })
    }

    /// Whether text is laid out literally, so inserted breaks would be wrong.
    pub fn preserves_formatting(self) -> bool {
        matches!(self, WhiteSpace::Nowrap | WhiteSpace::Pre)
    }
}

/// Source of computed style for elements without a fixed table action
pub trait StyleResolver {
    /// Effective `display` of `element`
    fn display(&self, element: &NodeRef) -> Display;

    /// Effective `white-space` of `element`
    fn white_space(&self, element: &NodeRef) -> WhiteSpace;
}

/// User-agent defaults overridden by the element's own `style` attribute
///
/// There is no cascade from stylesheets; hosts that have one should provide
/// their own [`StyleResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyleResolver;

impl DefaultStyleResolver {
    fn inline_style(element: &NodeRef) -> Option<InlineStyle> {
        dom::attribute(element, "style").map(|s| InlineStyle::parse(&s))
    }

    /// User-agent default `display` for a tag name.
    pub fn default_display(tag: &str) -> Display {
        match tag {
            "html" | "body" | "address" | "article" | "aside" | "blockquote" | "center"
            | "dd" | "details" | "dialog" | "dir" | "div" | "dl" | "dt" | "fieldset"
            | "figcaption" | "figure" | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5"
            | "h6" | "header" | "hgroup" | "hr" | "legend" | "li" | "main" | "menu" | "nav"
            | "ol" | "optgroup" | "option" | "p" | "search" | "section" | "summary" | "ul" => {
                Display::Block
            }
            "table" | "caption" | "colgroup" | "col" | "thead" | "tbody" | "tfoot" | "tr"
            | "td" | "th" => Display::Block,
            "ruby" | "img" | "video" | "audio" | "canvas" | "object" | "embed" | "meter"
            | "progress" => Display::InlineBlock,
            "head" | "style" | "script" | "meta" | "link" | "title" | "noscript" | "template"
            | "area" | "base" | "datalist" | "param" | "rp" => Display::None,
            // Everything else defaults to inline
            _ => Display::Inline,
        }
    }

    fn default_white_space(tag: &str) -> WhiteSpace {
        match tag {
            "pre" | "listing" | "plaintext" | "xmp" => WhiteSpace::Pre,
            "nobr" => WhiteSpace::Nowrap,
            "textarea" => WhiteSpace::PreWrap,
            _ => WhiteSpace::Normal,
        }
    }
}

impl StyleResolver for DefaultStyleResolver {
    fn display(&self, element: &NodeRef) -> Display {
        if let Some(value) =
            Self::inline_style(element).and_then(|s| s.get("display").map(Display::parse))
        {
            return value;
        }
        dom::tag_name(element)
            .map(Self::default_display)
            .unwrap_or(Display::Block)
    }

    fn white_space(&self, element: &NodeRef) -> WhiteSpace {
        if let Some(value) = Self::inline_style(element)
            .and_then(|s| s.get("white-space").and_then(WhiteSpace::parse))
        {
            return value;
        }
        dom::tag_name(element)
            .map(Self::default_white_space)
            .unwrap_or_default()
    }
}

impl DomAction {
    /// Classify `element`, falling back to `styles` for unknown tags.
    pub fn for_element(element: &NodeRef, styles: &dyn StyleResolver) -> Self {
        // Non-elements carry no rendering of their own.
        let Some(tag) = dom::tag_name(element) else {
            return DomAction::Skip;
        };
        if let Some(action) = action_for_tag(tag) {
            return action;
        }

        if styles.white_space(element).preserves_formatting() {
            return DomAction::Skip;
        }
        match styles.display(element) {
            Display::Inline => DomAction::Inline,
            _ => DomAction::Block,
        }
    }
}
