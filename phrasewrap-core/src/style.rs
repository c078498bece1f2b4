//! Block styling and the processed marker
//!
//! A split block is stamped so that later traversals skip it, and so that the
//! browser keeps phrases together (`word-break: keep-all`) while still being
//! allowed to wrap anywhere as a last resort.

use crate::dom;
use kuchiki::NodeRef;

/// Attribute that marks a processed element when no class name is configured
pub const MARKER_ATTRIBUTE: &str = "data-phrasewrap";

/// Declarations applied to every processed block
pub const BLOCK_DECLARATIONS: [(&str, &str); 2] =
    [("word-break", "keep-all"), ("overflow-wrap", "anywhere")];

/// CSS rule text that defines `class_name`.
pub fn class_rule(class_name: &str) -> String {
    let body = BLOCK_DECLARATIONS
        .iter()
        .map(|(property, value)| format!("{property}: {value};"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(".{class_name} {{ {body} }}")
}

/// How processed blocks are styled and recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStyle {
    /// Add a class whose rule lives in a `<style>` element
    Class(String),
    /// Write the declarations into the element's `style` attribute
    Inline,
}

impl BlockStyle {
    /// Class mode when a usable class name is given, inline mode otherwise.
    ///
    /// Names that would need CSS escaping, or that hold whitespace, fall back
    /// to inline mode with a warning.
    pub fn from_class_name(class_name: Option<&str>) -> Self {
        let name = match class_name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return BlockStyle::Inline,
        };
        if is_class_identifier(name) {
            BlockStyle::Class(name.to_string())
        } else {
            log::warn!("class name {name:?} is not a plain CSS identifier; using inline styles");
            BlockStyle::Inline
        }
    }

    /// Whether `element` was already processed.
    pub fn is_processed(&self, element: &NodeRef) -> bool {
        match self {
            BlockStyle::Class(name) => dom::has_class(element, name),
            BlockStyle::Inline => dom::attribute(element, MARKER_ATTRIBUTE).is_some(),
        }
    }

    /// Stamp `element` as processed.
    ///
    /// Class mode only adds the class; callers are responsible for
    /// [`ensure_class_rule`] on the owning document.
    pub fn apply(&self, element: &NodeRef) {
        match self {
            BlockStyle::Class(name) => dom::add_class(element, name),
            BlockStyle::Inline => {
                let existing = dom::attribute(element, "style").unwrap_or_default();
                dom::set_attribute(element, "style", with_block_declarations(&existing));
                dom::set_attribute(element, MARKER_ATTRIBUTE, "");
            }
        }
    }
}

/// Whether `name` can be used as a class selector without escaping.
pub fn is_class_identifier(name: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
    let mut chars = name.chars();
    let starts_ok = match chars.next() {
        Some('-') => matches!(chars.next(), Some(c) if allowed(c) && !c.is_ascii_digit()),
        Some(c) => allowed(c) && !c.is_ascii_digit(),
        None => false,
    };
    starts_ok && name.chars().all(allowed)
}

/// `source` with the block declarations appended.
///
/// The existing text is kept as is. A declaration already set to the wanted
/// value is not repeated; any other value is overridden by appending, since
/// the later declaration wins.
pub fn with_block_declarations(source: &str) -> String {
    let current = InlineStyle::parse(source);
    let missing: Vec<String> = BLOCK_DECLARATIONS
        .iter()
        .filter(|(property, value)| current.get(property) != Some(*value))
        .map(|(property, value)| format!("{property}: {value};"))
        .collect();
    if missing.is_empty() {
        return source.to_string();
    }
    if source.trim().is_empty() {
        return missing.join(" ");
    }

    let mut out = source.to_string();
    if !source.trim_end().ends_with(';') {
        out.push(';');
    }
    if !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(&missing.join(" "));
    out
}

/// Make sure the document holding `node` defines `class_name`.
///
/// Existing `<style>` elements are scanned first, so documents styled by an
/// earlier run never get a second copy. A detached subtree has nowhere to
/// hold the rule and is left alone. Returns `true` if a rule was added.
pub fn ensure_class_rule(node: &NodeRef, class_name: &str) -> bool {
    let root = dom::root_of(node);
    let rule = class_rule(class_name);
    let defined = root
        .descendants()
        .filter(|n| dom::is_element_named(n, "style"))
        .any(|n| dom::text_content(&n).trim() == rule);
    if defined {
        return false;
    }

    let style = dom::new_element("style");
    style.append(NodeRef::new_text(rule));
    match dom::find_element(&root, "head") {
        Some(head) => head.append(style),
        None => match dom::find_element(&root, "html") {
            Some(html) => {
                let head = dom::new_element("head");
                head.append(style);
                html.prepend(head);
            }
            None if root.as_document().is_some() => root.prepend(style),
            None => {
                log::debug!("no document to hold the rule for .{class_name}");
                return false;
            }
        },
    }
    log::debug!("inserted style rule for .{class_name}");
    true
}

/// Declarations read from a `style` attribute, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a `style` attribute value. Malformed declarations are dropped.
    ///
    /// Semicolons inside quotes or parentheses do not end a declaration.
    pub fn parse(source: &str) -> Self {
        let declarations = split_declarations(source)
            .into_iter()
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = value.trim();
                if property.is_empty() || value.is_empty() {
                    return None;
                }
                Some((property, value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    /// Value of the last declaration of `property`, without `!important`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| {
                let value = value.trim();
                value
                    .strip_suffix("!important")
                    .map(str::trim_end)
                    .unwrap_or(value)
            })
    }

    /// Whether no declaration survived parsing.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn split_declarations(source: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                pieces.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&source[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_element, parse_html};

    #[test]
    fn test_class_rule_text() {
        assert_eq!(
            class_rule("phrasewrap"),
            ".phrasewrap { word-break: keep-all; overflow-wrap: anywhere; }"
        );
    }

    #[test]
    fn test_from_class_name() {
        assert_eq!(
            BlockStyle::from_class_name(Some("x")),
            BlockStyle::Class("x".to_string())
        );
        assert_eq!(BlockStyle::from_class_name(Some("  ")), BlockStyle::Inline);
        assert_eq!(BlockStyle::from_class_name(None), BlockStyle::Inline);
        assert_eq!(
            BlockStyle::from_class_name(Some(" phrase-wrap_2 ")),
            BlockStyle::Class("phrase-wrap_2".to_string())
        );
        assert_eq!(
            BlockStyle::from_class_name(Some("分かち")),
            BlockStyle::Class("分かち".to_string())
        );
    }

    #[test]
    fn test_unusable_class_names_fall_back_to_inline() {
        for name in ["a b", "a.b", "1x", "-2x", "-", "x{y}", "a\tb"] {
            assert!(!is_class_identifier(name), "{name:?}");
            assert_eq!(BlockStyle::from_class_name(Some(name)), BlockStyle::Inline);
        }
        assert!(is_class_identifier("-x"));
        assert!(is_class_identifier("_x"));
    }

    #[test]
    fn test_inline_style_parse() {
        let style = InlineStyle::parse("color: red; word-break: normal !important;;bogus");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("WORD-BREAK"), Some("normal"));
        assert_eq!(style.get("bogus"), None);

        let style = InlineStyle::parse(
            "background: url(data:image/png;base64,AAAA) no-repeat; content: 'a;b'; display: block",
        );
        assert_eq!(
            style.get("background"),
            Some("url(data:image/png;base64,AAAA) no-repeat")
        );
        assert_eq!(style.get("content"), Some("'a;b'"));
        assert_eq!(style.get("display"), Some("block"));
    }

    #[test]
    fn test_block_declarations_are_appended() {
        assert_eq!(
            with_block_declarations(""),
            "word-break: keep-all; overflow-wrap: anywhere;"
        );
        assert_eq!(
            with_block_declarations("color: red;"),
            "color: red; word-break: keep-all; overflow-wrap: anywhere;"
        );
        assert_eq!(
            with_block_declarations("word-break: normal"),
            "word-break: normal; word-break: keep-all; overflow-wrap: anywhere;"
        );
        assert_eq!(
            with_block_declarations("overflow-wrap: anywhere"),
            "overflow-wrap: anywhere; word-break: keep-all;"
        );
        let done = "word-break: keep-all; overflow-wrap: anywhere;";
        assert_eq!(with_block_declarations(done), done);
    }

    #[test]
    fn test_inline_mode_marks_element() {
        let doc = parse_html(r#"<p style="color: red">x</p>"#);
        let p = find_element(&doc, "p").unwrap();
        let style = BlockStyle::Inline;
        assert!(!style.is_processed(&p));

        style.apply(&p);
        assert!(style.is_processed(&p));
        assert_eq!(
            dom::attribute(&p, "style").as_deref(),
            Some("color: red; word-break: keep-all; overflow-wrap: anywhere;")
        );
    }

    #[test]
    fn test_class_mode_marks_element() {
        let doc = parse_html("<p>x</p>");
        let p = find_element(&doc, "p").unwrap();
        let style = BlockStyle::Class("wrap".to_string());
        style.apply(&p);
        assert!(style.is_processed(&p));
        assert!(dom::attribute(&p, "style").is_none());
    }

    #[test]
    fn test_ensure_class_rule_once() {
        let doc = parse_html("<p>x</p>");
        let p = find_element(&doc, "p").unwrap();
        assert!(ensure_class_rule(&p, "wrap"));
        assert!(!ensure_class_rule(&p, "wrap"));

        let styles: Vec<_> = doc
            .descendants()
            .filter(|n| dom::is_element_named(n, "style"))
            .collect();
        assert_eq!(styles.len(), 1);
        assert!(dom::is_element_named(&styles[0].parent().unwrap(), "head"));
    }

    #[test]
    fn test_inline_mode_keeps_existing_style_text() {
        let source = "background: url(data:image/png;base64,AAAA) no-repeat; content: 'a;b'";
        let doc = parse_html(&format!(r#"<p style="{source}">x</p>"#));
        let p = find_element(&doc, "p").unwrap();
        BlockStyle::Inline.apply(&p);

        let style = dom::attribute(&p, "style").unwrap();
        assert_eq!(
            style,
            format!("{source}; word-break: keep-all; overflow-wrap: anywhere;")
        );
        let parsed = InlineStyle::parse(&style);
        assert_eq!(parsed.get("word-break"), Some("keep-all"));
        assert_eq!(parsed.get("overflow-wrap"), Some("anywhere"));
        assert_eq!(parsed.get("content"), Some("'a;b'"));
    }

    #[test]
    fn test_ensure_class_rule_skips_detached_tree() {
        let div = dom::new_element("div");
        div.append(NodeRef::new_text("x"));
        assert!(!ensure_class_rule(&div, "wrap"));
        assert_eq!(div.children().count(), 1);
        assert_eq!(dom::text_content(&div), "x");
    }

    #[test]
    fn test_ensure_class_rule_bare_document() {
        let doc = NodeRef::new_document();
        assert!(ensure_class_rule(&doc, "wrap"));
        let first = doc.first_child().unwrap();
        assert!(dom::is_element_named(&first, "style"));
    }
}
