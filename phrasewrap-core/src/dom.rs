//! Helpers over the kuchiki DOM
//!
//! The engine works on a live `kuchiki` tree. Node identity is `Rc` pointer
//! identity, which `NodeRef`'s `PartialEq` already compares.

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ExpandedName, NodeRef};
use std::io;

/// HTML namespace URI
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse a complete HTML document.
///
/// html5ever builds the whole tree synchronously, so the returned document is
/// always fully loaded.
pub fn parse_html(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Serialize a node (a document serializes its children) back to HTML.
pub fn serialize_html(node: &NodeRef) -> io::Result<String> {
    let mut out = Vec::new();
    node.serialize(&mut out)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Create a new, childless HTML element.
pub fn new_element(tag: &str) -> NodeRef {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    NodeRef::new_element(name, std::iter::empty::<(ExpandedName, Attribute)>())
}

/// Lower-case local name of an element, `None` for other node kinds.
pub fn tag_name(node: &NodeRef) -> Option<&str> {
    node.as_element().map(|element| &*element.name.local)
}

/// Whether `node` is an element with the given local name.
pub fn is_element_named(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

/// Attribute value of an element.
pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

/// Set an attribute on an element. No-op for non-elements.
pub fn set_attribute(node: &NodeRef, name: &str, value: impl Into<String>) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.into());
    }
}

/// Whether the element's `class` attribute lists `class`.
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attribute(node, "class").is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
}

/// Append `class` to the element's class list unless already present.
pub fn add_class(node: &NodeRef, class: &str) {
    if has_class(node, class) {
        return;
    }
    let list = match attribute(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
        _ => class.to_string(),
    };
    set_attribute(node, "class", list);
}

/// Current value of a text node.
pub fn text_value(node: &NodeRef) -> Option<String> {
    node.as_text().map(|text| text.borrow().clone())
}

/// Topmost ancestor of `node` (the document for attached nodes).
pub fn root_of(node: &NodeRef) -> NodeRef {
    node.ancestors().last().unwrap_or_else(|| node.clone())
}

/// First descendant element of `root` with the given local name.
pub fn find_element(root: &NodeRef, tag: &str) -> Option<NodeRef> {
    root.descendants().find(|node| is_element_named(node, tag))
}

/// Concatenated value of every text node under `node`.
pub fn text_content(node: &NodeRef) -> String {
    node.text_contents()
}
