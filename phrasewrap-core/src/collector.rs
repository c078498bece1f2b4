//! Block collection
//!
//! Partitions a subtree into inline formatting contexts. Each context owns
//! the ordered text nodes that are laid out together, so phrase boundaries
//! can cross inline markup such as `<b>` or `<a>`.

use crate::classifier::{DomAction, StyleResolver};
use crate::style::BlockStyle;
use kuchiki::{NodeData, NodeRef};
use std::mem;

/// One inline formatting context
#[derive(Debug, Clone)]
pub struct BlockContext {
    /// Element that establishes the context
    pub element: NodeRef,
    /// Text nodes in document order
    pub text_nodes: Vec<NodeRef>,
}

impl BlockContext {
    /// Create an empty context for `element`.
    pub fn new(element: NodeRef) -> Self {
        Self {
            element,
            text_nodes: Vec::new(),
        }
    }

    /// Whether any text node was collected.
    pub fn has_text(&self) -> bool {
        !self.text_nodes.is_empty()
    }

    /// Current value of every text node, in order.
    pub fn node_texts(&self) -> Vec<String> {
        self.text_nodes
            .iter()
            .map(|node| crate::dom::text_value(node).unwrap_or_default())
            .collect()
    }

    /// Concatenated text of the context.
    pub fn text(&self) -> String {
        self.node_texts().concat()
    }

    /// Move the collected text nodes into a completed context, leaving this
    /// one empty.
    fn take(&mut self) -> BlockContext {
        BlockContext {
            element: self.element.clone(),
            text_nodes: mem::take(&mut self.text_nodes),
        }
    }
}

/// Walks a subtree and produces its block contexts
pub struct BlockCollector<'a> {
    styles: &'a dyn StyleResolver,
    marker: &'a BlockStyle,
}

impl<'a> BlockCollector<'a> {
    /// Create a collector that classifies with `styles` and skips elements
    /// already stamped by `marker`.
    pub fn new(styles: &'a dyn StyleResolver, marker: &'a BlockStyle) -> Self {
        Self { styles, marker }
    }

    /// Non-empty block contexts under `element`, nested contexts first.
    ///
    /// A document node is walked from its document element. The walk
    /// finishes before the first context is handed out, so callers may
    /// mutate text nodes while iterating.
    pub fn collect(&self, element: &NodeRef) -> std::vec::IntoIter<BlockContext> {
        let mut blocks = Vec::new();
        if element.as_document().is_some() {
            for child in element.children().filter(|c| c.as_element().is_some()) {
                self.visit(&child, None, &mut blocks);
            }
        } else {
            self.visit(element, None, &mut blocks);
        }
        blocks.into_iter()
    }

    fn visit(
        &self,
        element: &NodeRef,
        parent: Option<&mut BlockContext>,
        out: &mut Vec<BlockContext>,
    ) {
        if self.marker.is_processed(element) {
            return;
        }

        let action = DomAction::for_element(element, self.styles);
        match action {
            DomAction::Skip => return,
            DomAction::Break => {
                if let Some(parent) = parent {
                    if parent.has_text() {
                        out.push(parent.take());
                    }
                }
                debug_assert!(
                    element.first_child().is_none(),
                    "break elements must not have children"
                );
                return;
            }
            DomAction::Inline | DomAction::Block => {}
        }

        // An inline element splices into the parent context; anything else
        // starts its own.
        let mut own = None;
        let block = match parent {
            Some(parent) if action == DomAction::Inline => parent,
            _ => own.insert(BlockContext::new(element.clone())),
        };

        for child in element.children() {
            match child.data() {
                NodeData::Element(_) => self.visit(&child, Some(&mut *block), out),
                NodeData::Text(_) => block.text_nodes.push(child.clone()),
                _ => {}
            }
        }

        if let Some(block) = own {
            if block.has_text() {
                out.push(block);
            }
        }
    }
}
