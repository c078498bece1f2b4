//! Boundary mapping and text splitting
//!
//! Phrase lengths become byte offsets into the block text. The offsets are
//! then mapped back onto the original text nodes: every node that contains a
//! boundary is cut there, every other node is left alone.
//!
//! Splitting is two-phase. [`plan_splits`] validates and computes every cut
//! without touching the DOM; only a complete plan is committed with
//! [`split_text_node`].

use crate::dom;
use crate::error::SplitError;
use kuchiki::NodeRef;

/// U+200B ZERO WIDTH SPACE, the default separator
pub const ZWSP: &str = "\u{200B}";

/// How a break opportunity is realized inside a text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinStrategy {
    /// Join the chunks with this string in the same node
    Separator(String),
    /// Replace the node with text nodes separated by `<wbr>` elements
    WordBreak,
}

impl JoinStrategy {
    /// `WordBreak` for an empty separator, `Separator` otherwise.
    pub fn from_separator(separator: &str) -> Self {
        if separator.is_empty() {
            JoinStrategy::WordBreak
        } else {
            JoinStrategy::Separator(separator.to_string())
        }
    }
}

impl Default for JoinStrategy {
    fn default() -> Self {
        JoinStrategy::Separator(ZWSP.to_string())
    }
}

/// Cumulative phrase lengths, with the last one pushed past the text end.
///
/// The final boundary is a sentinel: a break at the very end of a block is
/// never needed.
pub fn compute_boundaries<S: AsRef<str>>(
    text: &str,
    phrases: &[S],
) -> Result<Vec<usize>, SplitError> {
    if phrases.is_empty() {
        return Err(SplitError::NoPhrases);
    }

    let mut boundaries = Vec::with_capacity(phrases.len());
    let mut offset = 0;
    for (index, phrase) in phrases.iter().enumerate() {
        let phrase = phrase.as_ref();
        if phrase.is_empty() {
            return Err(SplitError::EmptyPhrase { index });
        }
        if text.get(offset..offset + phrase.len()) != Some(phrase) {
            let actual = phrases.iter().map(|p| p.as_ref().len()).sum();
            return Err(SplitError::TextMismatch {
                expected: text.len(),
                actual,
            });
        }
        offset += phrase.len();
        boundaries.push(offset);
    }
    if offset != text.len() {
        return Err(SplitError::TextMismatch {
            expected: text.len(),
            actual: offset,
        });
    }

    if let Some(last) = boundaries.last_mut() {
        *last += 1;
    }
    Ok(boundaries)
}

/// Chunks for every node, `None` where no boundary falls inside the node.
///
/// A boundary that coincides with the end of a node cuts that node, leaving an
/// empty last chunk; the break belongs to the earlier node.
pub fn plan_splits<S: AsRef<str>>(
    node_texts: &[S],
    boundaries: &[usize],
) -> Result<Vec<Option<Vec<String>>>, SplitError> {
    let text_len: usize = node_texts.iter().map(|t| t.as_ref().len()).sum();
    match boundaries.last() {
        Some(&last) if last > text_len => {}
        _ => return Err(SplitError::MissingSentinel { text_len }),
    }

    let mut plans = Vec::with_capacity(node_texts.len());
    let mut boundary_index = 0;
    let mut boundary = boundaries[0];
    // Offset of the current node's first byte in the block text
    let mut node_start = 0;

    for node_text in node_texts {
        let node_text = node_text.as_ref();
        let node_end = node_start + node_text.len();
        if node_text.is_empty() || boundary > node_end {
            plans.push(None);
            node_start = node_end;
            continue;
        }

        let mut chunks = Vec::new();
        let mut chunk_start = 0;
        while boundary <= node_end {
            let cut = boundary - node_start;
            if cut <= chunk_start {
                return Err(SplitError::NonIncreasingBoundary {
                    previous: node_start + chunk_start,
                    next: boundary,
                });
            }
            let chunk = node_text
                .get(chunk_start..cut)
                .ok_or(SplitError::NotCharBoundary { offset: boundary })?;
            chunks.push(chunk.to_string());
            chunk_start = cut;

            boundary_index += 1;
            let next = boundaries[boundary_index];
            if next <= boundary {
                return Err(SplitError::NonIncreasingBoundary {
                    previous: boundary,
                    next,
                });
            }
            boundary = next;
        }
        chunks.push(node_text[chunk_start..].to_string());
        plans.push(Some(chunks));
        node_start = node_end;
    }

    let expected = boundaries.len() - 1;
    if boundary_index != expected {
        return Err(SplitError::UnconsumedBoundaries {
            consumed: boundary_index,
            expected,
        });
    }
    log::trace!("planned {expected} cuts over {} nodes", node_texts.len());
    Ok(plans)
}

/// Replace the content of `node` with `chunks` joined per `strategy`.
///
/// `chunks` must concatenate to the node's current value.
pub fn split_text_node(node: &NodeRef, chunks: &[String], strategy: &JoinStrategy) {
    debug_assert!(chunks.len() > 1);
    debug_assert_eq!(dom::text_value(node).as_deref(), Some(chunks.concat().as_str()));

    match strategy {
        JoinStrategy::Separator(separator) => {
            if let Some(text) = node.as_text() {
                *text.borrow_mut() = chunks.join(separator);
            }
        }
        JoinStrategy::WordBreak => {
            for (i, chunk) in chunks.iter().enumerate() {
                if i > 0 {
                    node.insert_before(dom::new_element("wbr"));
                }
                if !chunk.is_empty() {
                    node.insert_before(NodeRef::new_text(chunk.as_str()));
                }
            }
            node.detach();
        }
    }
}
