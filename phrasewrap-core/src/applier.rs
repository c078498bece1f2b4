//! Applying phrase breaks to an element subtree

use crate::classifier::{DefaultStyleResolver, StyleResolver};
use crate::collector::{BlockCollector, BlockContext};
use crate::error::SplitError;
use crate::parser::{PhraseParser, SharedParser};
use crate::splitter::{compute_boundaries, plan_splits, split_text_node, JoinStrategy};
use crate::style::{ensure_class_rule, BlockStyle};
use kuchiki::NodeRef;
use serde::Serialize;
use std::cell::RefCell;

/// What happened to a single block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Empty or whitespace-only text, left untouched
    Whitespace,
    /// The parser found a single phrase, left untouched
    SinglePhrase,
    /// Break opportunities were inserted
    Split {
        /// Number of text nodes that were cut
        nodes_split: usize,
    },
}

/// Counts for one application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Block contexts collected
    pub blocks: usize,
    /// Blocks that received break opportunities
    pub split: usize,
    /// Whitespace-only or single-phrase blocks
    pub unchanged: usize,
    /// Blocks rejected because the parser broke its contract
    pub failed: usize,
}

impl ApplyReport {
    fn record(&mut self, outcome: &Result<BlockOutcome, SplitError>) {
        self.blocks += 1;
        match outcome {
            Ok(BlockOutcome::Split { .. }) => self.split += 1,
            Ok(_) => self.unchanged += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Inserts break opportunities into the blocks of a subtree
pub struct DomApplier {
    parser: SharedParser,
    strategy: JoinStrategy,
    style: BlockStyle,
    styles: Box<dyn StyleResolver>,
    /// Document whose class rule is known to exist
    rule_defined_in: RefCell<Option<NodeRef>>,
}

impl DomApplier {
    /// Applier with the zero-width-space separator and inline styling.
    pub fn new(parser: SharedParser) -> Self {
        Self {
            parser,
            strategy: JoinStrategy::default(),
            style: BlockStyle::Inline,
            styles: Box::new(DefaultStyleResolver),
            rule_defined_in: RefCell::new(None),
        }
    }

    /// Use `separator` at break opportunities; empty inserts `<wbr>`.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.strategy = JoinStrategy::from_separator(separator);
        self
    }

    /// Mark processed blocks with a class instead of inline styles.
    pub fn with_class_name(mut self, class_name: Option<&str>) -> Self {
        self.style = BlockStyle::from_class_name(class_name);
        self
    }

    /// Use a custom computed-style source for unknown elements.
    pub fn with_style_resolver(mut self, styles: impl StyleResolver + 'static) -> Self {
        self.styles = Box::new(styles);
        self
    }

    /// The join strategy in use.
    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    /// The processed-block styling in use.
    pub fn block_style(&self) -> &BlockStyle {
        &self.style
    }

    /// Block contexts under `element` that have not been processed yet.
    pub fn blocks(&self, element: &NodeRef) -> impl Iterator<Item = BlockContext> {
        BlockCollector::new(self.styles.as_ref(), &self.style).collect(element)
    }

    /// Insert break opportunities into every block under `element`.
    ///
    /// `element` may also be the document node itself. Safe to call
    /// repeatedly: processed blocks are skipped. A block whose phrases are
    /// inconsistent is logged and left untouched.
    pub fn apply_to_element(&self, element: &NodeRef) -> ApplyReport {
        let mut report = ApplyReport::default();
        for block in self.blocks(element) {
            let outcome = self.apply_to_block(&block);
            if let Err(e) = &outcome {
                log::warn!("skipping block: {e}");
            }
            report.record(&outcome);
        }
        log::debug!(
            "applied to {} blocks ({} split, {} failed)",
            report.blocks,
            report.split,
            report.failed
        );
        report
    }

    /// Insert break opportunities into one block.
    pub fn apply_to_block(&self, block: &BlockContext) -> Result<BlockOutcome, SplitError> {
        debug_assert!(block.has_text());
        let node_texts = block.node_texts();
        let text = node_texts.concat();
        if text.trim().is_empty() {
            return Ok(BlockOutcome::Whitespace);
        }

        let phrases = self.parser.parse(&text);
        if phrases.len() == 1 {
            if phrases[0] != text {
                return Err(SplitError::TextMismatch {
                    expected: text.len(),
                    actual: phrases[0].len(),
                });
            }
            return Ok(BlockOutcome::SinglePhrase);
        }

        let boundaries = compute_boundaries(&text, &phrases)?;
        log::trace!("boundaries {boundaries:?} in {} bytes", text.len());
        let plans = plan_splits(&node_texts, &boundaries)?;

        let mut nodes_split = 0;
        for (node, chunks) in block.text_nodes.iter().zip(&plans) {
            if let Some(chunks) = chunks {
                split_text_node(node, chunks, &self.strategy);
                nodes_split += 1;
            }
        }
        self.mark(&block.element);
        Ok(BlockOutcome::Split { nodes_split })
    }

    fn mark(&self, element: &NodeRef) {
        self.style.apply(element);
        if let BlockStyle::Class(name) = &self.style {
            let root = crate::dom::root_of(element);
            let mut defined_in = self.rule_defined_in.borrow_mut();
            if defined_in.as_ref() != Some(&root) {
                ensure_class_rule(&root, name);
                *defined_in = Some(root);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, find_element, parse_html, serialize_html};
    use crate::parser::ScriptRunParser;
    use std::sync::Arc;

    fn fixed(phrases: &'static [&'static str]) -> SharedParser {
        Arc::new(move |text: &str| {
            if phrases.concat() == text {
                phrases.iter().map(|p| p.to_string()).collect()
            } else {
                vec![text.to_string()]
            }
        })
    }

    #[test]
    fn test_default_separator() {
        let doc = parse_html("<p>今日は良い天気です。</p>");
        let p = find_element(&doc, "p").unwrap();
        let applier = DomApplier::new(fixed(&["今日は", "良い", "天気です。"]));

        let report = applier.apply_to_element(&p);
        assert_eq!(report.split, 1);
        assert_eq!(dom::text_content(&p), "今日は\u{200B}良い\u{200B}天気です。");
        assert!(dom::attribute(&p, "style").unwrap().contains("word-break: keep-all"));
    }

    #[test]
    fn test_custom_separator() {
        let doc = parse_html("<p>今日は良い天気です。</p>");
        let p = find_element(&doc, "p").unwrap();
        DomApplier::new(fixed(&["今日は", "良い", "天気です。"]))
            .with_separator("|")
            .apply_to_element(&p);
        assert_eq!(dom::text_content(&p), "今日は|良い|天気です。");
    }

    #[test]
    fn test_word_break_markers() {
        let doc = parse_html("<p>今日は<b>良い天気</b>です。</p>");
        let p = find_element(&doc, "p").unwrap();
        DomApplier::new(fixed(&["今日は", "良い", "天気です。"]))
            .with_separator("")
            .with_class_name(Some("wrap"))
            .apply_to_element(&p);
        assert_eq!(
            serialize_html(&p).unwrap(),
            r#"<p class="wrap">今日は<wbr><b>良い<wbr>天気</b>です。</p>"#
        );
    }

    #[test]
    fn test_untouched_nodes_keep_identity() {
        let doc = parse_html("<p>今日は<b>良い</b>天気です。</p>");
        let p = find_element(&doc, "p").unwrap();
        let b = find_element(&doc, "b").unwrap();
        let inner = b.first_child().unwrap();
        let last = p.last_child().unwrap();

        DomApplier::new(fixed(&["今日は良", "い天気です。"]))
            .with_separator("")
            .apply_to_element(&p);
        assert!(b.first_child().unwrap() != inner);
        assert!(p.last_child().unwrap() == last);
        assert_eq!(dom::text_value(&last).as_deref(), Some("天気です。"));
    }

    #[test]
    fn test_whitespace_and_single_phrase_are_noops() {
        let html = "<div><p>   </p><p>一句</p></div>";
        let doc = parse_html(html);
        let before = serialize_html(&doc).unwrap();
        let div = find_element(&doc, "div").unwrap();
        let report = DomApplier::new(Arc::new(ScriptRunParser)).apply_to_element(&div);
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.split, 0);
        assert_eq!(serialize_html(&doc).unwrap(), before);
    }

    #[test]
    fn test_broken_parser_leaves_block_and_continues() {
        let doc = parse_html("<div><p>あいう</p><p>今日は良い天気です。</p></div>");
        let div = find_element(&doc, "div").unwrap();
        let parser: SharedParser = Arc::new(|text: &str| -> Vec<String> {
            if text == "あいう" {
                vec!["あ".to_string(), "え".to_string()]
            } else {
                ScriptRunParser.parse(text)
            }
        });

        let report = DomApplier::new(parser).with_separator("|").apply_to_element(&div);
        assert_eq!(report.failed, 1);
        assert_eq!(report.split, 1);
        assert_eq!(dom::text_content(&div), "あいう今日は|良い|天気です。");
    }

    #[test]
    fn test_class_rule_inserted_lazily() {
        let doc = parse_html("<p>一句</p><p>今日は良い天気です。</p>");
        let body = find_element(&doc, "body").unwrap();
        let applier = DomApplier::new(Arc::new(ScriptRunParser)).with_class_name(Some("wrap"));
        let count_styles = || {
            doc.descendants()
                .filter(|n| dom::is_element_named(n, "style"))
                .count()
        };

        assert_eq!(count_styles(), 0);
        applier.apply_to_element(&body);
        assert_eq!(count_styles(), 1);
        applier.apply_to_element(&body);
        assert_eq!(count_styles(), 1);
    }

    #[test]
    fn test_apply_to_document_node() {
        let doc = parse_html("<p>今日は良い天気です。</p>");
        let report = DomApplier::new(Arc::new(ScriptRunParser))
            .with_separator("|")
            .with_class_name(Some("wrap"))
            .apply_to_element(&doc);
        assert_eq!(report.split, 1);

        let p = find_element(&doc, "p").unwrap();
        assert_eq!(dom::text_content(&p), "今日は|良い|天気です。");
        assert!(dom::has_class(&p, "wrap"));
        let head = find_element(&doc, "head").unwrap();
        assert!(find_element(&head, "style").is_some());
    }

    #[test]
    fn test_detached_subtree_gets_no_style_element() {
        let div = dom::new_element("div");
        div.append(NodeRef::new_text("今日は良い天気です。"));
        let applier = DomApplier::new(Arc::new(ScriptRunParser))
            .with_separator("|")
            .with_class_name(Some("wrap"));

        applier.apply_to_element(&div);
        assert_eq!(dom::text_content(&div), "今日は|良い|天気です。");
        assert!(dom::has_class(&div, "wrap"));
        assert!(find_element(&div, "style").is_none());
    }
}
