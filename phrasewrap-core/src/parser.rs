//! Phrase parsers and the per-locale registry
//!
//! Segmentation itself is an external capability: anything that splits text
//! into phrases which concatenate back to the input can drive the engine.

use crate::locale::normalize_locale;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Splits text into phrases
///
/// Implementations must return non-empty phrases whose concatenation is
/// exactly `text`. The splitter checks this and rejects the block otherwise.
pub trait PhraseParser: Send + Sync {
    /// Split `text` into phrases.
    fn parse(&self, text: &str) -> Vec<String>;
}

impl<F> PhraseParser for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn parse(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Shared parser handle
pub type SharedParser = Arc<dyn PhraseParser>;

/// Parsers keyed by normalized locale, with a fallback
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, SharedParser>,
    default: SharedParser,
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("languages", &self.parsers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ParserRegistry {
    /// Create a registry with only a default parser.
    pub fn new(default: SharedParser) -> Self {
        Self {
            parsers: BTreeMap::new(),
            default,
        }
    }

    /// Registry with [`ScriptRunParser`] for Japanese and both Chinese scripts.
    pub fn with_builtin() -> Self {
        let parser: SharedParser = Arc::new(ScriptRunParser);
        let mut registry = Self::new(parser.clone());
        for tag in ["ja", "zh-hans", "zh-hant"] {
            registry.register(tag, parser.clone());
        }
        registry
    }

    /// Register `parser` under `tag`, normalizing the tag first.
    pub fn register(&mut self, tag: &str, parser: SharedParser) {
        let key = normalize_locale(tag).unwrap_or_else(|| tag.to_ascii_lowercase());
        self.parsers.insert(key, parser);
    }

    /// Replace the fallback parser.
    pub fn set_default(&mut self, parser: SharedParser) {
        self.default = parser;
    }

    /// Parser registered under an already-normalized tag.
    pub fn get(&self, tag: &str) -> Option<SharedParser> {
        self.parsers.get(tag).cloned()
    }

    /// Registered locale keys, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }

    /// The fallback parser.
    pub fn default_parser(&self) -> SharedParser {
        self.default.clone()
    }

    /// Parser for a raw language tag, or the fallback with a warning.
    pub fn resolve(&self, lang: Option<&str>) -> SharedParser {
        let normalized = lang.and_then(normalize_locale);
        if let Some(parser) = normalized.as_deref().and_then(|tag| self.get(tag)) {
            log::debug!("using parser for {normalized:?}");
            return parser;
        }
        log::warn!("No parser for {normalized:?}, using the default parser");
        self.default_parser()
    }
}

/// Coarse character class used by [`ScriptRunParser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Hiragana,
    Katakana,
    Han,
    Alphanumeric,
    Whitespace,
    Open,
    Close,
    Other,
}

impl CharClass {
    fn of(ch: char) -> Self {
        match ch {
            '\u{3041}'..='\u{309F}' => CharClass::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
                CharClass::Katakana
            }
            '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{3005}'
            | '\u{3006}' => CharClass::Han,
            '「' | '『' | '（' | '(' | '【' | '〈' | '《' | '〔' | '［' | '[' | '｛' | '“'
            | '‘' => CharClass::Open,
            '」' | '』' | '）' | ')' | '】' | '〉' | '》' | '〕' | '］' | ']' | '｝' | '”'
            | '’' | '、' | '。' | '，' | '．' | '！' | '？' | '!' | '?' | ',' | '.' | '：'
            | '；' => CharClass::Close,
            c if c.is_whitespace() => CharClass::Whitespace,
            c if c.is_alphanumeric() => CharClass::Alphanumeric,
            _ => CharClass::Other,
        }
    }

    /// Whether a phrase may end between `self` and `next`.
    fn breaks_before(self, next: CharClass) -> bool {
        use CharClass::*;
        match (self, next) {
            (_, Close) | (_, Whitespace) | (Open, _) => false,
            (_, Open) | (Close, _) | (Whitespace, _) => true,
            // A content word starts after particles and okurigana.
            (Hiragana, Han | Katakana | Alphanumeric) => true,
            (Alphanumeric, Han | Katakana) | (Han | Katakana, Alphanumeric) => true,
            _ => false,
        }
    }
}

/// Breaks between script runs and after punctuation
///
/// Not a linguistic model: it only knows character classes. It keeps
/// okurigana and particles with the preceding word and never breaks inside a
/// run of one script, which is enough to stop mid-word wrapping in most
/// Japanese prose. Chinese text without punctuation stays one phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRunParser;

impl PhraseParser for ScriptRunParser {
    fn parse(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut start = 0;
        let mut prev: Option<CharClass> = None;

        for (i, ch) in text.char_indices() {
            let class = CharClass::of(ch);
            if let Some(prev) = prev {
                if prev.breaks_before(class) {
                    phrases.push(text[start..i].to_string());
                    start = i;
                }
            }
            prev = Some(class);
        }
        if start < text.len() {
            phrases.push(text[start..].to_string());
        }
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_run_parser_japanese() {
        let phrases = ScriptRunParser.parse("今日は良い天気です。");
        assert_eq!(phrases, vec!["今日は", "良い", "天気です。"]);
    }

    #[test]
    fn test_script_run_parser_punctuation_and_brackets() {
        let phrases = ScriptRunParser.parse("彼は「こんにちは」と言った。次へ");
        assert_eq!(
            phrases,
            vec!["彼は", "「こんにちは」", "と", "言った。", "次へ"]
        );
    }

    #[test]
    fn test_script_run_parser_mixed_latin() {
        let phrases = ScriptRunParser.parse("Rustで書く");
        assert_eq!(phrases, vec!["Rustで", "書く"]);
    }

    #[test]
    fn test_script_run_parser_concatenates_back() {
        for text in ["", " ", "abc def", "カタカナとひらがな、漢字。", "（注）"] {
            let phrases = ScriptRunParser.parse(text);
            assert_eq!(phrases.concat(), text);
            assert!(phrases.iter().all(|p| !p.is_empty()));
        }
    }

    #[test]
    fn test_closure_parser() {
        let parser = |text: &str| -> Vec<String> {
            text.split_inclusive(' ').map(str::to_string).collect()
        };
        let phrases = PhraseParser::parse(&parser, "a b c");
        assert_eq!(phrases, vec!["a ", "b ", "c"]);
    }

    #[test]
    fn test_registry_resolve() {
        let registry = ParserRegistry::with_builtin();
        assert_eq!(registry.languages(), vec!["ja", "zh-hans", "zh-hant"]);
        assert!(registry.get("ja").is_some());
        assert!(registry.get("th").is_none());

        let fallback = registry.resolve(Some("th"));
        assert!(Arc::ptr_eq(&fallback, &registry.default_parser()));
    }

    #[test]
    fn test_registry_register_normalizes() {
        let fixed: SharedParser = Arc::new(|text: &str| vec![text.to_string()]);
        let mut registry = ParserRegistry::with_builtin();
        registry.register("zh-TW", fixed.clone());

        let resolved = registry.resolve(Some("zh-Hant-HK"));
        assert!(Arc::ptr_eq(&resolved, &fixed));
    }
}
