//! Locale resolution
//!
//! Finds the language of a subtree from `lang` attributes and reduces a BCP 47
//! tag to the key parsers are registered under.

use crate::dom;
use kuchiki::NodeRef;

/// Subtags that imply Traditional Chinese when no script subtag is present:
/// regions (Hong Kong, Macau, Taiwan) and languages written in Hant.
const HANT_SUBTAGS: [&str; 7] = ["hk", "mo", "tw", "hak", "lzh", "nan", "yue"];

/// Language of `element`, from the nearest `lang` attribute on it or an
/// ancestor.
pub fn lang_from_element(element: &NodeRef) -> Option<String> {
    std::iter::once(element.clone())
        .chain(element.ancestors())
        .filter_map(|node| dom::attribute(&node, "lang"))
        .map(|lang| lang.trim().to_string())
        .find(|lang| !lang.is_empty())
}

/// Reduce a language tag to a parser key.
///
/// The primary subtag is lower-cased and returned alone, except for `zh`,
/// which needs a script: `zh-hans` or `zh-hant`.
pub fn normalize_locale(locale: &str) -> Option<String> {
    let mut subtags = locale.trim().split(['-', '_']);
    let lang = subtags.next().filter(|s| !s.is_empty())?.to_ascii_lowercase();
    if lang != "zh" {
        return Some(lang);
    }

    let rest: Vec<&str> = subtags.collect();
    if let Some(script) = rest
        .iter()
        .find(|s| s.eq_ignore_ascii_case("hans") || s.eq_ignore_ascii_case("hant"))
    {
        return Some(format!("zh-{}", script.to_ascii_lowercase()));
    }
    let traditional = rest
        .iter()
        .any(|s| HANT_SUBTAGS.iter().any(|t| s.eq_ignore_ascii_case(t)));
    Some(if traditional { "zh-hant" } else { "zh-hans" }.to_string())
}
