//! Markup text normalization.
//!
//! Product descriptions arrive as storefront HTML. Tags are dropped with a
//! plain "anything between angle brackets" rule, entities are decoded and
//! whitespace is collapsed. Malformed markup degrades to partial stripping,
//! never to an error.

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("valid list item pattern"));

/// Remove tags, decode entities and collapse whitespace.
///
/// # Example
/// ```
/// use flatfile::markup::strip;
///
/// assert_eq!(strip("<p>Fast&nbsp;<b>drying</b></p>"), "Fast drying");
/// assert_eq!(strip(""), "");
/// ```
pub fn strip(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let without_tags = TAG.replace_all(markup, " ");
    let decoded = decode_html_entities(&without_tags);
    normalize_whitespace(&decoded)
}

/// Plain text of every `<li>` span, empty items dropped, at most `max_items`.
pub fn extract_list_items(markup: &str, max_items: usize) -> Vec<String> {
    LIST_ITEM
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|inner| strip(inner.as_str()))
        .filter(|item| !item.is_empty())
        .take(max_items)
        .collect()
}

/// Collapse any whitespace run to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix of at most `budget` characters. Not word-boundary aware.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
