//! Text normalization shared by entry tokens and queries.
//!
//! Compatibility decomposition, combining marks dropped, lowercase, and every
//! run of non-word characters collapsed to a single space.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text into space-separated lowercase words.
///
/// "Ouvrir _Récent…" becomes "ouvrir _recent".
pub fn normalize_text(input: &str) -> String {
    let folded: String = input
        .nfkd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded
        .split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of a query, in order, duplicates kept
pub fn query_words(query: &str) -> Vec<String> {
    normalize_text(query)
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Token set for an entry, drawn from its whole label path
pub fn match_tokens<'a>(labels: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let joined = labels.into_iter().collect::<Vec<_>>().join(" ");
    normalize_text(&joined)
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
