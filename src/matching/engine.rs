//! Match Engine
//!
//! Scores entries by word-level containment: every query word must appear
//! inside some token of the entry's label path. A word scores by how much
//! of the token it covers, and the entry scores the mean over its words.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::DEFAULT_MIN_QUERY_CHARS;
use crate::menu::{MenuEntry, MenuSource, MenuTransport, TransportError};

use super::enablement::EnablementCache;
use super::normalize::query_words;

/// Property key carrying the entry's keyboard shortcut
pub const SUBTEXT_PROPERTY: &str = "subtext";

/// How a result relates to the query, ordered by strength.
/// Serialized as the integer the search host expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "i32")]
pub enum MatchKind {
    NoMatch,
    CompletionMatch,
    PossibleMatch,
    InformationalMatch,
    HelperMatch,
    ExactMatch,
}

impl MatchKind {
    pub fn value(self) -> i32 {
        match self {
            MatchKind::NoMatch => 0,
            MatchKind::CompletionMatch => 10,
            MatchKind::PossibleMatch => 30,
            MatchKind::InformationalMatch => 50,
            MatchKind::HelperMatch => 70,
            MatchKind::ExactMatch => 100,
        }
    }

    /// Classify a positive entry score
    fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            MatchKind::ExactMatch
        } else {
            MatchKind::PossibleMatch
        }
    }
}

impl From<MatchKind> for i32 {
    fn from(kind: MatchKind) -> Self {
        kind.value()
    }
}

/// A single result handed to the search host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMatch {
    pub action_id: String,
    #[serde(rename = "text")]
    pub action_text: String,
    /// Empty when the entry has no icon
    pub icon_name: String,
    pub match_kind: MatchKind,
    /// In (0, 1]
    pub relevance: f64,
    pub properties: BTreeMap<String, String>,
}

impl QueryMatch {
    fn from_entry(entry: &MenuEntry, relevance: f64) -> Self {
        let mut properties = BTreeMap::new();
        if let Some(shortcut) = &entry.shortcut {
            properties.insert(SUBTEXT_PROPERTY.to_string(), shortcut.clone());
        }
        Self {
            action_id: entry.action_id.clone(),
            action_text: entry.action_text.clone(),
            icon_name: entry.icon_name.clone().unwrap_or_default(),
            match_kind: MatchKind::from_score(relevance),
            relevance,
            properties,
        }
    }

    pub fn subtext(&self) -> Option<&str> {
        self.properties.get(SUBTEXT_PROPERTY).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    min_query_chars: usize,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_CHARS)
    }
}

impl MatchEngine {
    pub fn new(min_query_chars: usize) -> Self {
        Self { min_query_chars }
    }

    /// Score `entries` against `query`, dropping non-matches and disabled
    /// entries. Results keep entry order; ranking is left to the caller.
    #[instrument(skip(self, entries, transport), fields(entry_count = entries.len()))]
    pub fn match_entries<T: MenuTransport + ?Sized>(
        &self,
        query: &str,
        entries: &[MenuEntry],
        transport: &T,
        source: &MenuSource,
    ) -> Result<Vec<QueryMatch>, TransportError> {
        if query.trim().chars().count() < self.min_query_chars {
            return Ok(Vec::new());
        }

        let words = query_words(query);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut enablement = EnablementCache::new(transport, source);
        let mut matches = Vec::new();
        for entry in entries {
            let score = score_entry(&words, &entry.match_tokens);
            if score <= 0.0 {
                continue;
            }
            if !enablement.is_enabled(entry)? {
                continue;
            }
            matches.push(QueryMatch::from_entry(entry, score));
        }

        debug!(match_count = matches.len(), "Matched entries");
        Ok(matches)
    }
}

/// Mean over `words` of the best coverage of a token containing the word.
/// Returns 0.0 as soon as one word is found in no token.
pub fn score_entry(words: &[String], tokens: &BTreeSet<String>) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for word in words {
        let word_len = word.chars().count() as f64;
        let best = tokens
            .iter()
            .filter(|token| token.contains(word.as_str()))
            .map(|token| word_len / token.chars().count() as f64)
            .fold(0.0_f64, f64::max);
        if best <= 0.0 {
            return 0.0;
        }
        total += best;
    }
    total / words.len() as f64
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
