//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Runner configuration, read from `config.json`.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Cap on results per query (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minimum trimmed query length in characters (default: 3)
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    /// Window classes whose activation doesn't change the tracked menu
    /// (default: ["krunner"])
    #[serde(default = "default_ignored_window_classes")]
    pub ignored_window_classes: Vec<String>,
    /// Send "opened"/"closed" events to ancestors around the click (default: false)
    #[serde(default = "default_emit_ancestor_events")]
    pub emit_ancestor_events: bool,
    /// Separator used to build result text from the label path (default: " » ")
    #[serde(default = "default_path_separator")]
    pub path_separator: String,
    /// Menu loads slower than this log a warning (default: 250)
    #[serde(default = "default_slow_load_threshold_ms")]
    pub slow_load_threshold_ms: u64,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_ignored_window_classes() -> Vec<String> {
    DEFAULT_IGNORED_WINDOW_CLASSES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_emit_ancestor_events() -> bool {
    DEFAULT_EMIT_ANCESTOR_EVENTS
}
fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}
fn default_slow_load_threshold_ms() -> u64 {
    DEFAULT_SLOW_LOAD_THRESHOLD_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_results: DEFAULT_MAX_RESULTS,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            ignored_window_classes: default_ignored_window_classes(),
            emit_ancestor_events: DEFAULT_EMIT_ANCESTOR_EVENTS,
            path_separator: default_path_separator(),
            slow_load_threshold_ms: DEFAULT_SLOW_LOAD_THRESHOLD_MS,
        }
    }
}
