//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Maximum number of results returned from a single match call
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Queries shorter than this (after trimming) never produce results
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Window classes belonging to the search host itself.
/// Focus changes to these windows keep the previous application's menu.
pub const DEFAULT_IGNORED_WINDOW_CLASSES: &[&str] = &["krunner"];

/// Whether `run` brackets the click with "opened"/"closed" ancestor events
pub const DEFAULT_EMIT_ANCESTOR_EVENTS: bool = false;

/// Separator between ancestor labels in result text
pub const DEFAULT_PATH_SEPARATOR: &str = " » ";

/// Menu loads slower than this are logged as warnings
pub const DEFAULT_SLOW_LOAD_THRESHOLD_MS: u64 = 250;
