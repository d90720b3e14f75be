//! Configuration module - runner settings
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - The `Config` struct
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_QUERY_CHARS, DEFAULT_PATH_SEPARATOR};
pub use loader::{config_path, load_config, load_config_from};
pub use types::Config;

#[cfg(test)]
pub use defaults::{DEFAULT_EMIT_ANCESTOR_EVENTS, DEFAULT_SLOW_LOAD_THRESHOLD_MS};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
