//! Appmenu Runner - search the focused application's menu bar
//!
//! Tracks which window has focus, loads the menu its application exports
//! and answers search queries with matching menu items. Selecting a result
//! activates the menu item in the application.

pub mod config;
pub mod error;
pub mod logging;

// Focus tracking and menu access
pub mod focus_tracker;
pub mod menu;

// Query matching
pub mod matching;

// Search host surface
pub mod host;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{load_config, Config};
pub use error::{Result, RunnerError};
pub use focus_tracker::{ignore_window_classes, spawn_tracker, FocusHandle};
pub use runner::Runner;
