//! Configuration loading from the file system

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use super::types::Config;

/// Default location: `<config dir>/appmenu-runner/config.json`
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("appmenu-runner")
        .join("config.json")
}

/// Load configuration from the default location.
///
/// Returns `Config::default()` if the file is missing or invalid.
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path, falling back to defaults.
#[instrument(name = "load_config")]
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Failed to load config, using defaults");
            Config::default()
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
