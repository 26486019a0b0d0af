//! Configuration loading from file system

use std::path::Path;

use tracing::{info, instrument, warn};

use super::defaults::CONFIG_FILE_NAME;
use super::types::{default_data_dir, Config};

/// Load configuration from `<default data dir>/config.json`.
///
/// Returns `Config::default()` if the file is missing or invalid.
pub fn load_config() -> Config {
    load_config_from(&default_data_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from an explicit path.
#[instrument(name = "load_config")]
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, path = %config_path.display(), "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(content.trim()) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            let error_hint = if e.to_string().contains("unknown variant") {
                "\n\nHint: 'variant' must be either \"basic\" or \"extended\"."
            } else {
                ""
            };
            warn!(
                error = %e,
                hint = %error_hint,
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}
