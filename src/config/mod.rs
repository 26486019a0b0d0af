//! Configuration module - settings and user preferences
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, ToneConfig, MarkerConfig)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{CONFIG_FILE_NAME, DEFAULT_CATEGORY};

pub use types::{default_data_dir, Config, MarkerConfig, ToneConfig};

pub use loader::{load_config, load_config_from};

#[cfg(test)]
pub use defaults::{
    BASIC_DATABASE_FILE_NAME, DEFAULT_TONE_DURATION_MS, DEFAULT_TONE_FREQUENCY_HZ,
    EXTENDED_DATABASE_FILE_NAME, LEGACY_JSON_FILE_NAME,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
