//! Configuration type definitions

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::catalog::Variant;

// ============================================
// TONE CONFIG
// ============================================

/// Tone emitted when a path is added successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneConfig {
    #[serde(default = "default_tone_frequency_hz")]
    pub frequency_hz: u32,
    #[serde(default = "default_tone_duration_ms")]
    pub duration_ms: u32,
}

fn default_tone_frequency_hz() -> u32 {
    DEFAULT_TONE_FREQUENCY_HZ
}
fn default_tone_duration_ms() -> u32 {
    DEFAULT_TONE_DURATION_MS
}

impl Default for ToneConfig {
    fn default() -> Self {
        ToneConfig {
            frequency_hz: DEFAULT_TONE_FREQUENCY_HZ,
            duration_ms: DEFAULT_TONE_DURATION_MS,
        }
    }
}

// ============================================
// MARKER CONFIG
// ============================================

/// An extra path marker, e.g. `{"token": "$projects", "path": "~/src"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub token: String,
    pub path: String,
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which catalog flavor to run (default: extended)
    #[serde(default)]
    pub variant: Variant,
    /// Override of the per-user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneConfig>,
    /// Appended after the built-in markers, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<Vec<MarkerConfig>>,
    /// Command id -> gesture string, or null to unbind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gestures: Option<HashMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_legacy: Option<bool>,
}

impl Config {
    /// Resolved data directory (tilde expanded).
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            None => default_data_dir(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        let file = match self.variant {
            Variant::Basic => BASIC_DATABASE_FILE_NAME,
            Variant::Extended => EXTENDED_DATABASE_FILE_NAME,
        };
        self.data_dir().join(file)
    }

    pub fn legacy_json_path(&self) -> PathBuf {
        self.data_dir().join(LEGACY_JSON_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join(LOG_DIR_NAME)
    }

    pub fn get_default_category(&self) -> String {
        self.default_category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string()
    }

    pub fn get_tone(&self) -> ToneConfig {
        self.tone.unwrap_or_default()
    }

    pub fn should_import_legacy(&self) -> bool {
        self.import_legacy.unwrap_or(DEFAULT_IMPORT_LEGACY)
    }

    /// Extra markers with their paths tilde expanded.
    pub fn extra_markers(&self) -> Vec<(String, PathBuf)> {
        self.markers
            .iter()
            .flatten()
            .map(|m| {
                (
                    m.token.clone(),
                    PathBuf::from(shellexpand::tilde(&m.path).as_ref()),
                )
            })
            .collect()
    }

    pub fn gesture_overrides(&self) -> HashMap<String, Option<String>> {
        self.gestures.clone().unwrap_or_default()
    }
}

/// `<config_dir>/virtual-explorer`, falling back to `~/.virtual-explorer`.
pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(DEFAULT_APP_DIR_NAME))
        .unwrap_or_else(|| {
            PathBuf::from(shellexpand::tilde("~/.virtual-explorer").as_ref())
        })
}
