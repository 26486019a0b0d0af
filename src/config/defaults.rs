//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Directory name under the per-user config directory
pub const DEFAULT_APP_DIR_NAME: &str = "virtual-explorer";

/// File names inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const BASIC_DATABASE_FILE_NAME: &str = "favorite_paths.db";
pub const EXTENDED_DATABASE_FILE_NAME: &str = "virtual_explorer.db";
pub const LEGACY_JSON_FILE_NAME: &str = "favorite_paths.json";
pub const LOG_DIR_NAME: &str = "logs";

/// Category assigned to entries saved without one
pub const DEFAULT_CATEGORY: &str = "General";

/// Success tone played after a path is added
pub const DEFAULT_TONE_FREQUENCY_HZ: u32 = 432;
pub const DEFAULT_TONE_DURATION_MS: u32 = 300;

/// Import the legacy JSON sidecar on startup by default
pub const DEFAULT_IMPORT_LEGACY: bool = true;
