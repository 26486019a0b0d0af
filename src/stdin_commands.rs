//! External command handling via stdin.
//!
//! Drives the plugin headlessly: gestures, dialog callbacks and listings
//! arrive as JSON objects, one per line (JSONL format):
//!
//! ```json
//! {"type": "gesture", "gesture": "kb:alt+nvda+k"}
//! {"type": "simulateKey", "key": "l", "modifiers": ["nvda", "alt"]}
//! {"type": "addPath", "path": "$documents", "identifier": "Docs", "category": "Work"}
//! {"type": "renameCategory", "old": "Work", "new": "Office"}
//! {"type": "listPaths"}
//! {"type": "quit"}
//! ```
//!
//! # Example Usage
//!
//! ```bash
//! echo '{"type": "gesture", "gesture": "kb:alt+nvda+k"}' | ./virtual-explorer run
//! ```

use std::io::BufRead;

use tracing::{debug, info, warn};

use crate::gestures::{CommandRegistry, Gesture};
use crate::host::Host;
use crate::plugin::FavoritesPlugin;

/// Commands accepted on stdin.
///
/// All commands support an optional `requestId` field for correlation in logs.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExternalCommand {
    /// Press a gesture in the host's notation
    Gesture {
        gesture: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Press a key with modifiers, e.g. `{"key": "k", "modifiers": ["nvda", "alt"]}`
    SimulateKey {
        key: String,
        #[serde(default)]
        modifiers: Vec<String>,
    },
    AddPath {
        path: String,
        identifier: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    DeletePath { identifier: String },
    RenamePath {
        #[serde(rename = "oldIdentifier")]
        old_identifier: String,
        #[serde(rename = "newIdentifier")]
        new_identifier: String,
    },
    FixPath { path: String, identifier: String },
    UnfixPath { path: String, identifier: String },
    RenameCategory { old: String, new: String },
    /// Print the dialog listing, optionally for one category
    ListPaths {
        #[serde(default)]
        category: Option<String>,
    },
    Quit,
}

impl ExternalCommand {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ExternalCommand::Gesture { request_id, .. }
            | ExternalCommand::AddPath { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one JSONL line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<ExternalCommand, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Build the gesture a `simulateKey` command stands for.
fn simulated_gesture(key: &str, modifiers: &[String]) -> Option<Gesture> {
    let mut parts: Vec<&str> = modifiers.iter().map(String::as_str).collect();
    parts.push(key);
    match Gesture::parse(&parts.join("+")) {
        Ok(gesture) => Some(gesture),
        Err(e) => {
            warn!(key, ?modifiers, error = %e, "Invalid simulated key");
            None
        }
    }
}

fn press<H: Host>(plugin: &mut FavoritesPlugin<H>, gesture: Gesture) {
    if !plugin.run_gesture(&gesture) {
        debug!(gesture = %gesture.to_host_string(), "Gesture not bound");
    }
}

/// Apply one command to the plugin.
///
/// Dialog callbacks already announce their own failures, so their errors
/// are only logged here.
pub fn execute<H: Host>(plugin: &mut FavoritesPlugin<H>, command: ExternalCommand) -> Flow {
    let request_id = command.request_id().map(str::to_string);
    debug!(?command, request_id = ?request_id, "Executing external command");

    let result = match command {
        ExternalCommand::Gesture { gesture, .. } => {
            match Gesture::parse(&gesture) {
                Ok(parsed) => press(plugin, parsed),
                Err(e) => warn!(gesture = %gesture, error = %e, "Invalid gesture"),
            }
            Ok(())
        }
        ExternalCommand::SimulateKey { key, modifiers } => {
            if let Some(gesture) = simulated_gesture(&key, &modifiers) {
                press(plugin, gesture);
            }
            Ok(())
        }
        ExternalCommand::AddPath {
            path,
            identifier,
            category,
            ..
        } => plugin.add_path(&path, &identifier, category.as_deref()),
        ExternalCommand::DeletePath { identifier } => plugin.delete_path(&identifier),
        ExternalCommand::RenamePath {
            old_identifier,
            new_identifier,
        } => plugin.rename_path(&old_identifier, &new_identifier),
        ExternalCommand::FixPath { path, identifier } => plugin.fix_path(&path, &identifier),
        ExternalCommand::UnfixPath { path, identifier } => plugin.unfix_path(&path, &identifier),
        ExternalCommand::RenameCategory { old, new } => plugin.rename_category(&old, &new),
        ExternalCommand::ListPaths { category } => {
            for row in plugin.listing(category.as_deref()) {
                println!("{}", row);
            }
            Ok(())
        }
        ExternalCommand::Quit => return Flow::Quit,
    };

    if let Err(e) = result {
        debug!(request_id = ?request_id, error = %e, "External command rejected");
    }
    Flow::Continue
}

/// Read commands until EOF or `quit`. Malformed lines are logged and skipped.
pub fn run_commands<R: BufRead, H: Host>(reader: R, plugin: &mut FavoritesPlugin<H>) -> std::io::Result<()> {
    info!("External command listener started");
    for line in reader.lines() {
        let line = line?;
        match parse_line(&line) {
            None => {}
            Some(Ok(command)) => {
                if execute(plugin, command) == Flow::Quit {
                    info!("Quit requested");
                    break;
                }
            }
            Some(Err(e)) => warn!(line = %line, error = %e, "Failed to parse command"),
        }
    }
    info!("External command listener exiting");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Variant;
    use crate::host::RecordingHost;
    use crate::markers::MarkerResolver;
    use crate::messages;
    use crate::plugin::{Lifecycle, PluginSettings};

    fn plugin(dir: &std::path::Path) -> FavoritesPlugin<RecordingHost> {
        let settings = PluginSettings::in_memory(Variant::Extended, MarkerResolver::new(dir));
        let mut plugin = FavoritesPlugin::new(settings, RecordingHost::new()).unwrap();
        plugin.init().unwrap();
        plugin
    }

    #[test]
    fn test_external_command_gesture_deserialization() {
        let json = r#"{"type": "gesture", "gesture": "kb:alt+nvda+k", "requestId": "req-1"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match &cmd {
            ExternalCommand::Gesture { gesture, .. } => assert_eq!(gesture, "kb:alt+nvda+k"),
            _ => panic!("Expected Gesture command"),
        }
        assert_eq!(cmd.request_id(), Some("req-1"));
    }

    #[test]
    fn test_external_command_add_path_without_category() {
        let json = r#"{"type": "addPath", "path": "$documents", "identifier": "Docs"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExternalCommand::AddPath {
                path,
                identifier,
                category,
                request_id,
            } => {
                assert_eq!(path, "$documents");
                assert_eq!(identifier, "Docs");
                assert!(category.is_none());
                assert!(request_id.is_none());
            }
            _ => panic!("Expected AddPath command"),
        }
    }

    #[test]
    fn test_external_command_rename_path_uses_camel_case_fields() {
        let json = r#"{"type": "renamePath", "oldIdentifier": "A", "newIdentifier": "B"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            ExternalCommand::RenamePath { ref old_identifier, ref new_identifier }
                if old_identifier == "A" && new_identifier == "B"
        ));
    }

    #[test]
    fn test_external_command_simulate_key_no_modifiers() {
        let json = r#"{"type": "simulateKey", "key": "delete"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExternalCommand::SimulateKey { key, modifiers } => {
                assert_eq!(key, "delete");
                assert!(modifiers.is_empty());
            }
            _ => panic!("Expected SimulateKey command"),
        }
    }

    #[test]
    fn test_external_command_unknown_type_fails() {
        assert!(serde_json::from_str::<ExternalCommand>(r#"{"type": "unknown"}"#).is_err());
        // addPath requires an identifier
        assert!(serde_json::from_str::<ExternalCommand>(r#"{"type": "addPath", "path": "/"}"#).is_err());
    }

    #[test]
    fn test_parse_line_skips_blank_lines() {
        assert!(parse_line("   ").is_none());
        assert!(matches!(parse_line(r#"{"type": "quit"}"#), Some(Ok(ExternalCommand::Quit))));
        assert!(matches!(parse_line("not json"), Some(Err(_))));
    }

    #[test]
    fn test_simulated_gesture_joins_modifiers() {
        let gesture = simulated_gesture("k", &["nvda".to_string(), "alt".to_string()]).unwrap();
        assert_eq!(gesture.to_host_string(), "kb:nvda+alt+k");
        assert!(simulated_gesture("k", &["banana".to_string()]).is_none());
    }

    #[test]
    fn test_run_commands_drives_plugin_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let mut plugin = plugin(dir.path());

        let input = format!(
            "{}\n\nnonsense\n{}\n{}\n{}\n",
            serde_json::json!({
                "type": "addPath",
                "path": "$users/docs",
                "identifier": "Docs",
            }),
            r#"{"type": "simulateKey", "key": "k", "modifiers": ["alt", "nvda"]}"#,
            r#"{"type": "quit"}"#,
            r#"{"type": "gesture", "gesture": "kb:alt+nvda+j"}"#,
        );
        run_commands(std::io::Cursor::new(input), &mut plugin).unwrap();

        assert_eq!(
            plugin.host().messages(),
            vec![messages::PATH_ADDED.to_string(), "Docs 1 of 1".to_string()]
        );
    }
}
