//! Deterministic gesture registry with Vec storage.
//!
//! Uses Vec for deterministic iteration order and HashMap for O(1) lookup.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{Gesture, GestureParseError};
use crate::catalog::Variant;

/// Every script the plugin exposes to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    AddNewPath,
    EnterDirectory,
    ExitDirectory,
    LaunchItem,
    DeleteItem,
    PreviousPath,
    NextPath,
    ShowContextMenu,
    NextCategory,
    PreviousCategory,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::AddNewPath,
        Command::EnterDirectory,
        Command::ExitDirectory,
        Command::LaunchItem,
        Command::DeleteItem,
        Command::PreviousPath,
        Command::NextPath,
        Command::ShowContextMenu,
        Command::NextCategory,
        Command::PreviousCategory,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Command::AddNewPath => "addNewPath",
            Command::EnterDirectory => "enterDirectory",
            Command::ExitDirectory => "exitDirectory",
            Command::LaunchItem => "launchItem",
            Command::DeleteItem => "deleteItem",
            Command::PreviousPath => "previousPath",
            Command::NextPath => "nextPath",
            Command::ShowContextMenu => "showContextMenu",
            Command::NextCategory => "nextCategory",
            Command::PreviousCategory => "previousCategory",
        }
    }

    pub fn from_id(id: &str) -> Option<Command> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::AddNewPath => "Opens the dialog to enter new paths",
            Command::EnterDirectory => "Enters the selected directory or opens the file",
            Command::ExitDirectory => "Goes back to the previous directory",
            Command::LaunchItem => "Opens the selected file or directory",
            Command::DeleteItem => "Deletes the selected path from favorites",
            Command::PreviousPath => "Goes to the previous item",
            Command::NextPath => "Goes to the next item",
            Command::ShowContextMenu => "Shows the actions for the current item",
            Command::NextCategory => "Goes to the next category",
            Command::PreviousCategory => "Goes to the previous category",
        }
    }

    /// Default chord for `variant`, or `None` if the variant lacks the command.
    pub fn default_gesture(&self, variant: Variant) -> Option<&'static str> {
        match (self, variant) {
            (Command::AddNewPath, _) => Some("kb:alt+NVDA+a"),
            (Command::EnterDirectory, _) => Some("kb:alt+NVDA+l"),
            (Command::ExitDirectory, _) => Some("kb:alt+NVDA+backspace"),
            (Command::LaunchItem, _) => Some("kb:alt+NVDA+enter"),
            (Command::PreviousPath, _) => Some("kb:alt+NVDA+j"),
            (Command::NextPath, _) => Some("kb:alt+NVDA+k"),
            (Command::DeleteItem, Variant::Basic) => Some("kb:delete"),
            (Command::DeleteItem, Variant::Extended) => Some("kb:alt+NVDA+delete"),
            (Command::ShowContextMenu, Variant::Extended) => Some("kb:nvda+alt+space"),
            (Command::NextCategory, Variant::Extended) => Some("kb:NVDA+alt+downArrow"),
            (Command::PreviousCategory, Variant::Extended) => Some("kb:NVDA+alt+upArrow"),
            (Command::ShowContextMenu | Command::NextCategory | Command::PreviousCategory, Variant::Basic) => {
                None
            }
        }
    }
}

/// A command with its built-in gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureBinding {
    pub command: Command,
    pub default_gesture: Gesture,
}

/// Problems found while applying user overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideIssue {
    UnknownCommand(String),
    InvalidGesture { command: Command, error: GestureParseError },
}

/// Central registry of the plugin's gestures.
#[derive(Debug, Default)]
pub struct GestureRegistry {
    bindings: Vec<GestureBinding>,
    command_to_index: HashMap<Command, usize>,
    user_overrides: HashMap<Command, Option<Gesture>>,
    disabled: HashSet<Command>,
}

impl GestureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every default binding of `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        let mut registry = Self::new();
        for command in Command::ALL {
            let Some(raw) = command.default_gesture(variant) else {
                continue;
            };
            match Gesture::parse(raw) {
                Ok(gesture) => registry.register(GestureBinding {
                    command,
                    default_gesture: gesture,
                }),
                Err(e) => warn!(command = command.id(), error = %e, "Bad built-in gesture"),
            }
        }
        registry
    }

    pub fn register(&mut self, binding: GestureBinding) {
        let command = binding.command;
        if let Some(&existing_index) = self.command_to_index.get(&command) {
            self.bindings[existing_index] = binding;
        } else {
            let index = self.bindings.len();
            self.bindings.push(binding);
            self.command_to_index.insert(command, index);
        }
    }

    pub fn get(&self, command: Command) -> Option<&GestureBinding> {
        self.command_to_index
            .get(&command)
            .and_then(|&i| self.bindings.get(i))
    }

    pub fn is_registered(&self, command: Command) -> bool {
        self.command_to_index.contains_key(&command)
    }

    /// Effective gesture: user override, else the default. `None` if unbound.
    pub fn get_gesture(&self, command: Command) -> Option<Gesture> {
        if self.disabled.contains(&command) {
            return None;
        }
        if let Some(override_opt) = self.user_overrides.get(&command) {
            return override_opt.clone();
        }
        self.get(command).map(|b| b.default_gesture.clone())
    }

    pub fn set_override(&mut self, command: Command, gesture: Option<Gesture>) {
        if gesture.is_none() {
            self.disabled.insert(command);
        } else {
            self.disabled.remove(&command);
        }
        self.user_overrides.insert(command, gesture);
    }

    pub fn clear_override(&mut self, command: Command) {
        self.user_overrides.remove(&command);
        self.disabled.remove(&command);
    }

    pub fn is_disabled(&self, command: Command) -> bool {
        self.disabled.contains(&command)
    }

    /// Apply config overrides: command id to gesture string, `None` to unbind.
    ///
    /// Bad entries are skipped and reported; the rest still apply.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, Option<String>>) -> Vec<OverrideIssue> {
        let mut issues = Vec::new();
        let mut ids: Vec<&String> = overrides.keys().collect();
        ids.sort();

        for id in ids {
            let Some(command) = Command::from_id(id).filter(|c| self.is_registered(*c)) else {
                warn!(command = %id, "Ignoring gesture override for unknown command");
                issues.push(OverrideIssue::UnknownCommand(id.clone()));
                continue;
            };
            match overrides.get(id).and_then(Option::as_deref) {
                None => self.set_override(command, None),
                Some(raw) => match Gesture::parse(raw) {
                    Ok(gesture) => self.set_override(command, Some(gesture)),
                    Err(error) => {
                        warn!(command = %id, gesture = raw, error = %error, "Ignoring invalid gesture override");
                        issues.push(OverrideIssue::InvalidGesture { command, error });
                    }
                },
            }
        }
        issues
    }

    /// Command bound to `gesture`. A user override wins over a default.
    pub fn find_command(&self, gesture: &Gesture) -> Option<Command> {
        let mut fallback = None;
        for binding in &self.bindings {
            let command = binding.command;
            if self.disabled.contains(&command) {
                continue;
            }
            match self.user_overrides.get(&command) {
                Some(Some(overridden)) if overridden == gesture => return Some(command),
                Some(_) => {}
                None if binding.default_gesture == *gesture && fallback.is_none() => {
                    fallback = Some(command)
                }
                None => {}
            }
        }
        fallback
    }

    /// Active bindings in registration order.
    pub fn active_bindings(&self) -> Vec<(Command, Gesture)> {
        self.bindings
            .iter()
            .filter_map(|b| self.get_gesture(b.command).map(|g| (b.command, g)))
            .collect()
    }
}

/// What the host queries to wire gestures to the plugin.
pub trait CommandRegistry {
    fn gestures(&self) -> &GestureRegistry;

    fn run(&mut self, command: Command);

    /// Host-facing table: `kb:` gesture id to command id.
    fn bindings(&self) -> Vec<(String, &'static str)> {
        self.gestures()
            .active_bindings()
            .into_iter()
            .map(|(command, gesture)| (gesture.to_host_string(), command.id()))
            .collect()
    }

    /// Dispatch a pressed gesture. Returns whether anything was bound to it.
    fn run_gesture(&mut self, gesture: &Gesture) -> bool {
        match self.gestures().find_command(gesture) {
            Some(command) => {
                self.run(command);
                true
            }
            None => false,
        }
    }
}
