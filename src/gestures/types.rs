//! Keyboard gestures in the host's notation.
//!
//! - `Gesture` - a key plus modifiers, parsed from strings like `kb:alt+NVDA+k`
//! - `Modifiers` - NVDA, Ctrl, Alt and Shift flags
//! - `GestureParseError` - detailed parse errors for config warnings

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a gesture string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureParseError {
    #[error("gesture string is empty")]
    Empty,
    #[error("gesture has no key, only modifiers")]
    MissingKey,
    #[error("unknown token '{0}' in gesture")]
    UnknownToken(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("only keyboard gestures are supported, got '{0}'")]
    UnsupportedSource(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// The screen reader's own modifier key
    #[serde(default)]
    pub nvda: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub fn nvda_alt() -> Self {
        Self {
            nvda: true,
            alt: true,
            ..Default::default()
        }
    }

    pub fn any(&self) -> bool {
        self.nvda || self.ctrl || self.alt || self.shift
    }

    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// A keyboard gesture consisting of modifier keys and a main key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gesture {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Gesture {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: canonicalize_key(&key.into()),
            modifiers,
        }
    }

    /// Parse `kb:alt+NVDA+k`, `nvda+alt+downArrow` or `delete`.
    ///
    /// The `kb:` prefix is optional; other input sources are rejected.
    /// Modifier order and case don't matter.
    pub fn parse(s: &str) -> Result<Self, GestureParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GestureParseError::Empty);
        }

        let body = match s.split_once(':') {
            Some((source, rest)) if source.eq_ignore_ascii_case("kb") => rest,
            Some(_) => return Err(GestureParseError::UnsupportedSource(s.to_string())),
            None => s,
        };

        let parts: Vec<&str> = body.split('+').map(str::trim).filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return Err(GestureParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key_part: Option<&str> = None;

        for part in &parts {
            match part.to_lowercase().as_str() {
                "nvda" | "insert" | "capslock" => modifiers.nvda = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => {
                    if key_part.is_some() {
                        return Err(GestureParseError::UnknownToken(part.to_string()));
                    }
                    key_part = Some(part);
                }
            }
        }

        let key = key_part.ok_or(GestureParseError::MissingKey)?;
        let canonical_key = canonicalize_key(key);
        if !is_known_key(&canonical_key) {
            return Err(GestureParseError::UnknownKey(key.to_string()));
        }

        Ok(Self {
            key: canonical_key,
            modifiers,
        })
    }

    /// Stable lowercase form, e.g. `nvda+alt+down`.
    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.nvda {
            parts.push("nvda");
        }
        if self.modifiers.ctrl {
            parts.push("ctrl");
        }
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        parts.push(&self.key);
        parts.join("+")
    }

    /// The identifier the host binds scripts to, e.g. `kb:nvda+alt+down`.
    pub fn to_host_string(&self) -> String {
        format!("kb:{}", self.to_canonical_string())
    }

    fn key_display_text(&self) -> String {
        match self.key.as_str() {
            "enter" => "Enter",
            "escape" => "Esc",
            "tab" => "Tab",
            "space" => "Space",
            "backspace" => "Backspace",
            "delete" => "Delete",
            "up" => "Up Arrow",
            "down" => "Down Arrow",
            "left" => "Left Arrow",
            "right" => "Right Arrow",
            "home" => "Home",
            "end" => "End",
            "pageup" => "Page Up",
            "pagedown" => "Page Down",
            k => return k.to_uppercase(),
        }
        .to_string()
    }
}

/// Human form for help output: `NVDA+Alt+Down Arrow`.
impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.nvda {
            parts.push("NVDA".to_string());
        }
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        parts.push(self.key_display_text());
        write!(f, "{}", parts.join("+"))
    }
}

/// Canonicalize a key name to the internal standard form.
pub fn canonicalize_key(key: &str) -> String {
    let key_lower = key.to_lowercase();
    match key_lower.as_str() {
        "arrowup" | "uparrow" => "up",
        "arrowdown" | "downarrow" => "down",
        "arrowleft" | "leftarrow" => "left",
        "arrowright" | "rightarrow" => "right",
        "return" => "enter",
        "esc" => "escape",
        "back" => "backspace",
        "del" => "delete",
        "pgup" | "pageup" => "pageup",
        "pgdn" | "pgdown" | "pagedown" => "pagedown",
        _ => return key_lower,
    }
    .to_string()
}

/// Check if a key name is known/valid.
pub fn is_known_key(key: &str) -> bool {
    let single = key.len() == 1 && key.chars().all(|c| c.is_ascii_alphanumeric());
    let function = key
        .strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=24).contains(&n));
    single
        || function
        || matches!(
            key,
            "space"
                | "enter"
                | "tab"
                | "escape"
                | "backspace"
                | "delete"
                | "up"
                | "down"
                | "left"
                | "right"
                | "home"
                | "end"
                | "pageup"
                | "pagedown"
        )
}
