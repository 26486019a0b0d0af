//! Keyboard gestures and the commands they trigger.
//!
//! This module provides:
//! - Gesture parsing in the host's `kb:` notation
//! - Per-variant default bindings
//! - User overrides from config, including unbinding
//!
//! # Example
//!
//! ```ignore
//! use virtual_explorer::gestures::{Command, Gesture, GestureRegistry};
//!
//! let registry = GestureRegistry::for_variant(Variant::Extended);
//! let gesture = Gesture::parse("kb:alt+NVDA+k")?;
//! assert_eq!(registry.find_command(&gesture), Some(Command::NextPath));
//! ```

mod registry;
mod types;


pub use registry::{Command, CommandRegistry, GestureBinding, GestureRegistry, OverrideIssue};
pub use types::{canonicalize_key, is_known_key, Gesture, GestureParseError, Modifiers};
