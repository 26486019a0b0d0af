//! virtual-explorer - favorite paths and a virtual file explorer for
//! screen-reader users.
//!
//! The engine is host-agnostic: speech, tones, launching and the system
//! clipboard go through the [`host::Host`] trait.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fs_ops;
pub mod gestures;
pub mod host;
pub mod logging;
pub mod markers;
pub mod messages;
pub mod navigation;
pub mod plugin;
pub mod stdin_commands;
pub mod store;
