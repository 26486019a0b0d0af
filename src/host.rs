//! Services the screen-reader host provides to the engine.
//!
//! The engine never talks to the OS for speech, tones, launching or the
//! system clipboard directly. `SystemHost` is the real implementation used by
//! the binary; `RecordingHost` keeps everything in memory for tests and for
//! headless runs.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

pub trait Host {
    /// Speak a single message.
    fn speak(&self, message: &str);

    /// Play a short tone.
    fn beep(&self, frequency_hz: u32, duration_ms: u32);

    /// Open `path` with the platform's default handler.
    fn launch(&self, path: &Path) -> std::io::Result<()>;

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()>;

    /// Show the data-entry dialog for managing saved paths.
    fn show_paths_dialog(&self) {}
}

/// Host backed by the real desktop: stdout for speech, `open` and `arboard`.
#[derive(Debug, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn speak(&self, message: &str) {
        info!(event_type = "speech", message, "Speaking");
        println!("{}", message);
    }

    fn beep(&self, frequency_hz: u32, duration_ms: u32) {
        debug!(frequency_hz, duration_ms, "Tone");
        // Terminal bell is the closest thing a console host has
        print!("\x07");
    }

    fn launch(&self, path: &Path) -> std::io::Result<()> {
        info!(path = %path.display(), "Launching with default handler");
        open::that(path)
    }

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write to clipboard")?;
        Ok(())
    }

    fn show_paths_dialog(&self) {
        info!("Paths dialog requested; use the add/list subcommands or stdin commands");
    }
}

/// Host that records every call instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    messages: RefCell<Vec<String>>,
    beeps: RefCell<Vec<(u32, u32)>>,
    launched: RefCell<Vec<PathBuf>>,
    clipboard: RefCell<Vec<String>>,
    dialogs_shown: RefCell<usize>,
    /// When set, `launch` fails with this message
    launch_error: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_launch(message: impl Into<String>) -> Self {
        Self {
            launch_error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    /// Drain recorded messages so a test can look at just the next step.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn beeps(&self) -> Vec<(u32, u32)> {
        self.beeps.borrow().clone()
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.borrow().clone()
    }

    pub fn clipboard(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    pub fn dialogs_shown(&self) -> usize {
        *self.dialogs_shown.borrow()
    }
}

impl Host for RecordingHost {
    fn speak(&self, message: &str) {
        debug!(message, "Recorded speech");
        self.messages.borrow_mut().push(message.to_string());
    }

    fn beep(&self, frequency_hz: u32, duration_ms: u32) {
        self.beeps.borrow_mut().push((frequency_hz, duration_ms));
    }

    fn launch(&self, path: &Path) -> std::io::Result<()> {
        if let Some(message) = &self.launch_error {
            return Err(std::io::Error::other(message.clone()));
        }
        self.launched.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()> {
        self.clipboard.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn show_paths_dialog(&self) {
        *self.dialogs_shown.borrow_mut() += 1;
    }
}
