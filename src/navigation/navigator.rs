//! Stack of navigation levels.
//!
//! The bottom level always exists and shows the catalog; directory listings
//! and the actions menu are pushed above it. Every move announces where the
//! cursor landed through the host.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::item::Item;
use super::level::{LevelKind, NavigationLevel};
use crate::error::{FavoritesError, Result};
use crate::fs_ops::{self, base_name};
use crate::host::Host;
use crate::markers::MarkerResolver;
use crate::messages;

/// The item under the cursor and the path it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Current {
    pub item: Item,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    bottom: NavigationLevel,
    pushed: Vec<NavigationLevel>,
    /// Spoken when `exit` lands with nothing selected
    top_label: String,
}

impl Navigator {
    pub fn new(bottom: NavigationLevel, top_label: impl Into<String>) -> Self {
        Self {
            bottom,
            pushed: Vec::new(),
            top_label: top_label.into(),
        }
    }

    pub fn depth(&self) -> usize {
        self.pushed.len() + 1
    }

    pub fn bottom(&self) -> &NavigationLevel {
        &self.bottom
    }

    pub fn top(&self) -> &NavigationLevel {
        self.pushed.last().unwrap_or(&self.bottom)
    }

    pub fn top_mut(&mut self) -> &mut NavigationLevel {
        match self.pushed.last_mut() {
            Some(level) => level,
            None => &mut self.bottom,
        }
    }

    pub fn top_label(&self) -> &str {
        &self.top_label
    }

    /// True when there is nothing saved to navigate.
    pub fn is_empty(&self) -> bool {
        self.bottom.is_empty()
    }

    pub fn in_actions_menu(&self) -> bool {
        matches!(self.top().kind(), LevelKind::Actions)
    }

    pub fn current(&self, resolver: &MarkerResolver) -> Option<Current> {
        if self.is_empty() {
            return None;
        }
        let item = self.top().current()?;
        Some(Current {
            path: item.resolved_path(resolver),
            item: item.clone(),
        })
    }

    pub fn advance(&mut self, host: &dyn Host) {
        self.step(host, NavigationLevel::advance);
    }

    pub fn retreat(&mut self, host: &dyn Host) {
        self.step(host, NavigationLevel::retreat);
    }

    fn step(&mut self, host: &dyn Host, movement: fn(&mut NavigationLevel) -> Option<usize>) {
        if self.is_empty() {
            host.speak(messages::NO_SAVED_PATHS);
            return;
        }
        if movement(self.top_mut()).is_some() {
            self.announce_position(host);
        }
    }

    /// Speak "<name> <position> of <count>" for the top level's cursor.
    pub fn announce_position(&self, host: &dyn Host) {
        let level = self.top();
        if let (Some(index), Some(item)) = (level.cursor(), level.current()) {
            host.speak(&messages::position(&item.display_name(), index, level.len()));
        }
    }

    /// Drill into the current directory, or launch the current file.
    ///
    /// Returns whether a level was pushed.
    pub fn enter(&mut self, host: &dyn Host, resolver: &MarkerResolver) -> bool {
        let Some(Current {
            path: Some(path), ..
        }) = self.current(resolver)
        else {
            return false;
        };

        if !path.is_dir() {
            launch_path(host, &path);
            return false;
        }

        match fs_ops::list_dir(&path) {
            Ok(children) if children.is_empty() => {
                host.speak(messages::EMPTY_FOLDER);
                false
            }
            Ok(children) => {
                debug!(dir = %path.display(), count = children.len(), "Entering directory");
                self.push(NavigationLevel::directory(path, children));
                self.advance(host);
                true
            }
            Err(e) => {
                warn!(dir = %path.display(), error = %e, "Could not list directory");
                host.speak(&e.user_message());
                false
            }
        }
    }

    pub fn push(&mut self, level: NavigationLevel) {
        self.pushed.push(level);
    }

    /// Drop the top level without announcing anything. The bottom level stays.
    pub fn pop(&mut self) -> Option<NavigationLevel> {
        self.pushed.pop()
    }

    /// Leave the current level and say where we are now.
    ///
    /// Returns false at depth 1, where there is nothing to leave.
    pub fn exit(&mut self, host: &dyn Host, resolver: &MarkerResolver) -> bool {
        if self.pop().is_none() {
            return false;
        }
        let name = self
            .current(resolver)
            .and_then(|c| c.path)
            .map(|p| base_name(&p))
            .unwrap_or_else(|| self.top_label.clone());
        host.speak(&name);
        true
    }

    /// Open the current item with the default handler, directory or not.
    pub fn launch(&self, host: &dyn Host, resolver: &MarkerResolver) {
        if let Some(Current {
            path: Some(path), ..
        }) = self.current(resolver)
        {
            launch_path(host, &path);
        }
    }

    /// Replace the whole stack with a fresh bottom level.
    pub fn reset(&mut self, bottom: NavigationLevel) {
        self.bottom = bottom;
        self.pushed.clear();
    }

    /// Rebuild the bottom level's items in place, keeping the cursor in range.
    pub fn replace_bottom_items(&mut self, items: Vec<Item>) {
        self.bottom.replace_items(items);
    }

    /// Re-read the directory shown by the top level and put the cursor on
    /// `select` if it is there.
    ///
    /// Returns `Ok(false)` when the top level is not a directory listing.
    pub fn refresh_directory(&mut self, select: &Path) -> Result<bool> {
        let LevelKind::Directory(dir) = self.top().kind().clone() else {
            return Ok(false);
        };
        let children = fs_ops::list_dir(&dir)?;
        let level = self.top_mut();
        level.replace_items(children.into_iter().map(Item::RawPath).collect());
        let index = level.position(|item| matches!(item, Item::RawPath(p) if p == select));
        level.select(index);
        Ok(true)
    }
}

fn launch_path(host: &dyn Host, path: &Path) {
    if let Err(source) = host.launch(path) {
        let err = FavoritesError::Launch {
            path: path.to_path_buf(),
            source,
        };
        warn!(error = %err, "Launch failed");
        host.speak(&err.user_message());
    }
}
