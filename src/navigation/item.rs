use std::path::PathBuf;

use crate::catalog::PathEntry;
use crate::fs_ops::base_name;
use crate::markers::MarkerResolver;
use crate::messages;

/// Entries of the actions menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Copy,
    Cut,
    CopyAsPath,
    Paste,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Copy => messages::ACTION_COPY,
            Action::Cut => messages::ACTION_CUT,
            Action::CopyAsPath => messages::ACTION_COPY_AS_PATH,
            Action::Paste => messages::ACTION_PASTE,
        }
    }
}

/// One row of a navigation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A saved favorite
    Record(PathEntry),
    /// A child found while browsing a directory
    RawPath(PathBuf),
    Action(Action),
}

impl Item {
    /// Filesystem path this item points at. Actions have none.
    pub fn resolved_path(&self, resolver: &MarkerResolver) -> Option<PathBuf> {
        match self {
            Item::Record(entry) => Some(resolver.resolve_path(&entry.path)),
            Item::RawPath(path) => Some(path.clone()),
            Item::Action(_) => None,
        }
    }

    /// Name spoken when the cursor lands here.
    pub fn display_name(&self) -> String {
        match self {
            Item::Record(entry) => entry.identifier.clone(),
            Item::RawPath(path) => base_name(path),
            Item::Action(action) => action.label().to_string(),
        }
    }

    pub fn as_record(&self) -> Option<&PathEntry> {
        match self {
            Item::Record(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<Action> {
        match self {
            Item::Action(action) => Some(*action),
            _ => None,
        }
    }
}
