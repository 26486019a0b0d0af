//! Spoken text.
//!
//! Everything the user hears comes from here or from
//! `FavoritesError::user_message`.

pub const NO_SAVED_PATHS: &str = "No saved paths!";
pub const EMPTY_FOLDER: &str = "Empty folder";
pub const NO_CATEGORIES: &str = "No categories.";
pub const CATEGORY_SWITCH_BLOCKED: &str =
    "You cannot change category while in the actions menu. Press alt+nvda+backspace to leave it.";

pub const BASIC_TOP_LABEL: &str = "Favorite paths";
pub const EXTENDED_TOP_LABEL: &str = "Virtual explorer";

pub const PATH_ADDED: &str = "Path added successfully.";
pub const FILL_IN_FIELDS: &str = "Make sure to fill in the requested fields correctly.";
pub const PATH_PINNED: &str = "Path pinned.";
pub const PATH_UNPINNED: &str = "Path unpinned.";
pub const PIN_FAILED: &str = "Unable to pin the path.";
pub const UNPIN_FAILED: &str = "Unable to unpin the path.";
pub const DELETE_FAILED: &str = "Unable to delete the path";
pub const PATH_RENAMED: &str = "Path renamed successfully.";
pub const IDENTIFIER_IN_USE: &str = "The new identifier is already in use.";
pub const CATEGORY_RENAMED: &str = "Category renamed.";
pub const CATEGORY_NAME_EMPTY: &str = "The new category name cannot be empty.";

pub const ITEM_PASTED: &str = "Item pasted.";
pub const ITEM_MOVED: &str = "Item moved.";
pub const PATH_COPIED: &str = "Path copied to clipboard";

pub const ACTION_COPY: &str = "Copy";
pub const ACTION_CUT: &str = "Cut";
pub const ACTION_COPY_AS_PATH: &str = "Copy as path";
pub const ACTION_PASTE: &str = "Paste";

/// "<name> <position> of <count>", position counted from 1.
pub fn position(name: &str, index: usize, count: usize) -> String {
    format!("{} {} of {}", name, index + 1, count)
}

pub fn path_deleted(identifier: &str) -> String {
    format!("Path {} deleted", identifier)
}

pub fn copied(name: &str) -> String {
    format!("Copied, ready to paste: {}", name)
}

pub fn cut(name: &str) -> String {
    format!("Cut: {}", name)
}

pub fn category_summary(category: &str, count: usize) -> String {
    format!("{} ({} items)", category, count)
}

pub fn paste_failed(reason: &str) -> String {
    format!("Error pasting: {}", reason)
}
