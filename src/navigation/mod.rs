//! Navigation cursor
//!
//! A stack of levels, each an ordered list of [`Item`]s with its own cursor.
//! Movement wraps around; the bottom (catalog) level can never be popped.

mod item;
mod level;
mod navigator;

pub use item::{Action, Item};
pub use level::{LevelKind, NavigationLevel};
pub use navigator::{Current, Navigator};

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
