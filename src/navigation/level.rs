use std::path::PathBuf;

use super::item::{Action, Item};
use crate::catalog::PathEntry;

/// What a level is listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelKind {
    /// Saved favorites, all of them or one category's
    Catalog { category: Option<String> },
    /// Children of a directory being browsed
    Directory(PathBuf),
    /// The synthetic copy/cut/paste menu
    Actions,
}

/// An ordered list plus a cursor. `None` means nothing selected yet.
///
/// The cursor is always either `None` or a valid index into `items`.
#[derive(Debug, Clone)]
pub struct NavigationLevel {
    kind: LevelKind,
    items: Vec<Item>,
    cursor: Option<usize>,
}

impl NavigationLevel {
    pub fn new(kind: LevelKind, items: Vec<Item>) -> Self {
        Self {
            kind,
            items,
            cursor: None,
        }
    }

    pub fn catalog(category: Option<String>, entries: Vec<PathEntry>) -> Self {
        Self::new(
            LevelKind::Catalog { category },
            entries.into_iter().map(Item::Record).collect(),
        )
    }

    pub fn directory(dir: PathBuf, children: Vec<PathBuf>) -> Self {
        Self::new(
            LevelKind::Directory(dir),
            children.into_iter().map(Item::RawPath).collect(),
        )
    }

    pub fn actions(actions: &[Action]) -> Self {
        Self::new(
            LevelKind::Actions,
            actions.iter().copied().map(Item::Action).collect(),
        )
    }

    pub fn kind(&self) -> &LevelKind {
        &self.kind
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Item> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// Move forward, wrapping past the end. `None` when the level is empty.
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let next = match self.cursor {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.cursor = Some(next);
        self.cursor
    }

    /// Move back, wrapping before the start. From no selection this lands
    /// on the last item.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let prev = match self.cursor {
            Some(i) if i > 0 => i - 1,
            _ => self.items.len() - 1,
        };
        self.cursor = Some(prev);
        self.cursor
    }

    /// Place the cursor, dropping out-of-range indices to no selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.cursor = index.filter(|&i| i < self.items.len());
    }

    /// Swap in a fresh item list, clamping the cursor to the new length.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.cursor = match self.cursor {
            Some(_) if self.items.is_empty() => None,
            Some(i) => Some(i.min(self.items.len() - 1)),
            None => None,
        };
    }

    pub fn position(&self, predicate: impl Fn(&Item) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }
}
