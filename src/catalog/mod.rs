//! Favorites catalog
//!
//! Owns the in-memory mirror of the `paths` table. Every mutation writes and
//! commits to the store before touching memory.
//!
//! - `FlatCatalog` (basic): one list, pins kept in front with a bookmark
//! - `CategorizedCatalog` (extended): one list per category, rebuilt from the
//!   store after every structural change

mod categorized;
mod flat;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use categorized::CategorizedCatalog;
pub use flat::FlatCatalog;

use crate::error::{FavoritesError, Result};
use crate::markers::MarkerResolver;
use crate::store::{PathRow, PathStore};

/// Which catalog flavor is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Flat list, no categories, no clipboard actions
    Basic,
    /// Categories plus the copy/cut/paste actions menu
    #[default]
    Extended,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Extended => "extended",
        }
    }
}

/// A saved favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Absolute, or starting with a marker such as `$documents`
    pub path: String,
    /// Unique display name
    pub identifier: String,
    pub fixed: bool,
    /// Always set in the extended variant, always `None` in the basic one
    pub category: Option<String>,
}

impl From<PathRow> for PathEntry {
    fn from(row: PathRow) -> Self {
        Self {
            path: row.path,
            identifier: row.identifier,
            fixed: row.fixed,
            category: row.category,
        }
    }
}

impl PathEntry {
    fn to_row(&self) -> PathRow {
        PathRow {
            path: self.path.clone(),
            identifier: self.identifier.clone(),
            fixed: self.fixed,
            category: self.category.clone(),
        }
    }
}

pub trait Catalog {
    fn variant(&self) -> Variant;

    /// Rebuild the mirror from the store. On failure the catalog is left empty.
    fn load(&mut self) -> Result<()>;

    fn add(&mut self, path: &str, identifier: &str, category: Option<&str>, fixed: bool) -> Result<()>;

    fn delete(&mut self, identifier: &str) -> Result<()>;

    /// Rename in place; the sort position only changes on the next load.
    fn rename(&mut self, old_identifier: &str, new_identifier: &str) -> Result<()>;

    fn fix(&mut self, path: &str, identifier: &str) -> Result<()>;

    fn unfix(&mut self, path: &str, identifier: &str) -> Result<()>;

    fn rename_category(&mut self, _old: &str, _new: &str) -> Result<()> {
        Err(FavoritesError::Unsupported("Categories"))
    }

    /// Sorted category names. Empty for the basic variant.
    fn categories(&self) -> Vec<String> {
        Vec::new()
    }

    /// Entries in display order, either all of them or one category's.
    fn entries(&self, category: Option<&str>) -> Vec<PathEntry>;

    fn find(&self, identifier: &str) -> Option<&PathEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_identifier(&self, identifier: &str) -> bool {
        self.find(identifier).is_some()
    }

    fn store_mut(&mut self) -> &mut PathStore;

    /// Give the store back, e.g. to close it.
    fn into_store(self: Box<Self>) -> PathStore;
}

/// Build the catalog for `variant` on top of an opened store.
pub fn open_catalog(
    variant: Variant,
    store: PathStore,
    resolver: MarkerResolver,
    default_category: &str,
) -> Box<dyn Catalog> {
    match variant {
        Variant::Basic => Box::new(FlatCatalog::new(store, resolver)),
        Variant::Extended => Box::new(CategorizedCatalog::new(store, resolver, default_category)),
    }
}

/// Pinned entries first, each group sorted by identifier.
///
/// Returns the ordered entries and how many of them are pinned.
pub fn sort_pinned_first(entries: Vec<PathEntry>) -> (Vec<PathEntry>, usize) {
    let (mut fixed, mut other): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.fixed);
    fixed.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    other.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    let fixed_count = fixed.len();
    fixed.extend(other);
    (fixed, fixed_count)
}

/// Checks shared by every `add`: unique identifier, then an existing path.
fn validate_new_entry(
    catalog: &dyn Catalog,
    resolver: &MarkerResolver,
    path: &str,
    identifier: &str,
) -> Result<()> {
    if identifier.is_empty() {
        return Err(FavoritesError::EmptyName);
    }
    if catalog.contains_identifier(identifier) {
        return Err(FavoritesError::DuplicateIdentifier(identifier.to_string()));
    }
    if !Path::new(&resolver.resolve(path)).exists() {
        return Err(FavoritesError::MissingPath(path.to_string()));
    }
    Ok(())
}

fn validate_new_identifier(catalog: &dyn Catalog, new_identifier: &str) -> Result<()> {
    if new_identifier.is_empty() {
        return Err(FavoritesError::EmptyName);
    }
    if catalog.contains_identifier(new_identifier) {
        return Err(FavoritesError::DuplicateIdentifier(new_identifier.to_string()));
    }
    Ok(())
}

/// Row text for the data-entry dialog's list of saved paths.
///
/// `show_category` is set for the all-categories view.
pub fn describe_entry(entry: &PathEntry, show_category: bool) -> String {
    let fixed = if entry.fixed { "(Pinned) " } else { "" };
    let category = match (&entry.category, show_category) {
        (Some(cat), true) if !cat.is_empty() => format!(" ({})", cat),
        _ => String::new(),
    };
    format!(
        "{}Name: {}, Path: {}{}",
        fixed, entry.identifier, entry.path, category
    )
}

/// The dialog's list: pinned first, then by identifier, across the chosen scope.
pub fn listing(catalog: &dyn Catalog, category: Option<&str>) -> Vec<String> {
    let mut entries = catalog.entries(category);
    entries.sort_by(|a, b| {
        (!a.fixed, &a.identifier).cmp(&(!b.fixed, &b.identifier))
    });
    entries
        .iter()
        .map(|e| describe_entry(e, category.is_none()))
        .collect()
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
