//! Extended catalog: entries grouped by category.
//!
//! Rows without a category are shown under the default one. Structural
//! changes reload from the store so every group stays pinned-first and sorted.

use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use super::{sort_pinned_first, validate_new_entry, validate_new_identifier, Catalog, PathEntry, Variant};
use crate::error::{FavoritesError, Result};
use crate::markers::MarkerResolver;
use crate::store::PathStore;

pub struct CategorizedCatalog {
    store: PathStore,
    resolver: MarkerResolver,
    default_category: String,
    groups: BTreeMap<String, Vec<PathEntry>>,
}

impl CategorizedCatalog {
    pub fn new(store: PathStore, resolver: MarkerResolver, default_category: &str) -> Self {
        Self {
            store,
            resolver,
            default_category: default_category.to_string(),
            groups: BTreeMap::new(),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    fn category_or_default(&self, category: Option<&str>) -> String {
        match category {
            Some(cat) if !cat.trim().is_empty() => cat.to_string(),
            _ => self.default_category.clone(),
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.load()
    }
}

impl Catalog for CategorizedCatalog {
    fn variant(&self) -> Variant {
        Variant::Extended
    }

    #[instrument(name = "categorized_catalog_load", skip(self))]
    fn load(&mut self) -> Result<()> {
        let rows = match self.store.rows() {
            Ok(rows) => rows,
            Err(e) => {
                self.groups.clear();
                return Err(e);
            }
        };

        let mut grouped: BTreeMap<String, Vec<PathEntry>> = BTreeMap::new();
        for row in rows {
            let mut entry = PathEntry::from(row);
            let category = self.category_or_default(entry.category.as_deref());
            entry.category = Some(category.clone());
            grouped.entry(category).or_default().push(entry);
        }

        self.groups = grouped
            .into_iter()
            .map(|(name, entries)| (name, sort_pinned_first(entries).0))
            .collect();
        info!(
            count = self.len(),
            categories = self.groups.len(),
            "Loaded favorites"
        );
        Ok(())
    }

    fn add(&mut self, path: &str, identifier: &str, category: Option<&str>, fixed: bool) -> Result<()> {
        validate_new_entry(&*self, &self.resolver, path, identifier)?;

        let category = self.category_or_default(category);
        let entry = PathEntry {
            path: path.to_string(),
            identifier: identifier.to_string(),
            fixed,
            category: Some(category.clone()),
        };
        self.store.insert(&entry.to_row())?;
        self.store.commit()?;
        info!(identifier, category = %category, fixed, "Path added");
        self.reload()
    }

    fn delete(&mut self, identifier: &str) -> Result<()> {
        if !self.contains_identifier(identifier) {
            return Err(FavoritesError::UnknownIdentifier(identifier.to_string()));
        }
        self.store.delete(identifier)?;
        self.store.commit()?;
        info!(identifier, "Path deleted");
        self.reload()
    }

    fn rename(&mut self, old_identifier: &str, new_identifier: &str) -> Result<()> {
        validate_new_identifier(&*self, new_identifier)?;
        if !self.contains_identifier(old_identifier) {
            return Err(FavoritesError::UnknownIdentifier(old_identifier.to_string()));
        }

        self.store.set_identifier(old_identifier, new_identifier)?;
        self.store.commit()?;

        for entry in self.groups.values_mut().flatten() {
            if entry.identifier == old_identifier {
                entry.identifier = new_identifier.to_string();
            }
        }
        info!(old_identifier, new_identifier, "Path renamed");
        Ok(())
    }

    /// Pinning an entry that is already pinned changes nothing.
    fn fix(&mut self, _path: &str, identifier: &str) -> Result<()> {
        match self.find(identifier) {
            Some(entry) if entry.fixed => return Ok(()),
            Some(_) => {}
            None => {
                warn!(identifier, "No entry to pin");
                return Err(FavoritesError::UnknownIdentifier(identifier.to_string()));
            }
        }
        self.store.set_fixed(identifier, true)?;
        self.store.commit()?;
        info!(identifier, "Path pinned");
        self.reload()
    }

    fn unfix(&mut self, _path: &str, identifier: &str) -> Result<()> {
        match self.find(identifier) {
            Some(entry) if !entry.fixed => return Ok(()),
            Some(_) => {}
            None => {
                warn!(identifier, "No entry to unpin");
                return Err(FavoritesError::UnknownIdentifier(identifier.to_string()));
            }
        }
        self.store.set_fixed(identifier, false)?;
        self.store.commit()?;
        info!(identifier, "Path unpinned");
        self.reload()
    }

    fn rename_category(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(FavoritesError::EmptyName);
        }
        if self.groups.contains_key(new) {
            return Err(FavoritesError::DuplicateCategory(new.to_string()));
        }
        if !self.groups.contains_key(old) {
            return Err(FavoritesError::UnknownCategory(old.to_string()));
        }

        let include_uncategorized = old == self.default_category;
        let changed = self.store.set_category(old, new, include_uncategorized)?;
        self.store.commit()?;
        info!(old, new, changed, "Category renamed");
        self.reload()
    }

    fn categories(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    fn entries(&self, category: Option<&str>) -> Vec<PathEntry> {
        match category {
            Some(cat) => self.groups.get(cat).cloned().unwrap_or_default(),
            None => self.groups.values().flatten().cloned().collect(),
        }
    }

    fn find(&self, identifier: &str) -> Option<&PathEntry> {
        self.groups
            .values()
            .flatten()
            .find(|e| e.identifier == identifier)
    }

    fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    fn store_mut(&mut self) -> &mut PathStore {
        &mut self.store
    }

    fn into_store(self: Box<Self>) -> PathStore {
        self.store
    }
}
