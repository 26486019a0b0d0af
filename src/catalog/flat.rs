//! Basic catalog: one list, pinned entries first.
//!
//! Pin and unpin splice the entry in place instead of resorting. `last_fixed`
//! marks the end of the pinned block and is kept in step by every mutation.

use tracing::{info, instrument, warn};

use super::{sort_pinned_first, validate_new_entry, validate_new_identifier, Catalog, PathEntry, Variant};
use crate::error::{FavoritesError, Result};
use crate::markers::MarkerResolver;
use crate::store::PathStore;

pub struct FlatCatalog {
    store: PathStore,
    resolver: MarkerResolver,
    entries: Vec<PathEntry>,
    /// Index of the last pinned entry, `None` when nothing is pinned
    last_fixed: Option<usize>,
}

impl FlatCatalog {
    pub fn new(store: PathStore, resolver: MarkerResolver) -> Self {
        Self {
            store,
            resolver,
            entries: Vec::new(),
            last_fixed: None,
        }
    }

    pub fn last_fixed(&self) -> Option<usize> {
        self.last_fixed
    }

    /// Where the next pinned entry goes: right after the pinned block.
    fn pin_slot(&self) -> usize {
        self.last_fixed.map_or(0, |i| i + 1)
    }

    fn position(&self, path: &str, identifier: &str, fixed: bool) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.path == path && e.identifier == identifier && e.fixed == fixed)
    }
}

impl Catalog for FlatCatalog {
    fn variant(&self) -> Variant {
        Variant::Basic
    }

    #[instrument(name = "flat_catalog_load", skip(self))]
    fn load(&mut self) -> Result<()> {
        match self.store.rows() {
            Ok(rows) => {
                let (entries, fixed_count) =
                    sort_pinned_first(rows.into_iter().map(PathEntry::from).collect());
                self.entries = entries;
                self.last_fixed = fixed_count.checked_sub(1);
                info!(count = self.entries.len(), pinned = fixed_count, "Loaded favorites");
                Ok(())
            }
            Err(e) => {
                self.entries.clear();
                self.last_fixed = None;
                Err(e)
            }
        }
    }

    fn add(&mut self, path: &str, identifier: &str, _category: Option<&str>, fixed: bool) -> Result<()> {
        validate_new_entry(&*self, &self.resolver, path, identifier)?;

        let entry = PathEntry {
            path: path.to_string(),
            identifier: identifier.to_string(),
            fixed,
            category: None,
        };
        self.store.insert(&entry.to_row())?;
        self.store.commit()?;

        if fixed {
            let slot = self.pin_slot();
            self.entries.insert(slot, entry);
            self.last_fixed = Some(slot);
        } else {
            self.entries.push(entry);
        }
        info!(identifier, fixed, "Path added");
        Ok(())
    }

    fn delete(&mut self, identifier: &str) -> Result<()> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.identifier == identifier)
            .ok_or_else(|| FavoritesError::UnknownIdentifier(identifier.to_string()))?;

        self.store.delete(identifier)?;
        self.store.commit()?;

        self.entries.remove(idx);
        if let Some(last) = self.last_fixed {
            if idx <= last {
                self.last_fixed = last.checked_sub(1);
            }
        }
        info!(identifier, "Path deleted");
        Ok(())
    }

    fn rename(&mut self, old_identifier: &str, new_identifier: &str) -> Result<()> {
        validate_new_identifier(&*self, new_identifier)?;
        let idx = self
            .entries
            .iter()
            .position(|e| e.identifier == old_identifier)
            .ok_or_else(|| FavoritesError::UnknownIdentifier(old_identifier.to_string()))?;

        self.store.set_identifier(old_identifier, new_identifier)?;
        self.store.commit()?;

        self.entries[idx].identifier = new_identifier.to_string();
        info!(old_identifier, new_identifier, "Path renamed");
        Ok(())
    }

    fn fix(&mut self, path: &str, identifier: &str) -> Result<()> {
        let Some(idx) = self.position(path, identifier, false) else {
            warn!(identifier, "No unpinned entry to pin");
            return Err(FavoritesError::UnknownIdentifier(identifier.to_string()));
        };

        self.store.set_fixed(identifier, true)?;
        self.store.commit()?;

        let mut entry = self.entries.remove(idx);
        entry.fixed = true;
        // idx is past the pinned block, so removing it doesn't shift the slot
        let slot = self.pin_slot();
        self.entries.insert(slot, entry);
        self.last_fixed = Some(slot);
        info!(identifier, position = slot, "Path pinned");
        Ok(())
    }

    fn unfix(&mut self, path: &str, identifier: &str) -> Result<()> {
        let Some(idx) = self.position(path, identifier, true) else {
            warn!(identifier, "No pinned entry to unpin");
            return Err(FavoritesError::UnknownIdentifier(identifier.to_string()));
        };

        self.store.set_fixed(identifier, false)?;
        self.store.commit()?;

        let mut entry = self.entries.remove(idx);
        entry.fixed = false;
        self.entries.push(entry);
        self.last_fixed = self.last_fixed.and_then(|last| last.checked_sub(1));
        info!(identifier, "Path unpinned");
        Ok(())
    }

    fn entries(&self, _category: Option<&str>) -> Vec<PathEntry> {
        self.entries.clone()
    }

    fn find(&self, identifier: &str) -> Option<&PathEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn store_mut(&mut self) -> &mut PathStore {
        &mut self.store
    }

    fn into_store(self: Box<Self>) -> PathStore {
        self.store
    }
}
