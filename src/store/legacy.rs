//! One-time import of the JSON favorites file used before the database.
//!
//! Format: `{"path": [...], "identifier": [...]}`, zipped pairwise.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::database::{PathRow, PathStore};
use crate::error::{FavoritesError, Result};

#[derive(Debug, Default, Deserialize)]
struct LegacyFavorites {
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    identifier: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    NoLegacyFile,
    Imported(usize),
}

/// Insert the legacy pairs as unpinned rows, commit, and delete the file.
///
/// Identifiers already present in the store (or repeated in the file) are
/// skipped. A malformed file is left in place and reported as an error.
pub fn import_legacy_json(store: &mut PathStore, file: &Path) -> Result<ImportOutcome> {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ImportOutcome::NoLegacyFile)
        }
        Err(e) => return Err(FavoritesError::from_io(file, e)),
    };

    let legacy: LegacyFavorites = serde_json::from_str(&content)?;

    let mut seen: HashSet<String> = store.rows()?.into_iter().map(|r| r.identifier).collect();
    let mut imported = 0;
    for (path, identifier) in legacy.path.into_iter().zip(legacy.identifier) {
        if !seen.insert(identifier.clone()) {
            warn!(identifier = %identifier, "Skipping duplicate identifier in legacy favorites");
            continue;
        }
        store.insert(&PathRow::new(path, identifier))?;
        imported += 1;
    }
    store.commit()?;

    std::fs::remove_file(file).map_err(|e| FavoritesError::from_io(file, e))?;
    info!(imported, file = %file.display(), "Imported legacy favorites");
    Ok(ImportOutcome::Imported(imported))
}
