//! Persistent favorites table
//!
//! SQLite-backed storage for favorite-path rows, the one-time schema
//! migration that adds categories, and the legacy JSON import.

mod database;
mod legacy;

pub use database::{PathRow, PathStore, Schema, TABLE_NAME};
pub use legacy::{import_legacy_json, ImportOutcome};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
