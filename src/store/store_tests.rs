use super::*;
use crate::error::FavoritesError;
use tempfile::tempdir;

fn extended_store() -> PathStore {
    let store = PathStore::open_in_memory(Schema::Extended).unwrap();
    store.create_table().unwrap();
    store
}

fn row(path: &str, identifier: &str, fixed: bool, category: Option<&str>) -> PathRow {
    PathRow {
        path: path.to_string(),
        identifier: identifier.to_string(),
        fixed,
        category: category.map(str::to_string),
    }
}

#[test]
fn test_insert_and_read_rows() {
    let mut store = extended_store();
    store.insert(&row("/tmp/a", "A", false, Some("Work"))).unwrap();
    store.insert(&row("/tmp/b", "B", true, None)).unwrap();
    store.commit().unwrap();

    let rows = store.rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], row("/tmp/a", "A", false, Some("Work")));
    assert_eq!(rows[1], row("/tmp/b", "B", true, None));
}

#[test]
fn test_mutations_are_pending_until_commit() {
    let mut store = extended_store();
    assert!(!store.has_pending_changes());
    store.insert(&PathRow::new("/tmp/a", "A")).unwrap();
    assert!(store.has_pending_changes());
    store.commit().unwrap();
    assert!(!store.has_pending_changes());
}

#[test]
fn test_commit_without_changes_is_noop() {
    let mut store = extended_store();
    store.commit().unwrap();
    store.commit().unwrap();
}

#[test]
fn test_delete_and_updates() {
    let mut store = extended_store();
    store.insert(&PathRow::new("/tmp/a", "A")).unwrap();
    store.insert(&PathRow::new("/tmp/b", "B")).unwrap();
    store.commit().unwrap();

    assert_eq!(store.set_identifier("A", "Alpha").unwrap(), 1);
    assert_eq!(store.set_fixed("Alpha", true).unwrap(), 1);
    assert_eq!(store.delete("B").unwrap(), 1);
    assert_eq!(store.delete("missing").unwrap(), 0);
    store.commit().unwrap();

    let rows = store.rows().unwrap();
    assert_eq!(rows, vec![row("/tmp/a", "Alpha", true, None)]);
}

#[test]
fn test_set_category_only_touches_matching_rows() {
    let mut store = extended_store();
    store.insert(&row("/a", "A", false, Some("General"))).unwrap();
    store.insert(&row("/b", "B", false, None)).unwrap();
    store.insert(&row("/c", "C", false, Some("Home"))).unwrap();
    store.commit().unwrap();

    assert_eq!(store.set_category("General", "Work", false).unwrap(), 1);
    assert_eq!(store.set_category("Work", "Office", true).unwrap(), 2);
    store.commit().unwrap();

    let categories: Vec<Option<String>> = store.rows().unwrap().into_iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![
            Some("Office".to_string()),
            Some("Office".to_string()),
            Some("Home".to_string())
        ]
    );
}

#[test]
fn test_basic_schema_has_no_categories() {
    let mut store = PathStore::open_in_memory(Schema::Basic).unwrap();
    store.create_table().unwrap();
    store.insert(&row("/a", "A", false, Some("Ignored"))).unwrap();
    store.commit().unwrap();

    assert_eq!(store.rows().unwrap(), vec![row("/a", "A", false, None)]);
    assert!(matches!(
        store.set_category("x", "y", false),
        Err(FavoritesError::Unsupported(_))
    ));
    assert!(!store.migrate_schema().unwrap());
}

#[test]
fn test_migration_adds_category_and_keeps_rows() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("favorites.db");

    {
        let mut basic = PathStore::open(&db_path, Schema::Basic).unwrap();
        basic.create_table().unwrap();
        basic.insert(&row("/a", "A", true, None)).unwrap();
        basic.close().unwrap();
    }

    let extended = PathStore::open(&db_path, Schema::Extended).unwrap();
    assert!(extended.migrate_schema().unwrap());
    // Second run finds the column already there
    assert!(!extended.migrate_schema().unwrap());
    extended.create_table().unwrap();

    assert_eq!(extended.rows().unwrap(), vec![row("/a", "A", true, None)]);
}

#[test]
fn test_migration_without_table_is_noop() {
    let store = PathStore::open_in_memory(Schema::Extended).unwrap();
    assert!(!store.migrate_schema().unwrap());
}

#[test]
fn test_uncommitted_rows_are_lost_on_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("favorites.db");

    {
        let mut store = PathStore::open(&db_path, Schema::Extended).unwrap();
        store.create_table().unwrap();
        store.insert(&PathRow::new("/kept", "Kept")).unwrap();
        store.commit().unwrap();
        store.insert(&PathRow::new("/lost", "Lost")).unwrap();
        // dropped without commit
    }

    let store = PathStore::open(&db_path, Schema::Extended).unwrap();
    let identifiers: Vec<String> = store.rows().unwrap().into_iter().map(|r| r.identifier).collect();
    assert_eq!(identifiers, vec!["Kept"]);
}

#[test]
fn test_legacy_import_inserts_unfixed_rows_and_removes_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("favorite_paths.json");
    std::fs::write(
        &file,
        r#"{"path": ["/a", "/b"], "identifier": ["A", "B"]}"#,
    )
    .unwrap();

    let mut store = extended_store();
    let outcome = import_legacy_json(&mut store, &file).unwrap();
    assert_eq!(outcome, ImportOutcome::Imported(2));
    assert!(!file.exists());
    assert!(!store.has_pending_changes());

    let rows = store.rows().unwrap();
    assert_eq!(rows, vec![row("/a", "A", false, None), row("/b", "B", false, None)]);

    // Running again is a no-op once the file is gone
    assert_eq!(
        import_legacy_json(&mut store, &file).unwrap(),
        ImportOutcome::NoLegacyFile
    );
    assert_eq!(store.rows().unwrap().len(), 2);
}

#[test]
fn test_legacy_import_zips_to_shorter_array() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("favorite_paths.json");
    std::fs::write(&file, r#"{"path": ["/a", "/b", "/c"], "identifier": ["A"]}"#).unwrap();

    let mut store = extended_store();
    assert_eq!(
        import_legacy_json(&mut store, &file).unwrap(),
        ImportOutcome::Imported(1)
    );
}

#[test]
fn test_legacy_import_skips_existing_identifiers() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("favorite_paths.json");
    std::fs::write(
        &file,
        r#"{"path": ["/a", "/b", "/c"], "identifier": ["A", "B", "B"]}"#,
    )
    .unwrap();

    let mut store = extended_store();
    store.insert(&PathRow::new("/old", "A")).unwrap();
    store.commit().unwrap();

    assert_eq!(
        import_legacy_json(&mut store, &file).unwrap(),
        ImportOutcome::Imported(1)
    );
    let identifiers: Vec<String> = store.rows().unwrap().into_iter().map(|r| r.identifier).collect();
    assert_eq!(identifiers, vec!["A", "B"]);
}

#[test]
fn test_legacy_import_malformed_json_is_reported() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("favorite_paths.json");
    std::fs::write(&file, "{not json").unwrap();

    let mut store = extended_store();
    let err = import_legacy_json(&mut store, &file).unwrap_err();
    assert!(matches!(err, FavoritesError::LegacyDecode(_)));
    assert!(file.exists());
    assert!(store.rows().unwrap().is_empty());
}

#[test]
fn test_legacy_import_missing_file() {
    let dir = tempdir().unwrap();
    let mut store = extended_store();
    assert_eq!(
        import_legacy_json(&mut store, &dir.path().join("nope.json")).unwrap(),
        ImportOutcome::NoLegacyFile
    );
}
