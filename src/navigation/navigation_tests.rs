use std::fs;
use std::path::{Path, PathBuf};

use super::*;
use crate::catalog::PathEntry;
use crate::host::RecordingHost;
use crate::markers::MarkerResolver;
use tempfile::tempdir;

fn entry(path: &Path, identifier: &str) -> PathEntry {
    PathEntry {
        path: path.to_string_lossy().into_owned(),
        identifier: identifier.to_string(),
        fixed: false,
        category: None,
    }
}

fn navigator(entries: Vec<PathEntry>) -> Navigator {
    Navigator::new(NavigationLevel::catalog(None, entries), "Favorite paths")
}

fn resolver() -> MarkerResolver {
    MarkerResolver::new(Path::new("/home/test"))
}

fn raw_items(names: &[&str]) -> Vec<Item> {
    names.iter().map(|n| Item::RawPath(PathBuf::from(n))).collect()
}

#[test]
fn test_advance_wraps_around() {
    let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a", "b", "c"]));
    assert_eq!(level.advance(), Some(0));
    assert_eq!(level.advance(), Some(1));
    assert_eq!(level.advance(), Some(2));
    assert_eq!(level.advance(), Some(0));
}

#[test]
fn test_retreat_from_no_selection_lands_on_last() {
    let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a", "b", "c"]));
    assert_eq!(level.retreat(), Some(2));
    assert_eq!(level.retreat(), Some(1));
    assert_eq!(level.retreat(), Some(0));
    assert_eq!(level.retreat(), Some(2));
}

#[test]
fn test_advance_then_retreat_is_identity() {
    for start in 0..4 {
        let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a", "b", "c", "d"]));
        level.select(Some(start));
        level.advance();
        level.retreat();
        assert_eq!(level.cursor(), Some(start));
        level.retreat();
        level.advance();
        assert_eq!(level.cursor(), Some(start));
    }
}

#[test]
fn test_n_advances_return_to_start() {
    let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a", "b", "c"]));
    level.select(Some(1));
    for _ in 0..3 {
        level.advance();
    }
    assert_eq!(level.cursor(), Some(1));
}

#[test]
fn test_empty_level_does_not_move() {
    let mut level = NavigationLevel::new(LevelKind::Actions, Vec::new());
    assert_eq!(level.advance(), None);
    assert_eq!(level.retreat(), None);
    assert_eq!(level.cursor(), None);
}

#[test]
fn test_replace_items_clamps_cursor() {
    let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a", "b", "c"]));
    level.select(Some(2));
    level.replace_items(raw_items(&["a", "b"]));
    assert_eq!(level.cursor(), Some(1));
    level.replace_items(Vec::new());
    assert_eq!(level.cursor(), None);
}

#[test]
fn test_select_out_of_range_clears_cursor() {
    let mut level = NavigationLevel::new(LevelKind::Actions, raw_items(&["a"]));
    level.select(Some(5));
    assert_eq!(level.cursor(), None);
}

#[test]
fn test_empty_catalog_announces_no_saved_paths() {
    let host = RecordingHost::new();
    let mut nav = navigator(Vec::new());
    nav.advance(&host);
    nav.retreat(&host);
    assert_eq!(host.messages(), vec!["No saved paths!", "No saved paths!"]);
    assert_eq!(nav.depth(), 1);
    assert!(nav.current(&resolver()).is_none());
}

#[test]
fn test_advance_announces_position() {
    let host = RecordingHost::new();
    let mut nav = navigator(vec![
        entry(Path::new("/a"), "Alpha"),
        entry(Path::new("/b"), "Beta"),
    ]);
    nav.advance(&host);
    nav.advance(&host);
    nav.advance(&host);
    assert_eq!(
        host.messages(),
        vec!["Alpha 1 of 2", "Beta 2 of 2", "Alpha 1 of 2"]
    );
}

#[test]
fn test_current_resolves_markers() {
    let host = RecordingHost::new();
    let mut nav = navigator(vec![PathEntry {
        path: "$documents/notes".to_string(),
        identifier: "Notes".to_string(),
        fixed: false,
        category: None,
    }]);
    assert!(nav.current(&resolver()).is_none());
    nav.advance(&host);
    let current = nav.current(&resolver()).unwrap();
    assert_eq!(current.path, Some(PathBuf::from("/home/test/Documents/notes")));
    assert_eq!(current.item.display_name(), "Notes");
}

#[test]
fn test_enter_directory_pushes_and_announces_first_child() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("file.txt"), "x").unwrap();

    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(dir.path(), "Root")]);
    nav.advance(&host);
    host.take_messages();

    assert!(nav.enter(&host, &resolver()));
    assert_eq!(nav.depth(), 2);
    assert_eq!(host.messages(), vec!["sub 1 of 2"]);
    assert_eq!(nav.top().kind(), &LevelKind::Directory(dir.path().to_path_buf()));
}

#[test]
fn test_enter_empty_directory_does_not_push() {
    let dir = tempdir().unwrap();
    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(dir.path(), "Empty")]);
    nav.advance(&host);
    host.take_messages();

    assert!(!nav.enter(&host, &resolver()));
    assert_eq!(nav.depth(), 1);
    assert_eq!(host.messages(), vec!["Empty folder"]);
}

#[test]
fn test_enter_file_launches_it() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("readme.txt");
    fs::write(&file, "x").unwrap();

    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(&file, "Readme")]);
    nav.advance(&host);

    assert!(!nav.enter(&host, &resolver()));
    assert_eq!(nav.depth(), 1);
    assert_eq!(host.launched(), vec![file]);
}

#[test]
fn test_enter_without_selection_is_noop() {
    let dir = tempdir().unwrap();
    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(dir.path(), "Root")]);
    assert!(!nav.enter(&host, &resolver()));
    assert!(host.messages().is_empty());
}

#[test]
fn test_launch_failure_is_spoken() {
    let host = RecordingHost::failing_launch("no handler for this file");
    let mut nav = navigator(vec![entry(Path::new("/a"), "A")]);
    nav.advance(&host);
    host.take_messages();

    nav.launch(&host, &resolver());
    assert_eq!(host.messages(), vec!["no handler for this file"]);
}

#[test]
fn test_exit_never_pops_bottom_level() {
    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(Path::new("/a"), "A")]);
    assert!(!nav.exit(&host, &resolver()));
    assert_eq!(nav.depth(), 1);
    assert!(host.messages().is_empty());
}

#[test]
fn test_exit_announces_previous_item_or_top_label() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("inner")).unwrap();
    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(dir.path(), "Root")]);
    nav.advance(&host);
    nav.enter(&host, &resolver());
    host.take_messages();

    assert!(nav.exit(&host, &resolver()));
    let expected = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(host.messages(), vec![expected]);

    // Nothing selected at the bottom: the label is spoken instead
    let mut fresh = navigator(vec![entry(dir.path(), "Root")]);
    fresh.push(NavigationLevel::actions(&[Action::Copy]));
    assert!(fresh.exit(&host, &resolver()));
    assert_eq!(host.last_message().as_deref(), Some("Favorite paths"));
}

#[test]
fn test_refresh_directory_selects_new_item() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let host = RecordingHost::new();
    let mut nav = navigator(vec![entry(dir.path(), "Root")]);
    nav.advance(&host);
    nav.enter(&host, &resolver());

    let added = dir.path().join("b.txt");
    fs::write(&added, "b").unwrap();
    assert!(nav.refresh_directory(&added).unwrap());
    assert_eq!(nav.top().len(), 2);
    assert_eq!(nav.top().cursor(), Some(1));

    assert!(nav.refresh_directory(&dir.path().join("missing")).unwrap());
    assert_eq!(nav.top().cursor(), None);
}

#[test]
fn test_refresh_directory_on_catalog_level_is_noop() {
    let mut nav = navigator(vec![entry(Path::new("/a"), "A")]);
    assert!(!nav.refresh_directory(Path::new("/a")).unwrap());
}

#[test]
fn test_in_actions_menu() {
    let mut nav = navigator(vec![entry(Path::new("/a"), "A")]);
    assert!(!nav.in_actions_menu());
    nav.push(NavigationLevel::actions(&[Action::Copy, Action::Cut]));
    assert!(nav.in_actions_menu());
    assert_eq!(nav.depth(), 2);
    nav.pop();
    assert!(!nav.in_actions_menu());
}
