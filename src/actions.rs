//! Copy, cut and paste for the item under the cursor.
//!
//! The actions menu is a navigation level pushed over the item it was opened
//! on. That item's resolved path is kept as the context for whatever action
//! gets selected. The clipboard holds at most one pending operation.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FavoritesError, Result};
use crate::fs_ops::{self, base_name};
use crate::host::Host;
use crate::markers::MarkerResolver;
use crate::messages;
use crate::navigation::{Action, Current, NavigationLevel, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOperation {
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub source: PathBuf,
    pub operation: ClipboardOperation,
}

#[derive(Debug, Default)]
pub struct ActionMenu {
    clipboard: Option<ClipboardItem>,
    context: Option<PathBuf>,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clipboard(&self) -> Option<&ClipboardItem> {
        self.clipboard.as_ref()
    }

    pub fn context(&self) -> Option<&Path> {
        self.context.as_deref()
    }

    /// Menu entries. Paste only shows up while something is pending.
    pub fn available_actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::Copy, Action::Cut, Action::CopyAsPath];
        if self.clipboard.is_some() {
            actions.push(Action::Paste);
        }
        actions
    }

    /// Push the menu for the current item and land on its first entry.
    ///
    /// Returns false when there is no current item with a path.
    pub fn open(&mut self, nav: &mut Navigator, host: &dyn Host, resolver: &MarkerResolver) -> bool {
        let Some(Current {
            path: Some(path), ..
        }) = nav.current(resolver)
        else {
            return false;
        };
        self.context = Some(path);
        nav.push(NavigationLevel::actions(&self.available_actions()));
        nav.advance(host);
        true
    }

    /// Run the selected menu entry.
    ///
    /// The menu is closed afterwards unless a paste failed.
    pub fn select(&mut self, nav: &mut Navigator, host: &dyn Host, resolver: &MarkerResolver) {
        let Some(action) = nav.top().current().and_then(|item| item.as_action()) else {
            return;
        };
        let Some(context) = self.context.clone() else {
            return;
        };

        match action {
            Action::Copy => {
                self.copy(&context, host);
                nav.exit(host, resolver);
            }
            Action::Cut => {
                self.cut(&context, host);
                nav.exit(host, resolver);
            }
            Action::CopyAsPath => {
                copy_as_path(&context, host);
                nav.exit(host, resolver);
            }
            Action::Paste => self.paste_selected(&context, nav, host, resolver),
        }
    }

    pub fn copy(&mut self, source: &Path, host: &dyn Host) {
        self.set_clipboard(source, ClipboardOperation::Copy);
        host.speak(&messages::copied(&base_name(source)));
    }

    pub fn cut(&mut self, source: &Path, host: &dyn Host) {
        self.set_clipboard(source, ClipboardOperation::Cut);
        host.speak(&messages::cut(&base_name(source)));
    }

    fn set_clipboard(&mut self, source: &Path, operation: ClipboardOperation) {
        info!(source = %source.display(), ?operation, "Clipboard set");
        self.clipboard = Some(ClipboardItem {
            source: source.to_path_buf(),
            operation,
        });
    }

    /// Paste the pending item next to `context`.
    ///
    /// The destination directory is `context` itself when it is a directory,
    /// otherwise its parent. A copy stays on the clipboard; a cut is consumed.
    /// Returns where the item was placed.
    pub fn paste_into(&mut self, context: &Path) -> Result<(PathBuf, ClipboardOperation)> {
        let item = self.clipboard.as_ref().ok_or(FavoritesError::ClipboardEmpty)?;

        let dest_dir = if context.is_dir() {
            context
        } else {
            context.parent().unwrap_or(context)
        };
        let dest = dest_dir.join(base_name(&item.source));
        if dest.exists() {
            return Err(FavoritesError::DestinationExists(dest));
        }
        if dest.starts_with(&item.source) {
            let err = io::Error::new(io::ErrorKind::InvalidInput, "A folder cannot be pasted inside itself");
            return Err(FavoritesError::from_io(&item.source, err));
        }

        let operation = item.operation;
        match operation {
            ClipboardOperation::Copy => fs_ops::copy_entry(&item.source, &dest)
                .map_err(|e| FavoritesError::from_io(&item.source, e))?,
            ClipboardOperation::Cut => {
                fs_ops::move_entry(&item.source, &dest)
                    .map_err(|e| FavoritesError::from_io(&item.source, e))?;
                self.clipboard = None;
            }
        }
        info!(dest = %dest.display(), ?operation, "Pasted");
        Ok((dest, operation))
    }

    fn paste_selected(
        &mut self,
        context: &Path,
        nav: &mut Navigator,
        host: &dyn Host,
        resolver: &MarkerResolver,
    ) {
        let (dest, operation) = match self.paste_into(context) {
            Ok(done) => done,
            Err(FavoritesError::ClipboardEmpty) => {
                host.speak(&FavoritesError::ClipboardEmpty.user_message());
                return;
            }
            Err(e) => {
                warn!(error = %e, "Paste failed");
                host.speak(&messages::paste_failed(&e.user_message()));
                return;
            }
        };

        host.speak(match operation {
            ClipboardOperation::Copy => messages::ITEM_PASTED,
            ClipboardOperation::Cut => messages::ITEM_MOVED,
        });
        nav.exit(host, resolver);

        match nav.refresh_directory(&dest) {
            Ok(true) => nav.announce_position(host),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not refresh listing after paste"),
        }
    }
}

fn copy_as_path(context: &Path, host: &dyn Host) {
    match host.copy_to_clipboard(&context.to_string_lossy()) {
        Ok(()) => host.speak(messages::PATH_COPIED),
        Err(e) => {
            let err = FavoritesError::SystemClipboard(e.to_string());
            warn!(error = %err, "Copy as path failed");
            host.speak(&err.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PathEntry;
    use crate::host::RecordingHost;
    use crate::navigation::LevelKind;
    use std::fs;
    use tempfile::tempdir;

    fn record(path: &Path, identifier: &str) -> PathEntry {
        PathEntry {
            path: path.to_string_lossy().into_owned(),
            identifier: identifier.to_string(),
            fixed: false,
            category: None,
        }
    }

    #[test]
    fn test_cut_then_paste_moves_and_clears_clipboard() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("A.txt");
        fs::write(&source, "a").unwrap();
        let target = dir.path().join("D");
        fs::create_dir(&target).unwrap();

        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        menu.cut(&source, &host);
        assert_eq!(host.last_message().as_deref(), Some("Cut: A.txt"));

        let (dest, op) = menu.paste_into(&target).unwrap();
        assert_eq!(op, ClipboardOperation::Cut);
        assert_eq!(dest, target.join("A.txt"));
        assert!(!source.exists());
        assert!(dest.exists());
        assert!(menu.clipboard().is_none());

        let err = menu.paste_into(&target).unwrap_err();
        assert!(matches!(err, FavoritesError::ClipboardEmpty));
        assert_eq!(err.user_message(), "The clipboard is empty");
    }

    #[test]
    fn test_copy_pastes_twice_into_different_directories() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("A.txt");
        fs::write(&source, "a").unwrap();
        let first = dir.path().join("one");
        let second = dir.path().join("two");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();

        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        menu.copy(&source, &host);
        assert_eq!(
            host.last_message().as_deref(),
            Some("Copied, ready to paste: A.txt")
        );

        menu.paste_into(&first).unwrap();
        assert!(menu.clipboard().is_some());
        menu.paste_into(&second).unwrap();

        assert!(source.exists());
        assert!(first.join("A.txt").exists());
        assert!(second.join("A.txt").exists());
    }

    #[test]
    fn test_paste_next_to_a_file_uses_its_parent() {
        let dir = tempdir().unwrap();
        let source_dir = dir.path().join("src");
        fs::create_dir_all(source_dir.join("inner")).unwrap();
        fs::write(source_dir.join("inner").join("x.txt"), "x").unwrap();
        let dest_dir = dir.path().join("dest");
        fs::create_dir(&dest_dir).unwrap();
        let sibling = dest_dir.join("sibling.txt");
        fs::write(&sibling, "s").unwrap();

        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        menu.copy(&source_dir, &host);
        let (dest, _) = menu.paste_into(&sibling).unwrap();
        assert_eq!(dest, dest_dir.join("src"));
        assert!(dest.join("inner").join("x.txt").exists());
    }

    #[test]
    fn test_paste_folder_into_itself_is_refused() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("D");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("f.txt"), "f").unwrap();

        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        menu.copy(&folder, &host);
        let err = menu.paste_into(&folder).unwrap_err();
        assert!(matches!(err, FavoritesError::Filesystem { .. }));
        assert!(!folder.join("D").exists());
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 1);

        menu.cut(&folder, &host);
        assert!(menu.paste_into(&folder).is_err());
        assert!(folder.join("f.txt").exists());
        assert!(!folder.join("D").exists());
        assert!(menu.clipboard().is_some());
    }

    #[test]
    fn test_paste_refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("A.txt");
        fs::write(&source, "a").unwrap();

        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        menu.cut(&source, &host);
        // Pasting into its own directory would overwrite itself
        let err = menu.paste_into(dir.path()).unwrap_err();
        assert!(matches!(err, FavoritesError::DestinationExists(_)));
        assert!(source.exists());
        assert!(menu.clipboard().is_some());
    }

    #[test]
    fn test_available_actions_include_paste_only_when_pending() {
        let host = RecordingHost::new();
        let mut menu = ActionMenu::new();
        assert_eq!(
            menu.available_actions(),
            vec![Action::Copy, Action::Cut, Action::CopyAsPath]
        );
        menu.copy(Path::new("/tmp/a"), &host);
        assert_eq!(menu.available_actions().last(), Some(&Action::Paste));
    }

    #[test]
    fn test_menu_flow_copy_then_paste_in_browsed_directory() {
        let dir = tempdir().unwrap();
        let inbox = dir.path().join("inbox");
        fs::create_dir(&inbox).unwrap();
        fs::write(inbox.join("report.txt"), "r").unwrap();
        let archive = dir.path().join("archive");
        fs::create_dir(&archive).unwrap();
        fs::write(archive.join("old.txt"), "o").unwrap();

        let host = RecordingHost::new();
        let resolver = MarkerResolver::new(dir.path());
        let mut nav = Navigator::new(
            NavigationLevel::catalog(None, vec![record(&archive, "Archive"), record(&inbox, "Inbox")]),
            "Virtual explorer",
        );
        let mut menu = ActionMenu::new();

        // Inbox -> report.txt -> actions -> Copy
        nav.advance(&host);
        nav.advance(&host);
        assert!(nav.enter(&host, &resolver));
        assert!(menu.open(&mut nav, &host, &resolver));
        assert!(nav.in_actions_menu());
        assert_eq!(host.last_message().as_deref(), Some("Copy 1 of 3"));
        menu.select(&mut nav, &host, &resolver);
        assert!(!nav.in_actions_menu());
        assert_eq!(nav.depth(), 2);

        // Back to the catalog, into Archive, open the menu on old.txt, Paste
        nav.exit(&host, &resolver);
        nav.retreat(&host);
        assert!(nav.enter(&host, &resolver));
        assert!(menu.open(&mut nav, &host, &resolver));
        nav.retreat(&host);
        assert_eq!(host.last_message().as_deref(), Some("Paste 4 of 4"));
        host.take_messages();
        menu.select(&mut nav, &host, &resolver);

        assert!(archive.join("report.txt").exists());
        assert!(!nav.in_actions_menu());
        assert_eq!(nav.top().kind(), &LevelKind::Directory(archive.clone()));
        assert_eq!(nav.top().len(), 2);
        let messages = host.messages();
        assert_eq!(messages.first().map(String::as_str), Some("Item pasted."));
        assert_eq!(messages.last().map(String::as_str), Some("report.txt 2 of 2"));
    }

    #[test]
    fn test_failed_paste_keeps_menu_open() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let host = RecordingHost::new();
        let resolver = MarkerResolver::new(dir.path());
        let mut nav = Navigator::new(
            NavigationLevel::catalog(None, vec![record(&file, "A")]),
            "Virtual explorer",
        );
        let mut menu = ActionMenu::new();
        menu.copy(&file, &host);

        nav.advance(&host);
        menu.open(&mut nav, &host, &resolver);
        nav.retreat(&host);
        menu.select(&mut nav, &host, &resolver);

        assert!(nav.in_actions_menu());
        assert_eq!(
            host.last_message().as_deref(),
            Some("Error pasting: a.txt already exists.")
        );
    }

    #[test]
    fn test_copy_as_path_writes_system_clipboard() {
        let dir = tempdir().unwrap();
        let host = RecordingHost::new();
        let resolver = MarkerResolver::new(dir.path());
        let mut nav = Navigator::new(
            NavigationLevel::catalog(None, vec![record(dir.path(), "Root")]),
            "Virtual explorer",
        );
        let mut menu = ActionMenu::new();

        nav.advance(&host);
        menu.open(&mut nav, &host, &resolver);
        nav.advance(&host);
        nav.advance(&host);
        menu.select(&mut nav, &host, &resolver);

        assert_eq!(host.clipboard(), vec![dir.path().to_string_lossy().into_owned()]);
        assert!(host.messages().contains(&"Path copied to clipboard".to_string()));
        assert!(!nav.in_actions_menu());
    }
}
