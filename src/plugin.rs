//! The favorites plugin as the host sees it.
//!
//! Owns the catalog, the navigation stack and the clipboard, maps gestures
//! to handlers, and exposes the callbacks the data-entry dialog uses. Every
//! failure ends up as an announcement; nothing is raised past this layer
//! except from the dialog callbacks, which also return the error.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::actions::ActionMenu;
use crate::catalog::{self, open_catalog, Catalog, Variant};
use crate::config::{Config, ToneConfig};
use crate::error::{FavoritesError, Result, ResultExt};
use crate::gestures::{Command, CommandRegistry, GestureRegistry};
use crate::host::Host;
use crate::markers::MarkerResolver;
use crate::messages;
use crate::navigation::{Item, LevelKind, NavigationLevel, Navigator};
use crate::store::{import_legacy_json, ImportOutcome, PathStore, Schema};

/// Host-independent startup parameters.
#[derive(Debug, Clone)]
pub struct PluginSettings {
    pub variant: Variant,
    /// `None` keeps everything in memory
    pub database_path: Option<PathBuf>,
    pub legacy_json_path: Option<PathBuf>,
    pub default_category: String,
    pub tone: ToneConfig,
    pub resolver: MarkerResolver,
    pub gesture_overrides: HashMap<String, Option<String>>,
}

impl PluginSettings {
    pub fn from_config(config: &Config) -> Self {
        let resolver = config
            .extra_markers()
            .into_iter()
            .fold(MarkerResolver::from_system(), |r, (token, path)| {
                r.with_marker(token, path)
            });
        Self {
            variant: config.variant,
            database_path: Some(config.database_path()),
            legacy_json_path: config
                .should_import_legacy()
                .then(|| config.legacy_json_path()),
            default_category: config.get_default_category(),
            tone: config.get_tone(),
            resolver,
            gesture_overrides: config.gesture_overrides(),
        }
    }

    /// In-memory store, no legacy import.
    pub fn in_memory(variant: Variant, resolver: MarkerResolver) -> Self {
        Self {
            variant,
            database_path: None,
            legacy_json_path: None,
            default_category: crate::config::DEFAULT_CATEGORY.to_string(),
            tone: ToneConfig::default(),
            resolver,
            gesture_overrides: HashMap::new(),
        }
    }
}

/// Start and stop hooks the host calls around the plugin's lifetime.
pub trait Lifecycle {
    /// Create or migrate the table, import legacy data, load the catalog.
    fn init(&mut self) -> Result<()>;

    /// Commit and close the store. Gestures are ignored afterwards.
    fn terminate(&mut self) -> Result<()>;
}

pub struct FavoritesPlugin<H: Host> {
    host: H,
    settings: PluginSettings,
    /// `None` once terminated
    catalog: Option<Box<dyn Catalog>>,
    navigator: Navigator,
    actions: ActionMenu,
    gestures: GestureRegistry,
    category_index: Option<usize>,
}

impl<H: Host> FavoritesPlugin<H> {
    /// Open the store. Call [`Lifecycle::init`] before use.
    pub fn new(settings: PluginSettings, host: H) -> Result<Self> {
        let schema = match settings.variant {
            Variant::Basic => Schema::Basic,
            Variant::Extended => Schema::Extended,
        };
        let store = match &settings.database_path {
            Some(path) => PathStore::open(path, schema)?,
            None => PathStore::open_in_memory(schema)?,
        };
        let catalog = open_catalog(
            settings.variant,
            store,
            settings.resolver.clone(),
            &settings.default_category,
        );

        let mut gestures = GestureRegistry::for_variant(settings.variant);
        let issues = gestures.apply_overrides(&settings.gesture_overrides);
        if !issues.is_empty() {
            warn!(count = issues.len(), "Some gesture overrides were ignored");
        }

        let top_label = match settings.variant {
            Variant::Basic => messages::BASIC_TOP_LABEL,
            Variant::Extended => messages::EXTENDED_TOP_LABEL,
        };

        Ok(Self {
            host,
            settings,
            catalog: Some(catalog),
            navigator: Navigator::new(NavigationLevel::catalog(None, Vec::new()), top_label),
            actions: ActionMenu::new(),
            gestures,
            category_index: None,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn actions(&self) -> &ActionMenu {
        &self.actions
    }

    pub fn variant(&self) -> Variant {
        self.settings.variant
    }

    pub fn catalog(&self) -> Option<&dyn Catalog> {
        self.catalog.as_deref()
    }

    pub fn categories(&self) -> Vec<String> {
        self.catalog().map(|c| c.categories()).unwrap_or_default()
    }

    /// Category shown at the bottom of the stack (extended only).
    pub fn current_category(&self) -> Option<&str> {
        match self.navigator.bottom().kind() {
            LevelKind::Catalog { category } => category.as_deref(),
            _ => None,
        }
    }

    fn catalog_mut(&mut self) -> Result<&mut Box<dyn Catalog>> {
        self.catalog.as_mut().ok_or(FavoritesError::NotRunning)
    }

    /// Rebuild the bottom level from the catalog.
    ///
    /// Basic patches the list in place and keeps pushed levels. Extended
    /// returns to depth 1, staying on the same category when it still exists.
    fn sync_navigation(&mut self) {
        let Some(catalog) = self.catalog.as_deref() else {
            return;
        };

        if catalog.variant() == Variant::Basic {
            let items = catalog.entries(None).into_iter().map(Item::Record).collect();
            self.navigator.replace_bottom_items(items);
            return;
        }

        let categories = catalog.categories();
        let previous = match self.navigator.bottom().kind() {
            LevelKind::Catalog { category } => category.clone(),
            _ => None,
        };
        let index = previous
            .as_ref()
            .and_then(|name| categories.iter().position(|c| c == name))
            .or(if categories.is_empty() { None } else { Some(0) });
        let category = index.map(|i| categories[i].clone());

        let cursor = if category == previous {
            self.navigator.bottom().cursor()
        } else {
            None
        };
        let entries = category
            .as_deref()
            .map(|c| catalog.entries(Some(c)))
            .unwrap_or_default();
        let mut level = NavigationLevel::catalog(category, entries);
        level.select(cursor.map(|c| c.min(level.len().saturating_sub(1))));

        self.category_index = index;
        self.navigator.reset(level);
    }

    // ---------------------------------------------------------------
    // Gesture handlers
    // ---------------------------------------------------------------

    pub fn next_path(&mut self) {
        self.navigator.advance(&self.host);
    }

    pub fn previous_path(&mut self) {
        self.navigator.retreat(&self.host);
    }

    pub fn enter_directory(&mut self) {
        let resolver = &self.settings.resolver;
        if self.navigator.in_actions_menu() {
            self.actions.select(&mut self.navigator, &self.host, resolver);
        } else {
            self.navigator.enter(&self.host, resolver);
        }
    }

    pub fn exit_directory(&mut self) {
        self.navigator.exit(&self.host, &self.settings.resolver);
    }

    pub fn launch_item(&mut self) {
        let resolver = &self.settings.resolver;
        if self.navigator.in_actions_menu() {
            self.actions.select(&mut self.navigator, &self.host, resolver);
        } else {
            self.navigator.launch(&self.host, resolver);
        }
    }

    pub fn show_context_menu(&mut self) {
        if self.settings.variant != Variant::Extended || self.navigator.in_actions_menu() {
            return;
        }
        self.actions
            .open(&mut self.navigator, &self.host, &self.settings.resolver);
    }

    pub fn add_new_path(&mut self) {
        self.host.show_paths_dialog();
    }

    /// Delete the favorite under the cursor. Only at depth 1.
    pub fn delete_item(&mut self) {
        if self.navigator.is_empty() || self.navigator.depth() > 1 {
            return;
        }
        let Some(current) = self.navigator.current(&self.settings.resolver) else {
            return;
        };
        let Item::Record(entry) = current.item else {
            return;
        };

        let result = match self.catalog.as_mut() {
            Some(catalog) => catalog.delete(&entry.identifier),
            None => Err(FavoritesError::NotRunning),
        };
        match result {
            Ok(()) => {
                self.sync_navigation();
                self.host.speak(&messages::path_deleted(&entry.identifier));
            }
            Err(e) => {
                warn!(identifier = %entry.identifier, error = %e, "Delete failed");
                self.host.speak(messages::DELETE_FAILED);
            }
        }
    }

    pub fn next_category(&mut self) {
        self.switch_category(true);
    }

    pub fn previous_category(&mut self) {
        self.switch_category(false);
    }

    fn switch_category(&mut self, forward: bool) {
        if self.navigator.in_actions_menu() {
            self.host.speak(messages::CATEGORY_SWITCH_BLOCKED);
            return;
        }
        let Some(catalog) = self.catalog.as_deref() else {
            return;
        };
        let categories = catalog.categories();
        if categories.is_empty() {
            self.host.speak(messages::NO_CATEGORIES);
            return;
        }

        let len = categories.len();
        let next = match (self.category_index, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let name = categories[next].clone();
        let entries = catalog.entries(Some(&name));
        debug!(category = %name, count = entries.len(), "Switching category");

        self.host
            .speak(&messages::category_summary(&name, entries.len()));
        self.navigator
            .reset(NavigationLevel::catalog(Some(name), entries));
        self.category_index = Some(next);
    }

    // ---------------------------------------------------------------
    // Dialog callbacks
    // ---------------------------------------------------------------

    /// Save a new favorite. Markers in `path` are expanded before storing.
    pub fn add_path(&mut self, path: &str, identifier: &str, category: Option<&str>) -> Result<()> {
        if path.trim().is_empty() || identifier.trim().is_empty() {
            self.host.speak(messages::FILL_IN_FIELDS);
            return Err(FavoritesError::EmptyName);
        }
        let resolved = self.settings.resolver.resolve(path.trim());
        let result = self
            .catalog_mut()
            .and_then(|c| c.add(&resolved, identifier.trim(), category, false));
        match result {
            Ok(()) => {
                self.sync_navigation();
                let tone = self.settings.tone;
                self.host.beep(tone.frequency_hz, tone.duration_ms);
                self.host.speak(messages::PATH_ADDED);
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    pub fn delete_path(&mut self, identifier: &str) -> Result<()> {
        match self.catalog_mut().and_then(|c| c.delete(identifier)) {
            Ok(()) => {
                self.sync_navigation();
                self.host.speak(&messages::path_deleted(identifier));
                Ok(())
            }
            Err(e) => {
                warn!(identifier, error = %e, "Delete failed");
                self.host.speak(messages::DELETE_FAILED);
                Err(e)
            }
        }
    }

    pub fn rename_path(&mut self, old_identifier: &str, new_identifier: &str) -> Result<()> {
        let new_identifier = new_identifier.trim();
        match self
            .catalog_mut()
            .and_then(|c| c.rename(old_identifier, new_identifier))
        {
            Ok(()) => {
                self.sync_navigation();
                self.host.speak(messages::PATH_RENAMED);
                Ok(())
            }
            Err(e @ FavoritesError::DuplicateIdentifier(_)) => {
                self.host.speak(messages::IDENTIFIER_IN_USE);
                Err(e)
            }
            Err(e) => self.report(e),
        }
    }

    pub fn fix_path(&mut self, path: &str, identifier: &str) -> Result<()> {
        match self.catalog_mut().and_then(|c| c.fix(path, identifier)) {
            Ok(()) => {
                self.sync_navigation();
                self.host.speak(messages::PATH_PINNED);
                Ok(())
            }
            Err(e @ FavoritesError::UnknownIdentifier(_)) => {
                self.host.speak(messages::PIN_FAILED);
                Err(e)
            }
            Err(e) => self.report(e),
        }
    }

    pub fn unfix_path(&mut self, path: &str, identifier: &str) -> Result<()> {
        match self.catalog_mut().and_then(|c| c.unfix(path, identifier)) {
            Ok(()) => {
                self.sync_navigation();
                self.host.speak(messages::PATH_UNPINNED);
                Ok(())
            }
            Err(e @ FavoritesError::UnknownIdentifier(_)) => {
                self.host.speak(messages::UNPIN_FAILED);
                Err(e)
            }
            Err(e) => self.report(e),
        }
    }

    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<()> {
        match self.catalog_mut().and_then(|c| c.rename_category(old, new)) {
            Ok(()) => {
                self.rename_current_category(old, new.trim());
                self.sync_navigation();
                self.host.speak(messages::CATEGORY_RENAMED);
                Ok(())
            }
            Err(e @ FavoritesError::EmptyName) => {
                self.host.speak(messages::CATEGORY_NAME_EMPTY);
                Err(e)
            }
            Err(e) => self.report(e),
        }
    }

    /// Keep showing a category the user just renamed.
    fn rename_current_category(&mut self, old: &str, new: &str) {
        if self.current_category() == Some(old) {
            let items = self.navigator.bottom().items().to_vec();
            let cursor = self.navigator.bottom().cursor();
            let mut level = NavigationLevel::new(
                LevelKind::Catalog {
                    category: Some(new.to_string()),
                },
                items,
            );
            level.select(cursor);
            self.navigator.reset(level);
        }
    }

    /// Rows for the dialog's list, all categories when `category` is `None`.
    pub fn listing(&self, category: Option<&str>) -> Vec<String> {
        self.catalog()
            .map(|c| catalog::listing(c, category))
            .unwrap_or_default()
    }

    fn report(&self, e: FavoritesError) -> Result<()> {
        warn!(error = %e, kind = ?e.kind(), "Operation rejected");
        self.host.speak(&e.user_message());
        Err(e)
    }
}

impl<H: Host> Lifecycle for FavoritesPlugin<H> {
    fn init(&mut self) -> Result<()> {
        let catalog = self.catalog.as_mut().ok_or(FavoritesError::NotRunning)?;
        let store = catalog.store_mut();
        store.migrate_schema()?;
        store.create_table()?;

        if let Some(legacy) = &self.settings.legacy_json_path {
            match import_legacy_json(store, legacy) {
                Ok(ImportOutcome::Imported(count)) => info!(count, "Legacy favorites imported"),
                Ok(ImportOutcome::NoLegacyFile) => {}
                Err(e) => {
                    warn!(error = %e, "Legacy import failed");
                    self.host.speak(&e.user_message());
                }
            }
        }

        if let Err(e) = catalog.load() {
            error!(error = %e, "Could not load favorites");
            self.host.speak(&e.user_message());
        }
        self.sync_navigation();
        info!(
            variant = self.settings.variant.name(),
            count = self.catalog().map_or(0, |c| c.len()),
            "Favorites plugin initialized"
        );
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        let Some(mut catalog) = self.catalog.take() else {
            return Ok(());
        };
        catalog.store_mut().commit().log_err();
        catalog.into_store().close()?;
        info!(event_type = "app_lifecycle", action = "terminated", "Favorites plugin stopped");
        Ok(())
    }
}

impl<H: Host> CommandRegistry for FavoritesPlugin<H> {
    fn gestures(&self) -> &GestureRegistry {
        &self.gestures
    }

    fn run(&mut self, command: Command) {
        if self.catalog.is_none() {
            debug!(command = command.id(), "Ignoring command after terminate");
            return;
        }
        debug!(command = command.id(), depth = self.navigator.depth(), "Running command");
        match command {
            Command::AddNewPath => self.add_new_path(),
            Command::EnterDirectory => self.enter_directory(),
            Command::ExitDirectory => self.exit_directory(),
            Command::LaunchItem => self.launch_item(),
            Command::DeleteItem => self.delete_item(),
            Command::PreviousPath => self.previous_path(),
            Command::NextPath => self.next_path(),
            Command::ShowContextMenu => self.show_context_menu(),
            Command::NextCategory => self.next_category(),
            Command::PreviousCategory => self.previous_category(),
        }
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
