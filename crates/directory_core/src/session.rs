use tracing::debug;

use crate::collate::{Collation, CollationError};
use crate::filter::filter_by_country;
use crate::record::UserRecord;
use crate::sort::{sort_records, SortKey};
use crate::store::RecordStore;

/// Presentation toggles. Deliberately independent of the record store:
/// deletes and resets leave every field here untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub color_rows: bool,
    pub sort_key: SortKey,
    pub filter_text: Option<String>,
}

/// Inputs the derived view depends on. The cached rows are reused until one
/// of these moves.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    revision: u64,
    sort_key: SortKey,
    filter_text: Option<String>,
}

#[derive(Debug, Default)]
struct ViewCache {
    key: Option<ViewKey>,
    rows: Vec<UserRecord>,
}

/// Owns the record store, the UI toggles, and the memoized derived view.
///
/// Every state transition of a directory session goes through a method here,
/// so the view cache observes all of them. Derivation itself is the pure
/// `filter_by_country` / `sort_records` pipeline; recomputing it is
/// side-effect-free and safe to run on every frame.
#[derive(Debug)]
pub struct DirectorySession {
    store: RecordStore,
    ui: UiState,
    collation: Collation,
    cache: ViewCache,
}

impl DirectorySession {
    /// Fails only if collation data cannot be loaded.
    pub fn new() -> Result<Self, CollationError> {
        Ok(Self {
            store: RecordStore::new(),
            ui: UiState::default(),
            collation: Collation::new()?,
            cache: ViewCache::default(),
        })
    }

    /// Installs the one fetched batch. See `RecordStore::load` for the
    /// write-once snapshot contract; returns whether the batch was accepted.
    pub fn load_users(&mut self, records: Vec<UserRecord>) -> bool {
        self.store.load(records)
    }

    pub fn delete_user(&mut self, email: &str) -> bool {
        self.store.delete(email)
    }

    /// Restores the originally fetched batch. UI toggles, sort key, and
    /// filter text all persist across a reset.
    pub fn reset_users(&mut self) -> bool {
        self.store.reset()
    }

    pub fn toggle_color_rows(&mut self) {
        self.ui.color_rows = !self.ui.color_rows;
    }

    /// Replaces the sort key unconditionally. Re-selecting the active key is
    /// an idempotent no-op in effect.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.ui.sort_key = key;
    }

    /// The dedicated country-sort button: on from `None`, off from any
    /// active key.
    pub fn toggle_country_sort(&mut self) {
        self.ui.sort_key = self.ui.sort_key.toggled_country();
    }

    /// Replaces the filter text unconditionally; `None` or an empty string
    /// clears the filter.
    pub fn set_filter_text(&mut self, text: Option<String>) {
        self.ui.filter_text = text;
    }

    /// The derived view: working list, filtered then sorted. Cached; the
    /// pipeline reruns only when the store revision, sort key, or filter
    /// text has changed since the last call.
    pub fn visible_users(&mut self) -> &[UserRecord] {
        let key = ViewKey {
            revision: self.store.revision(),
            sort_key: self.ui.sort_key,
            filter_text: self.ui.filter_text.clone(),
        };
        if self.cache.key.as_ref() != Some(&key) {
            debug!(
                revision = key.revision,
                sort_key = ?key.sort_key,
                filtered = key.filter_text.is_some(),
                "recomputing derived view"
            );
            let filtered = filter_by_country(self.store.working(), key.filter_text.as_deref());
            let sorted = sort_records(&filtered, key.sort_key, &self.collation);
            self.cache.rows = sorted.into_owned();
            self.cache.key = Some(key);
        }
        &self.cache.rows
    }

    /// The raw working list, in insertion order.
    pub fn users(&self) -> &[UserRecord] {
        self.store.working()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }
}
