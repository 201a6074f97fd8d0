//! Domain store: the in-memory mirror of people, items and sessions.
//!
//! # Responsibility
//! - Hydrate the three collections once at startup (seeding sample data).
//! - Provide CRUD and attendance commits that write whole collections
//!   through `CollectionStore`.
//! - Cascade person/item deletes into every session.
//!
//! # Invariants
//! - Mutations are rejected until `load()` has completed.
//! - In-memory state changes only after the write-through succeeded, so a
//!   storage failure leaves memory equal to the last persisted state.
//! - Names are trimmed and must not be blank.
//! - A committed session holds at least one record.

use crate::model::attendance::{AttendanceGrid, AttendanceSession};
use crate::model::entity::{Item, NamedEntity, Person};
use crate::model::validation::{normalize_name, ValidationError};
use crate::repo::collections::{CollectionStore, StoredCollection};
use crate::repo::kv_store::{KvStore, StorageError};
use crate::service::history;
use crate::service::statistics::{self, AttendanceOverview, ItemStatistic};
use chrono::{NaiveDate, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a domain store operation.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    Storage(StorageError),
    /// Operation invoked before the initial `load()` completed.
    NotLoaded,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotLoaded => write!(f, "attendance data is not loaded yet"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotLoaded => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Hydration lifecycle of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Repository object owning the attendance collections.
pub struct AttendanceStore<S: KvStore> {
    collections: CollectionStore<S>,
    people: Vec<Person>,
    items: Vec<Item>,
    sessions: Vec<AttendanceSession>,
    state: LoadState,
}

impl<S: KvStore> AttendanceStore<S> {
    /// Creates an unloaded store persisting through `kv`.
    pub fn new(kv: S) -> Self {
        Self {
            collections: CollectionStore::new(kv),
            people: Vec::new(),
            items: Vec::new(),
            sessions: Vec::new(),
            state: LoadState::Unloaded,
        }
    }

    /// Seeds empty collections and reads all three into memory.
    ///
    /// Meant for application startup. On failure the store returns to
    /// `LoadState::Unloaded` and keeps its previous contents.
    pub fn load(&mut self) -> StoreResult<()> {
        self.hydrate_with(true)
    }

    /// Reads all three collections into memory without seeding.
    ///
    /// Collections emptied by deletes stay empty. Failure handling matches
    /// [`AttendanceStore::load`].
    pub fn reload(&mut self) -> StoreResult<()> {
        self.hydrate_with(false)
    }

    fn hydrate_with(&mut self, seed: bool) -> StoreResult<()> {
        self.state = LoadState::Loading;
        match self.hydrate(seed) {
            Ok(()) => {
                self.state = LoadState::Loaded;
                info!(
                    "event=store_load module=store status=ok seeded={} people={} items={} sessions={}",
                    seed,
                    self.people.len(),
                    self.items.len(),
                    self.sessions.len()
                );
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Unloaded;
                error!("event=store_load module=store status=error error={err}");
                Err(err)
            }
        }
    }

    fn hydrate(&mut self, seed: bool) -> StoreResult<()> {
        if seed {
            self.collections.seed_if_empty()?;
        }
        let people = self.collections.load::<Person>()?;
        let items = self.collections.load::<Item>()?;
        let sessions = self.collections.load::<AttendanceSession>()?;

        self.people = people;
        self.items = items;
        self.sessions = sessions;
        Ok(())
    }

    /// People in insertion order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Saved sessions in insertion order.
    pub fn sessions(&self) -> &[AttendanceSession] {
        &self.sessions
    }

    /// Current hydration state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether the store has finished loading.
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Whether the store is currently loading.
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Adds a person named `name` (trimmed) and returns it.
    pub fn add_person(&mut self, name: &str) -> StoreResult<Person> {
        self.ensure_loaded()?;
        add_entity(&self.collections, &mut self.people, name)
    }

    /// Renames a person. Returns `false` when no person has `id`.
    pub fn update_person(&mut self, id: &str, name: &str) -> StoreResult<bool> {
        self.ensure_loaded()?;
        update_entity(&self.collections, &mut self.people, id, name)
    }

    /// Deletes a person and every record referencing them.
    ///
    /// Returns `false` when no person had `id`; sessions are still rewritten.
    pub fn delete_person(&mut self, id: &str) -> StoreResult<bool> {
        self.ensure_loaded()?;
        let removed = delete_entity(&self.collections, &mut self.people, id)?;
        let scrubbed = self.scrub_sessions(|session| session.remove_person(id))?;
        info!(
            "event=person_delete module=store status=ok id={} removed={} records_removed={}",
            id, removed, scrubbed
        );
        Ok(removed)
    }

    /// Adds an item named `name` (trimmed) and returns it.
    pub fn add_item(&mut self, name: &str) -> StoreResult<Item> {
        self.ensure_loaded()?;
        add_entity(&self.collections, &mut self.items, name)
    }

    /// Renames an item. Returns `false` when no item has `id`.
    pub fn update_item(&mut self, id: &str, name: &str) -> StoreResult<bool> {
        self.ensure_loaded()?;
        update_entity(&self.collections, &mut self.items, id, name)
    }

    /// Deletes an item and every record referencing it.
    pub fn delete_item(&mut self, id: &str) -> StoreResult<bool> {
        self.ensure_loaded()?;
        let removed = delete_entity(&self.collections, &mut self.items, id)?;
        let scrubbed = self.scrub_sessions(|session| session.remove_item(id))?;
        info!(
            "event=item_delete module=store status=ok id={} removed={} records_removed={}",
            id, removed, scrubbed
        );
        Ok(removed)
    }

    /// Commits every selected grid cell as one new session dated now.
    ///
    /// # Errors
    /// - `ValidationError::EmptySelection` when no cell is selected.
    pub fn save_attendance(&mut self, grid: &AttendanceGrid) -> StoreResult<AttendanceSession> {
        self.ensure_loaded()?;
        if grid.selected_count() == 0 {
            return Err(ValidationError::EmptySelection.into());
        }

        let session = AttendanceSession::from_grid(grid, Utc::now());
        let mut next = self.sessions.clone();
        next.push(session.clone());
        commit(&self.collections, &mut self.sessions, next)?;

        info!(
            "event=attendance_save module=store status=ok session_id={} records={} sessions={}",
            session.id,
            session.records.len(),
            self.sessions.len()
        );
        Ok(session)
    }

    /// Per-item attendance counts, most attended first.
    pub fn item_statistics(&self) -> Vec<ItemStatistic> {
        statistics::item_statistics(&self.people, &self.items, &self.sessions)
    }

    /// Aggregate figures for the analytics view.
    pub fn overview(&self) -> AttendanceOverview {
        statistics::overview(&self.people, &self.items, &self.sessions)
    }

    /// Sessions newest first, optionally limited to one UTC calendar date.
    pub fn sessions_newest_first(&self, on_date: Option<NaiveDate>) -> Vec<&AttendanceSession> {
        history::sessions_newest_first(&self.sessions, on_date)
    }

    /// Distinct UTC calendar dates that have sessions, newest first.
    pub fn session_dates(&self) -> Vec<NaiveDate> {
        history::session_dates(&self.sessions)
    }

    pub fn person_name(&self, id: &str) -> &str {
        history::person_name(&self.people, id)
    }

    pub fn item_name(&self, id: &str) -> &str {
        history::item_name(&self.items, id)
    }

    fn ensure_loaded(&self) -> StoreResult<()> {
        if self.state == LoadState::Loaded {
            Ok(())
        } else {
            Err(StoreError::NotLoaded)
        }
    }

    fn scrub_sessions(
        &mut self,
        scrub: impl Fn(&mut AttendanceSession) -> usize,
    ) -> StoreResult<usize> {
        let mut next = self.sessions.clone();
        let removed: usize = next.iter_mut().map(scrub).sum();
        commit(&self.collections, &mut self.sessions, next)?;
        Ok(removed)
    }
}

fn add_entity<S, T>(
    collections: &CollectionStore<S>,
    entities: &mut Vec<T>,
    name: &str,
) -> StoreResult<T>
where
    S: KvStore,
    T: NamedEntity + StoredCollection,
{
    let name = normalize_name(name)?;
    let entity = T::create(name);
    let mut next = entities.clone();
    next.push(entity.clone());
    commit(collections, entities, next)?;

    info!(
        "event={}_add module=store status=ok id={} count={}",
        T::LABEL,
        entity.id(),
        entities.len()
    );
    Ok(entity)
}

fn update_entity<S, T>(
    collections: &CollectionStore<S>,
    entities: &mut Vec<T>,
    id: &str,
    name: &str,
) -> StoreResult<bool>
where
    S: KvStore,
    T: NamedEntity + StoredCollection,
{
    let name = normalize_name(name)?;
    let mut next = entities.clone();
    let found = match next.iter_mut().find(|entity| entity.id() == id) {
        Some(entity) => {
            entity.rename(name);
            true
        }
        None => false,
    };
    commit(collections, entities, next)?;

    info!(
        "event={}_update module=store status=ok id={} found={}",
        T::LABEL,
        id,
        found
    );
    Ok(found)
}

fn delete_entity<S, T>(
    collections: &CollectionStore<S>,
    entities: &mut Vec<T>,
    id: &str,
) -> StoreResult<bool>
where
    S: KvStore,
    T: NamedEntity + StoredCollection,
{
    let next = entities
        .iter()
        .filter(|entity| entity.id() != id)
        .cloned()
        .collect::<Vec<_>>();
    let removed = next.len() != entities.len();
    commit(collections, entities, next)?;
    Ok(removed)
}

fn commit<S: KvStore, T: StoredCollection>(
    collections: &CollectionStore<S>,
    current: &mut Vec<T>,
    next: Vec<T>,
) -> StoreResult<()> {
    collections.save(&next)?;
    *current = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{AttendanceStore, LoadState, StoreError};
    use crate::model::attendance::AttendanceGrid;
    use crate::model::validation::ValidationError;
    use crate::repo::kv_store::MemoryKvStore;

    #[test]
    fn new_store_starts_unloaded_and_rejects_mutations() {
        let kv = MemoryKvStore::new();
        let mut store = AttendanceStore::new(&kv);
        assert_eq!(store.state(), LoadState::Unloaded);

        let err = store.add_person("Ada").unwrap_err();
        assert!(matches!(err, StoreError::NotLoaded));
        assert!(kv.is_empty());
    }

    #[test]
    fn load_seeds_samples_and_marks_loaded() {
        let kv = MemoryKvStore::new();
        let mut store = AttendanceStore::new(&kv);
        store.load().unwrap();

        assert!(store.is_loaded());
        assert!(!store.is_loading());
        assert_eq!(store.people().len(), 4);
        assert_eq!(store.items().len(), 4);
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn blank_names_are_rejected_before_any_write() {
        let kv = MemoryKvStore::new();
        let mut store = AttendanceStore::new(&kv);
        store.load().unwrap();

        let err = store.add_item("   ").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::BlankName)
        ));
        assert_eq!(store.items().len(), 4);

        let err = store.update_person("1", "").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::BlankName)
        ));
        assert_eq!(store.people()[0].name, "John Smith");
    }

    #[test]
    fn empty_selection_is_rejected() {
        let kv = MemoryKvStore::new();
        let mut store = AttendanceStore::new(&kv);
        store.load().unwrap();

        let grid = AttendanceGrid::blank(store.people(), store.items());
        let err = store.save_attendance(&grid).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptySelection)
        ));
        assert!(store.sessions().is_empty());
    }
}
