//! Collection persistence adapter over a key-value store.
//!
//! # Responsibility
//! - Map each persisted collection to its storage key.
//! - Encode whole collections as JSON arrays and decode them on read,
//!   reviving RFC 3339 timestamps.
//! - Seed sample people and items into empty collections.
//!
//! # Invariants
//! - Missing or blank stored values decode to an empty collection.
//! - Unparsable stored values surface as `StorageError::Malformed`.
//! - Seeding never touches sessions and never duplicates sample entries.

use crate::model::attendance::AttendanceSession;
use crate::model::entity::{Item, NamedEntity, Person};
use crate::repo::kv_store::{KvStore, StorageError, StorageResult};
use chrono::Utc;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

const SAMPLE_PEOPLE: &[(&str, &str)] = &[
    ("1", "John Smith"),
    ("2", "Sarah Johnson"),
    ("3", "Mike Davis"),
    ("4", "Emily Brown"),
];

const SAMPLE_ITEMS: &[(&str, &str)] = &[
    ("1", "Morning Meeting"),
    ("2", "Training Session"),
    ("3", "Team Lunch"),
    ("4", "Project Review"),
];

/// The three independently stored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    People,
    Items,
    Sessions,
}

impl CollectionKind {
    /// Storage key of the collection.
    pub fn key(self) -> &'static str {
        match self {
            Self::People => "attendance_people",
            Self::Items => "attendance_items",
            Self::Sessions => "attendance_sessions",
        }
    }
}

/// Entity type persisted as one whole collection under a fixed key.
pub trait StoredCollection: Serialize + DeserializeOwned {
    const KIND: CollectionKind;
}

impl StoredCollection for Person {
    const KIND: CollectionKind = CollectionKind::People;
}

impl StoredCollection for Item {
    const KIND: CollectionKind = CollectionKind::Items;
}

impl StoredCollection for AttendanceSession {
    const KIND: CollectionKind = CollectionKind::Sessions;
}

/// Which collections `seed_if_empty` populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub people_seeded: bool,
    pub items_seeded: bool,
}

/// Reads and writes whole collections through a key-value store.
pub struct CollectionStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> CollectionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Loads every stored entity of collection `T`, in stored order.
    ///
    /// # Errors
    /// - Propagates backend failures.
    /// - Returns `StorageError::Malformed` when the stored text does not decode.
    pub fn load<T: StoredCollection>(&self) -> StorageResult<Vec<T>> {
        let kind = T::KIND;
        let Some(raw) = self.kv.get(kind.key())? else {
            debug!("event=collection_load module=repo status=ok key={} count=0 stored=false", kind.key());
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(entries) => {
                debug!(
                    "event=collection_load module=repo status=ok key={} count={} bytes={}",
                    kind.key(),
                    entries.len(),
                    raw.len()
                );
                Ok(entries)
            }
            Err(source) => {
                error!(
                    "event=collection_load module=repo status=error key={} error_code=malformed error={}",
                    kind.key(),
                    source
                );
                Err(StorageError::Malformed { kind, source })
            }
        }
    }

    /// Replaces the stored collection `T` with `entries`.
    pub fn save<T: StoredCollection>(&self, entries: &[T]) -> StorageResult<()> {
        let kind = T::KIND;
        let encoded = serde_json::to_string(entries)
            .map_err(|source| StorageError::Encode { kind, source })?;
        self.kv.set(kind.key(), &encoded)?;
        debug!(
            "event=collection_save module=repo status=ok key={} count={} bytes={}",
            kind.key(),
            entries.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Stores sample people and items into whichever of the two is empty.
    pub fn seed_if_empty(&self) -> StorageResult<SeedOutcome> {
        let mut outcome = SeedOutcome::default();

        if self.load::<Person>()?.is_empty() {
            self.save(&sample_entities::<Person>(SAMPLE_PEOPLE))?;
            outcome.people_seeded = true;
        }
        if self.load::<Item>()?.is_empty() {
            self.save(&sample_entities::<Item>(SAMPLE_ITEMS))?;
            outcome.items_seeded = true;
        }

        if outcome.people_seeded || outcome.items_seeded {
            info!(
                "event=sample_seed module=repo status=ok people_seeded={} items_seeded={}",
                outcome.people_seeded, outcome.items_seeded
            );
        }
        Ok(outcome)
    }
}

fn sample_entities<T: NamedEntity>(samples: &[(&str, &str)]) -> Vec<T> {
    let now = Utc::now();
    samples
        .iter()
        .map(|(id, name)| T::with_id((*id).to_string(), (*name).to_string(), now))
        .collect()
}
