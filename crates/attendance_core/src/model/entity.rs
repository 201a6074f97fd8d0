//! People and items: the two named entity collections.
//!
//! # Responsibility
//! - Define `Person` and `Item` with their persisted wire shape.
//! - Provide a shared `NamedEntity` contract so the store can run one CRUD
//!   path for both collections.
//!
//! # Invariants
//! - `id` is stable for the entity lifetime and never reused.
//! - `created_at` is set once on creation and never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier shared by every persisted entity.
///
/// Stored as a plain string so ids written by earlier data (`"1"`, `"2"`, ...)
/// stay valid next to generated ones.
pub type EntityId = String;

/// Generates a new time-ordered unique id.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7().to_string()
}

/// Someone whose attendance is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A trackable activity or category (meeting, training, lunch, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Common shape of people and items.
pub trait NamedEntity: Clone {
    /// Short label used in log events (`person`, `item`).
    const LABEL: &'static str;

    fn with_id(id: EntityId, name: String, created_at: DateTime<Utc>) -> Self;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn rename(&mut self, name: String);

    /// Creates an entity with a generated id, stamped with the current time.
    ///
    /// Does not validate `name`; callers normalize it first.
    fn create(name: String) -> Self {
        Self::with_id(new_entity_id(), name, Utc::now())
    }
}

impl NamedEntity for Person {
    const LABEL: &'static str = "person";

    fn with_id(id: EntityId, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl NamedEntity for Item {
    const LABEL: &'static str = "item";

    fn with_id(id: EntityId, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.name = name;
    }
}
