//! Core domain logic for the attendance tracker.
//! This crate is the single source of truth for attendance invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{AttendanceGrid, AttendanceRecord, AttendanceSession, SessionSummary};
pub use model::entity::{EntityId, Item, NamedEntity, Person};
pub use model::validation::ValidationError;
pub use repo::collections::{CollectionKind, CollectionStore, SeedOutcome, StoredCollection};
pub use repo::kv_store::{KvStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};
pub use service::attendance_store::{AttendanceStore, LoadState, StoreError, StoreResult};
pub use service::history::{UNKNOWN_ITEM, UNKNOWN_PERSON};
pub use service::statistics::{AttendanceOverview, ItemStatistic};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
