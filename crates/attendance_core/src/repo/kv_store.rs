//! Key-value port and its SQLite / in-memory implementations.
//!
//! # Responsibility
//! - Provide `get`/`set` of opaque string values by key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set` overwrites any previous value for the key.
//! - `get` returns `Ok(None)` for a key that was never written.

use crate::db::{ensure_kv_schema, DbError};
use crate::repo::collections::CollectionKind;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reading or writing persisted collections.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite backend failure.
    Db(DbError),
    /// Backing store cannot serve the request.
    Unavailable(String),
    /// Stored text for a collection is not valid for its schema.
    Malformed {
        kind: CollectionKind,
        source: serde_json::Error,
    },
    /// Collection could not be encoded for storage.
    Encode {
        kind: CollectionKind,
        source: serde_json::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Malformed { kind, source } => {
                write!(f, "malformed stored data for `{}`: {source}", kind.key())
            }
            Self::Encode { kind, source } => {
                write!(f, "failed to encode `{}`: {source}", kind.key())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
            Self::Malformed { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value store used as the persistence port.
pub trait KvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - Returns `StorageError::Db(DbError::SchemaNotReady)` when the
    ///   connection schema is not at the version this binary expects.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_kv_schema(conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local key-value store. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvStore, MemoryKvStore, SqliteKvStore, StorageError};
    use crate::db::{open_db_in_memory, DbError};
    use rusqlite::Connection;

    #[test]
    fn sqlite_store_reads_missing_key_as_none_and_overwrites() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_store_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(&conn).err().unwrap();
        assert!(matches!(
            err,
            StorageError::Db(DbError::SchemaNotReady { .. })
        ));
    }

    #[test]
    fn memory_store_works_through_a_reference() {
        let store = MemoryKvStore::new();
        let by_ref = &store;
        by_ref.set("a", "1").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
