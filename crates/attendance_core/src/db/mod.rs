//! SQLite home of the `kv_entries` table.
//!
//! Every collection lives as one JSON string row in `kv_entries`, keyed by
//! its storage key. This module opens the database file, migrates it, and
//! gates key-value access on the schema being exactly the one this binary
//! writes.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the latest migration after a successful open.
//! - `SqliteKvStore` is only built over a connection that passes
//!   [`ensure_kv_schema`]; failures surface as `StorageError::Db`.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening, migrating or checking the attendance database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer binary; refusing to downgrade it.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection has not been migrated to the `kv_entries` schema yet.
    SchemaNotReady { db_version: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "attendance database is at schema {db_version}, newer than supported {latest_supported}"
            ),
            Self::SchemaNotReady {
                db_version,
                expected,
            } => write!(
                f,
                "kv_entries schema not ready: found version {db_version}, expected {expected}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::SchemaNotReady { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `conn` carries the `kv_entries` schema of this binary.
///
/// # Errors
/// - `DbError::SchemaNotReady` when the version differs from the latest migration.
pub fn ensure_kv_schema(conn: &Connection) -> DbResult<()> {
    let db_version = migrations::current_user_version(conn)?;
    let expected = migrations::latest_version();
    if db_version != expected {
        return Err(DbError::SchemaNotReady {
            db_version,
            expected,
        });
    }
    Ok(())
}
