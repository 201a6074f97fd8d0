use attendance_core::db::migrations::latest_version;
use attendance_core::db::{open_db, open_db_in_memory, DbError};
use attendance_core::{AttendanceStore, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.sqlite3");

    let added_id = {
        let conn = open_db(&path).unwrap();
        let mut store = AttendanceStore::new(SqliteKvStore::try_new(&conn).unwrap());
        store.load().unwrap();
        store.add_person("Grace Hopper").unwrap().id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let mut store = AttendanceStore::new(SqliteKvStore::try_new(&conn).unwrap());
    store.load().unwrap();

    assert_eq!(store.people().len(), 5);
    let added = store.people().last().unwrap();
    assert_eq!(added.id, added_id);
    assert_eq!(added.name, "Grace Hopper");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
