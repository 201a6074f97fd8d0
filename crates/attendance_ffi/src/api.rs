//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Open the store, hydrate it and run one operation per call.
//! - Seed sample data on the first open of a database in this process only.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call returns an envelope with `ok` and a human-readable `message`.
//! - Timestamps cross the boundary as epoch milliseconds.

use attendance_core::db::open_db;
use attendance_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AttendanceGrid, AttendanceSession, AttendanceStore, Item, ItemStatistic, Person,
    SqliteKvStore, StoreResult,
};
use chrono::NaiveDate;
use log::{error, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "attendance_store.sqlite3";
const DB_PATH_ENV: &str = "ATTENDANCE_DB_PATH";
const HISTORY_DATE_FORMAT: &str = "%Y-%m-%d";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SEEDED_PATHS: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Person or item row for management and entry views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityView {
    pub id: String,
    pub name: String,
    pub created_at_ms: i64,
}

/// List response envelope for people or items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityListResponse {
    pub ok: bool,
    pub entries: Vec<EntityView>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or targeted entity/session.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// One selected cell of the attendance grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionInput {
    pub person_id: String,
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecordView {
    pub person_id: String,
    pub item_id: String,
    pub person_name: String,
    pub item_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySessionView {
    pub session_id: String,
    pub date_ms: i64,
    pub total_records: u32,
    pub unique_people: u32,
    pub unique_items: u32,
    pub records: Vec<HistoryRecordView>,
}

/// History listing, newest session first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryResponse {
    pub ok: bool,
    pub sessions: Vec<HistorySessionView>,
    /// Dates (`YYYY-MM-DD`, UTC) that have sessions, for the date filter.
    pub dates: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStatisticView {
    pub item_id: String,
    pub item_name: String,
    pub count: u32,
    pub percentage: u32,
}

/// Analytics response: per-item figures plus overview counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsResponse {
    pub ok: bool,
    pub items: Vec<ItemStatisticView>,
    pub total_people: u32,
    pub total_sessions: u32,
    pub total_records: u32,
    pub average_records_per_session: u32,
    pub active_items: u32,
    pub average_percentage: u32,
    pub message: String,
}

impl StatisticsResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            total_people: 0,
            total_sessions: 0,
            total_records: 0,
            average_records_per_session: 0,
            active_items: 0,
            average_percentage: 0,
            message,
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn people_list() -> EntityListResponse {
    people_list_in(&resolve_db_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn items_list() -> EntityListResponse {
    items_list_in(&resolve_db_path())
}

/// Adds a person; blank names are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn person_add(name: String) -> ActionResponse {
    person_add_in(&resolve_db_path(), name)
}

#[flutter_rust_bridge::frb(sync)]
pub fn person_update(id: String, name: String) -> ActionResponse {
    person_update_in(&resolve_db_path(), id, name)
}

/// Deletes a person and their records from every session.
#[flutter_rust_bridge::frb(sync)]
pub fn person_delete(id: String) -> ActionResponse {
    person_delete_in(&resolve_db_path(), id)
}

/// Adds an item; blank names are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn item_add(name: String) -> ActionResponse {
    item_add_in(&resolve_db_path(), name)
}

#[flutter_rust_bridge::frb(sync)]
pub fn item_update(id: String, name: String) -> ActionResponse {
    item_update_in(&resolve_db_path(), id, name)
}

/// Deletes an item and its records from every session.
#[flutter_rust_bridge::frb(sync)]
pub fn item_delete(id: String) -> ActionResponse {
    item_delete_in(&resolve_db_path(), id)
}

/// Commits the selected cells as one session.
///
/// # FFI contract
/// - An empty selection fails without creating a session.
/// - Returns the new session id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_save(selections: Vec<SelectionInput>) -> ActionResponse {
    attendance_save_in(&resolve_db_path(), selections)
}

/// Lists sessions newest first, optionally for one `YYYY-MM-DD` UTC date.
#[flutter_rust_bridge::frb(sync)]
pub fn history_list(date: Option<String>) -> HistoryResponse {
    history_list_in(&resolve_db_path(), date)
}

/// Per-item statistics (most attended first) and overview counters.
#[flutter_rust_bridge::frb(sync)]
pub fn item_statistics() -> StatisticsResponse {
    item_statistics_in(&resolve_db_path())
}

fn people_list_in(db_path: &Path) -> EntityListResponse {
    entity_list(db_path, "people_list", |store| {
        store.people().iter().map(person_view).collect()
    })
}

fn items_list_in(db_path: &Path) -> EntityListResponse {
    entity_list(db_path, "items_list", |store| {
        store.items().iter().map(item_view).collect()
    })
}

fn person_add_in(db_path: &Path, name: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.add_person(&name)) {
        Ok(person) => ActionResponse::success("Person added.", person.id),
        Err(err) => ActionResponse::failure(format!("person_add failed: {err}")),
    }
}

fn person_update_in(db_path: &Path, id: String, name: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.update_person(&id, &name)) {
        Ok(true) => ActionResponse::success("Person updated.", id),
        Ok(false) => ActionResponse::failure(format!("person_update failed: person not found: {id}")),
        Err(err) => ActionResponse::failure(format!("person_update failed: {err}")),
    }
}

fn person_delete_in(db_path: &Path, id: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.delete_person(&id)) {
        Ok(true) => ActionResponse::success("Person deleted.", id),
        Ok(false) => ActionResponse::failure(format!("person_delete failed: person not found: {id}")),
        Err(err) => ActionResponse::failure(format!("person_delete failed: {err}")),
    }
}

fn item_add_in(db_path: &Path, name: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.add_item(&name)) {
        Ok(item) => ActionResponse::success("Item added.", item.id),
        Err(err) => ActionResponse::failure(format!("item_add failed: {err}")),
    }
}

fn item_update_in(db_path: &Path, id: String, name: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.update_item(&id, &name)) {
        Ok(true) => ActionResponse::success("Item updated.", id),
        Ok(false) => ActionResponse::failure(format!("item_update failed: item not found: {id}")),
        Err(err) => ActionResponse::failure(format!("item_update failed: {err}")),
    }
}

fn item_delete_in(db_path: &Path, id: String) -> ActionResponse {
    match with_store_at(db_path, |store| store.delete_item(&id)) {
        Ok(true) => ActionResponse::success("Item deleted.", id),
        Ok(false) => ActionResponse::failure(format!("item_delete failed: item not found: {id}")),
        Err(err) => ActionResponse::failure(format!("item_delete failed: {err}")),
    }
}

fn attendance_save_in(db_path: &Path, selections: Vec<SelectionInput>) -> ActionResponse {
    let mut grid = AttendanceGrid::new();
    for selection in &selections {
        grid.set(selection.person_id.trim(), selection.item_id.trim(), true);
    }

    match with_store_at(db_path, |store| store.save_attendance(&grid)) {
        Ok(session) => ActionResponse::success(
            format!("Attendance saved ({} record(s)).", session.records.len()),
            session.id,
        ),
        Err(err) => ActionResponse::failure(format!("attendance_save failed: {err}")),
    }
}

fn history_list_in(db_path: &Path, date: Option<String>) -> HistoryResponse {
    let failure = |message: String| HistoryResponse {
        ok: false,
        sessions: Vec::new(),
        dates: Vec::new(),
        message,
    };

    let on_date = match date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match NaiveDate::parse_from_str(raw, HISTORY_DATE_FORMAT) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                return failure(format!(
                    "history_list failed: invalid date `{raw}`; expected YYYY-MM-DD"
                ))
            }
        },
        None => None,
    };

    let listed = with_store_at(db_path, |store| {
        let store = &*store;
        let sessions = store
            .sessions_newest_first(on_date)
            .into_iter()
            .map(|session| history_session_view(store, session))
            .collect::<Vec<_>>();
        let dates = store
            .session_dates()
            .iter()
            .map(|day| day.format(HISTORY_DATE_FORMAT).to_string())
            .collect::<Vec<_>>();
        Ok((sessions, dates))
    });

    match listed {
        Ok((sessions, dates)) => {
            let message = if sessions.is_empty() {
                "No sessions found.".to_string()
            } else {
                format!("Found {} session(s).", sessions.len())
            };
            HistoryResponse {
                ok: true,
                sessions,
                dates,
                message,
            }
        }
        Err(err) => failure(format!("history_list failed: {err}")),
    }
}

fn item_statistics_in(db_path: &Path) -> StatisticsResponse {
    let computed = with_store_at(db_path, |store| Ok((store.item_statistics(), store.overview())));

    match computed {
        Ok((stats, overview)) => StatisticsResponse {
            ok: true,
            items: stats.into_iter().map(statistic_view).collect(),
            total_people: to_u32(overview.total_people),
            total_sessions: to_u32(overview.total_sessions),
            total_records: to_u32(overview.total_records),
            average_records_per_session: to_u32(overview.average_records_per_session),
            active_items: to_u32(overview.active_items),
            average_percentage: overview.average_percentage,
            message: if overview.total_sessions == 0 {
                "No sessions recorded yet.".to_string()
            } else {
                format!("Statistics over {} session(s).", overview.total_sessions)
            },
        },
        Err(err) => StatisticsResponse::failure(format!("item_statistics failed: {err}")),
    }
}

fn entity_list(
    db_path: &Path,
    operation: &str,
    project: impl FnOnce(&AttendanceStore<SqliteKvStore<'_>>) -> Vec<EntityView>,
) -> EntityListResponse {
    match with_store_at(db_path, |store| Ok(project(store))) {
        Ok(entries) => EntityListResponse {
            ok: true,
            message: format!("Found {} entr(ies).", entries.len()),
            entries,
        },
        Err(err) => EntityListResponse {
            ok: false,
            entries: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store_at<T>(
    db_path: &Path,
    f: impl FnOnce(&mut AttendanceStore<SqliteKvStore<'_>>) -> StoreResult<T>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error stage=open error={err}");
        format!("attendance DB open failed: {err}")
    })?;
    let kv = SqliteKvStore::try_new(&conn).map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error stage=init error={err}");
        format!("attendance store init failed: {err}")
    })?;
    let mut store = AttendanceStore::new(kv);

    // Sample data is seeded on the first open of a path in this process only.
    let seed = !is_seeded(db_path);
    let loaded = if seed { store.load() } else { store.reload() };
    loaded.map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error stage=load error={err}");
        format!("attendance load failed: {err}")
    })?;
    if seed {
        mark_seeded(db_path);
    }

    f(&mut store).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.to_string()
    })
}

fn seeded_paths() -> &'static Mutex<HashSet<PathBuf>> {
    SEEDED_PATHS.get_or_init(|| Mutex::new(HashSet::new()))
}

fn is_seeded(db_path: &Path) -> bool {
    match seeded_paths().lock() {
        Ok(paths) => paths.contains(db_path),
        Err(poisoned) => poisoned.into_inner().contains(db_path),
    }
}

fn mark_seeded(db_path: &Path) {
    let mut paths = match seeded_paths().lock() {
        Ok(paths) => paths,
        Err(poisoned) => poisoned.into_inner(),
    };
    paths.insert(db_path.to_path_buf());
}

fn person_view(person: &Person) -> EntityView {
    EntityView {
        id: person.id.clone(),
        name: person.name.clone(),
        created_at_ms: person.created_at.timestamp_millis(),
    }
}

fn item_view(item: &Item) -> EntityView {
    EntityView {
        id: item.id.clone(),
        name: item.name.clone(),
        created_at_ms: item.created_at.timestamp_millis(),
    }
}

fn history_session_view(
    store: &AttendanceStore<SqliteKvStore<'_>>,
    session: &AttendanceSession,
) -> HistorySessionView {
    let summary = session.summary();
    HistorySessionView {
        session_id: session.id.clone(),
        date_ms: session.date.timestamp_millis(),
        total_records: to_u32(summary.total_records),
        unique_people: to_u32(summary.unique_people),
        unique_items: to_u32(summary.unique_items),
        records: session
            .records
            .iter()
            .map(|record| HistoryRecordView {
                person_id: record.person_id.clone(),
                item_id: record.item_id.clone(),
                person_name: store.person_name(&record.person_id).to_string(),
                item_name: store.item_name(&record.item_id).to_string(),
            })
            .collect(),
    }
}

fn statistic_view(stat: ItemStatistic) -> ItemStatisticView {
    ItemStatisticView {
        count: to_u32(stat.count),
        percentage: stat.percentage,
        item_id: stat.item.id,
        item_name: stat.item.name,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
