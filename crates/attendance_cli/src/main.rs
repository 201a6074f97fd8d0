//! CLI smoke and report entry point.
//!
//! # Responsibility
//! - Verify `attendance_core` linkage with a deterministic ping/version check.
//! - With a database path argument, print the analytics report for that store.

use attendance_core::db::open_db;
use attendance_core::{AttendanceStore, SqliteKvStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("attendance_core ping={}", attendance_core::ping());
    println!("attendance_core version={}", attendance_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_report(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(db_path: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| format!("failed to open `{db_path}`: {err}"))?;
    let kv = SqliteKvStore::try_new(&conn).map_err(|err| err.to_string())?;
    let mut store = AttendanceStore::new(kv);
    store.load().map_err(|err| err.to_string())?;

    let overview = store.overview();
    println!(
        "people={} items={} sessions={} records={} avg_per_session={} active_items={} avg_percentage={}%",
        overview.total_people,
        overview.total_items,
        overview.total_sessions,
        overview.total_records,
        overview.average_records_per_session,
        overview.active_items,
        overview.average_percentage
    );
    for stat in store.item_statistics() {
        println!(
            "item id={} count={} percentage={}% name={}",
            stat.item.id, stat.count, stat.percentage, stat.item.name
        );
    }
    Ok(())
}
