//! History projections: date filtering, ordering and name resolution.

use crate::model::attendance::AttendanceSession;
use crate::model::entity::{Item, Person};
use chrono::NaiveDate;

/// Shown for records whose person no longer resolves.
pub const UNKNOWN_PERSON: &str = "Unknown Person";
/// Shown for records whose item no longer resolves.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Sessions sorted newest first, optionally keeping only one UTC date.
pub fn sessions_newest_first(
    sessions: &[AttendanceSession],
    on_date: Option<NaiveDate>,
) -> Vec<&AttendanceSession> {
    let mut selected = sessions
        .iter()
        .filter(|session| on_date.map_or(true, |date| session.date.date_naive() == date))
        .collect::<Vec<_>>();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}

/// Distinct UTC calendar dates with at least one session, newest first.
pub fn session_dates(sessions: &[AttendanceSession]) -> Vec<NaiveDate> {
    let mut dates = sessions
        .iter()
        .map(|session| session.date.date_naive())
        .collect::<Vec<_>>();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

pub fn person_name<'a>(people: &'a [Person], id: &str) -> &'a str {
    people
        .iter()
        .find(|person| person.id == id)
        .map_or(UNKNOWN_PERSON, |person| person.name.as_str())
}

pub fn item_name<'a>(items: &'a [Item], id: &str) -> &'a str {
    items
        .iter()
        .find(|item| item.id == id)
        .map_or(UNKNOWN_ITEM, |item| item.name.as_str())
}
