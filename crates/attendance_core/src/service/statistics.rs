//! Attendance statistics derived from the in-memory collections.
//!
//! # Invariants
//! - Percentages use "every person selected this item in every session" as
//!   the denominator and are 0 when there are no people or no sessions.
//! - Rounding is half-up, computed in integers.
//! - Statistics are ordered by count descending; ties keep item order.

use crate::model::attendance::AttendanceSession;
use crate::model::entity::{Item, Person};
use std::collections::HashMap;

/// Attendance figures for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStatistic {
    pub item: Item,
    /// Records referencing the item across all sessions.
    pub count: usize,
    /// `round(count / (people * sessions) * 100)`.
    pub percentage: u32,
}

/// Aggregate figures shown on the analytics view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceOverview {
    pub total_people: usize,
    pub total_items: usize,
    pub total_sessions: usize,
    pub total_records: usize,
    /// `round(total_records / total_sessions)`, 0 without sessions.
    pub average_records_per_session: usize,
    /// Items attended at least once.
    pub active_items: usize,
    /// Rounded mean of the item percentages, 0 without items.
    pub average_percentage: u32,
    pub top_item: Option<ItemStatistic>,
    pub least_item: Option<ItemStatistic>,
}

/// Counts records per item and sorts items by that count, highest first.
pub fn item_statistics(
    people: &[Person],
    items: &[Item],
    sessions: &[AttendanceSession],
) -> Vec<ItemStatistic> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in sessions.iter().flat_map(|session| &session.records) {
        *counts.entry(record.item_id.as_str()).or_insert(0) += 1;
    }

    let max_selections = people.len().saturating_mul(sessions.len());
    let mut stats = items
        .iter()
        .map(|item| {
            let count = counts.get(item.id.as_str()).copied().unwrap_or(0);
            ItemStatistic {
                item: item.clone(),
                count,
                percentage: rounded_percentage(count, max_selections),
            }
        })
        .collect::<Vec<_>>();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Builds the analytics overview.
pub fn overview(
    people: &[Person],
    items: &[Item],
    sessions: &[AttendanceSession],
) -> AttendanceOverview {
    let stats = item_statistics(people, items, sessions);
    let total_records = sessions
        .iter()
        .map(|session| session.records.len())
        .sum::<usize>();
    let percentage_sum = stats
        .iter()
        .map(|stat| stat.percentage as usize)
        .sum::<usize>();

    AttendanceOverview {
        total_people: people.len(),
        total_items: items.len(),
        total_sessions: sessions.len(),
        total_records,
        average_records_per_session: rounded_ratio(total_records, sessions.len()),
        active_items: stats.iter().filter(|stat| stat.count > 0).count(),
        average_percentage: rounded_ratio(percentage_sum, stats.len()) as u32,
        top_item: stats.first().cloned(),
        least_item: stats.last().cloned(),
    }
}

fn rounded_percentage(count: usize, denominator: usize) -> u32 {
    let scaled = rounded_ratio(count.saturating_mul(100), denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

// round(numerator / denominator), half-up; 0 for a zero denominator.
fn rounded_ratio(numerator: usize, denominator: usize) -> usize {
    if denominator == 0 {
        return 0;
    }
    numerator
        .saturating_mul(2)
        .saturating_add(denominator)
        / denominator.saturating_mul(2)
}

#[cfg(test)]
mod tests {
    use super::{rounded_percentage, rounded_ratio};

    #[test]
    fn rounded_ratio_rounds_half_up() {
        assert_eq!(rounded_ratio(1, 2), 1);
        assert_eq!(rounded_ratio(5, 2), 3);
        assert_eq!(rounded_ratio(4, 3), 1);
        assert_eq!(rounded_ratio(5, 3), 2);
    }

    #[test]
    fn zero_denominator_yields_zero() {
        assert_eq!(rounded_ratio(7, 0), 0);
        assert_eq!(rounded_percentage(3, 0), 0);
    }

    #[test]
    fn huge_operands_saturate_instead_of_overflowing() {
        assert_eq!(rounded_ratio(usize::MAX, 1), usize::MAX / 2);
        assert_eq!(rounded_ratio(usize::MAX, usize::MAX), 1);
        assert!(rounded_percentage(usize::MAX, 1) > 0);
    }

    #[test]
    fn percentage_matches_rounded_share() {
        assert_eq!(rounded_percentage(2, 2), 100);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
    }
}
