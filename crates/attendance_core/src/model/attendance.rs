//! Attendance sessions, records and the in-progress selection grid.
//!
//! # Responsibility
//! - Define the committed history shape (`AttendanceSession` holding
//!   `AttendanceRecord`s).
//! - Define `AttendanceGrid`, the unsaved person x item selection.
//!
//! # Invariants
//! - Every record of a session carries the session's capture instant.
//! - A session holds at most one record per (person, item) pair.
//! - Grid iteration order is deterministic: person id, then item id.

use crate::model::entity::{new_entity_id, EntityId, Item, Person};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One presence fact: `person_id` attended `item_id` at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: EntityId,
    pub person_id: EntityId,
    pub item_id: EntityId,
    pub timestamp: DateTime<Utc>,
}

/// One committed attendance-taking event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSession {
    pub id: EntityId,
    pub date: DateTime<Utc>,
    pub records: Vec<AttendanceRecord>,
}

/// Per-session counters shown in history listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_records: usize,
    pub unique_people: usize,
    pub unique_items: usize,
}

impl AttendanceSession {
    /// Builds a session from every selected grid cell, stamped with `taken_at`.
    ///
    /// Does not reject an empty selection; the store enforces that.
    pub fn from_grid(grid: &AttendanceGrid, taken_at: DateTime<Utc>) -> Self {
        let records = grid
            .selected_pairs()
            .map(|(person_id, item_id)| AttendanceRecord {
                id: new_entity_id(),
                person_id: person_id.to_string(),
                item_id: item_id.to_string(),
                timestamp: taken_at,
            })
            .collect();

        Self {
            id: new_entity_id(),
            date: taken_at,
            records,
        }
    }

    /// Drops every record of `person_id`. Returns how many were removed.
    pub fn remove_person(&mut self, person_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.person_id != person_id);
        before - self.records.len()
    }

    /// Drops every record of `item_id`. Returns how many were removed.
    pub fn remove_item(&mut self, item_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.item_id != item_id);
        before - self.records.len()
    }

    pub fn summary(&self) -> SessionSummary {
        let unique_people = self
            .records
            .iter()
            .map(|record| record.person_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_items = self
            .records
            .iter()
            .map(|record| record.item_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        SessionSummary {
            total_records: self.records.len(),
            unique_people,
            unique_items,
        }
    }
}

/// Unsaved selection: person id -> item id -> present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceGrid {
    cells: BTreeMap<EntityId, BTreeMap<EntityId, bool>>,
}

impl AttendanceGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an all-unselected grid covering every person x item cell.
    pub fn blank(people: &[Person], items: &[Item]) -> Self {
        let cells = people
            .iter()
            .map(|person| {
                let row = items
                    .iter()
                    .map(|item| (item.id.clone(), false))
                    .collect::<BTreeMap<_, _>>();
                (person.id.clone(), row)
            })
            .collect();
        Self { cells }
    }

    pub fn set(&mut self, person_id: &str, item_id: &str, present: bool) {
        self.cells
            .entry(person_id.to_string())
            .or_default()
            .insert(item_id.to_string(), present);
    }

    /// Flips one cell and returns its new value. Missing cells start unselected.
    pub fn toggle(&mut self, person_id: &str, item_id: &str) -> bool {
        let cell = self
            .cells
            .entry(person_id.to_string())
            .or_default()
            .entry(item_id.to_string())
            .or_insert(false);
        *cell = !*cell;
        *cell
    }

    pub fn is_selected(&self, person_id: &str, item_id: &str) -> bool {
        self.cells
            .get(person_id)
            .and_then(|row| row.get(item_id))
            .copied()
            .unwrap_or(false)
    }

    /// Number of selected cells.
    pub fn selected_count(&self) -> usize {
        self.cells
            .values()
            .flat_map(|row| row.values())
            .filter(|present| **present)
            .count()
    }

    /// Number of cells tracked by the grid, selected or not.
    pub fn total_possible(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Unselects every cell while keeping the grid shape.
    pub fn clear(&mut self) {
        for present in self.cells.values_mut().flat_map(|row| row.values_mut()) {
            *present = false;
        }
    }

    /// Selected `(person_id, item_id)` pairs in person, then item, order.
    pub fn selected_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.cells.iter().flat_map(|(person_id, row)| {
            row.iter()
                .filter(|(_, present)| **present)
                .map(move |(item_id, _)| (person_id.as_str(), item_id.as_str()))
        })
    }
}
