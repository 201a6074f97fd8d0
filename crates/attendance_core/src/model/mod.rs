//! Domain model for attendance tracking.
//!
//! # Responsibility
//! - Define the persisted entities (people, items, sessions, records).
//! - Define the transient selection grid used while taking attendance.
//!
//! # Invariants
//! - Entity ids are unique within their collection.
//! - Session records are fixed at creation; only cascade deletes filter them.
//! - The selection grid is never persisted directly.

pub mod attendance;
pub mod entity;
pub mod validation;
