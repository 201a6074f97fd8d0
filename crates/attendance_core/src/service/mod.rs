//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory collections and write every mutation through the
//!   persistence adapter.
//! - Derive statistics and history projections for presentation callers.
//!
//! # See also
//! - `repo::collections` for the stored layout.

pub mod attendance_store;
pub mod history;
pub mod statistics;
