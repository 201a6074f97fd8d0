//! Persistence layer: key-value port and the collection adapter on top.
//!
//! # Responsibility
//! - Define the key-value contract the rest of core persists through.
//! - Serialize whole collections to text and revive them on read.
//!
//! # Invariants
//! - Every write replaces the whole stored value for one key.
//! - A missing key reads as an empty collection; unparsable text is an error.

pub mod collections;
pub mod kv_store;
