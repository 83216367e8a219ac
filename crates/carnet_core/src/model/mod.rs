//! Domain model for trip planning data.
//!
//! # Responsibility
//! - Define the canonical structures mutated by the store and read by the
//!   projector: items, sections, day plans, lists, the trip aggregate.
//! - Own the JSON wire shape shared by cache, snapshot, import and export.
//!
//! # Invariants
//! - Items live in exactly one container at a time; moves transfer, never
//!   copy.
//! - Only `YYYY-MM-DD` keys address day plans.

pub mod item;
pub mod trip;
