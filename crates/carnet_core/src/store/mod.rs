//! Trip store: canonical aggregate ownership and mutation rules.

pub mod trip_store;
