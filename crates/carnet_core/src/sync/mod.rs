//! Multi-source persistence reconciliation.
//!
//! # Responsibility
//! - Reconcile local cache, remote snapshot and manual import into one
//!   authoritative aggregate.
//! - Serialize the aggregate back to the cache and to export files.

pub mod gateway;
pub mod snapshot;
