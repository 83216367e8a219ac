//! Persistence repositories for the local cache.

pub mod cache_repo;
