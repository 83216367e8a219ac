//! Persistence gateway: startup reconciliation, save, import, export.
//!
//! # Responsibility
//! - Produce the single authoritative trip aggregate at startup from the
//!   local cache and the optional remote snapshot.
//! - Keep the cache slot synchronized after every mutation.
//! - Handle wholesale import and verbatim export.
//!
//! # Invariants
//! - The remote snapshot, when fetched successfully, overwrites local data
//!   unconditionally; no field-level merge, no conflict detection.
//! - Empty days are pruned before every cache write.
//! - A rejected import leaves the store untouched.

use crate::model::trip::{NamedList, TripData, TripDecodeError};
use crate::repo::cache_repo::{CacheError, CacheRepository, PLANNING_SLOT_KEY};
use crate::store::trip_store::TripStore;
use crate::sync::snapshot::{SnapshotFetcher, SNAPSHOT_FILE_NAME};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// List created when a fresh or unreadable cache leaves no lists at all.
pub const DEFAULT_LIST_NAME: &str = "À faire";

pub type SyncResult<T> = Result<T, SyncError>;

/// Gateway error taxonomy.
///
/// Remote fetch failures never appear here: startup recovers from them
/// silently by keeping the cached data.
#[derive(Debug)]
pub enum SyncError {
    Cache(CacheError),
    Parse(TripDecodeError),
    /// Import payload carries none of the recognized top-level keys.
    Validation(&'static str),
    /// Export file could not be written.
    Io(std::io::Error),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(message) => write!(f, "import rejected: {message}"),
            Self::Io(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cache(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Validation(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<CacheError> for SyncError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<TripDecodeError> for SyncError {
    fn from(value: TripDecodeError) -> Self {
        Self::Parse(value)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Reconciles cache, remote snapshot and manual import/export around one
/// trip store.
pub struct PersistenceGateway<C: CacheRepository, F: SnapshotFetcher> {
    cache: C,
    fetcher: F,
}

impl<C: CacheRepository, F: SnapshotFetcher> PersistenceGateway<C, F> {
    pub fn new(cache: C, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    /// Builds the session store: cache, then remote overwrite, then
    /// write-back.
    ///
    /// Steps run sequentially. An absent or unparseable cache falls back to
    /// an empty aggregate; a fresh aggregate (or one without lists) gets the
    /// default list. A fetched snapshot replaces everything as-is; a fetch
    /// failure keeps step-1 data with only a warning.
    pub fn startup(&self) -> SyncResult<TripStore> {
        let mut data = match self.cache.read_slot(PLANNING_SLOT_KEY)? {
            Some(raw) => match TripData::from_json_str(&raw) {
                Ok(data) => data,
                Err(err) => {
                    warn!("event=cache_load module=sync status=error error={err}");
                    TripData::default()
                }
            },
            None => TripData::default(),
        };
        if data.lists.is_empty() {
            data.lists.push(NamedList::new(DEFAULT_LIST_NAME));
        }

        match self.fetcher.fetch() {
            Ok(Some(remote)) => {
                info!(
                    "event=snapshot_fetch module=sync status=ok days={} lists={}",
                    remote.days().len(),
                    remote.lists().len()
                );
                data = remote;
            }
            Ok(None) => {}
            Err(err) => {
                warn!("event=snapshot_fetch module=sync status=error error={err}");
            }
        }

        let mut store = TripStore::new(data);
        self.save(&mut store)?;
        Ok(store)
    }

    /// Prunes empty days and writes the aggregate to the cache slot.
    ///
    /// Callers run this after every mutation, before the next projection.
    pub fn save(&self, store: &mut TripStore) -> SyncResult<()> {
        store.prune_empty_days();
        self.cache
            .write_slot(PLANNING_SLOT_KEY, &store.data().to_json_string())?;
        Ok(())
    }

    /// Replaces the aggregate wholesale from a user-provided payload.
    ///
    /// The destructive-action confirmation happens in the rendering surface
    /// before this is called. Minimal validity: the payload must be a JSON
    /// object carrying at least one key (`lists`, `staging`, or any day);
    /// anything else is rejected without mutating the store.
    pub fn import(&self, store: &mut TripStore, payload: &str) -> SyncResult<()> {
        let value: Value =
            serde_json::from_str(payload).map_err(|err| SyncError::Parse(err.into()))?;
        let Some(root) = value.as_object() else {
            return Err(SyncError::Validation(
                "payload root is not a JSON object",
            ));
        };
        if root.is_empty() {
            return Err(SyncError::Validation(
                "payload carries no lists, staging, or day entries",
            ));
        }

        let data = TripData::from_value(&value)?;
        info!(
            "event=import module=sync status=ok days={} lists={} staging={}",
            data.days().len(),
            data.lists().len(),
            data.staging().len()
        );
        store.replace(data);
        self.save(store)
    }

    /// Serializes the current aggregate verbatim for download.
    ///
    /// No pruning happens here beyond what earlier saves already applied.
    pub fn export_payload(&self, store: &TripStore) -> String {
        store.data().to_json_string()
    }

    /// Writes the export file under its fixed name into a directory.
    pub fn export_to(&self, store: &TripStore, dir: &Path) -> SyncResult<PathBuf> {
        let path = dir.join(SNAPSHOT_FILE_NAME);
        std::fs::write(&path, self.export_payload(store))?;
        Ok(path)
    }
}
