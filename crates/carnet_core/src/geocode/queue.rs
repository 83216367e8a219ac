//! Sequential geocoding queue over the trip store.
//!
//! # Responsibility
//! - Scan the store for placeable items still missing a coordinate.
//! - Drain the scan strictly sequentially with a fixed inter-request pause,
//!   writing the first candidate back into the live store and persisting
//!   after every success.
//!
//! # Invariants
//! - Scan order is structural: days ascending, sections in display order,
//!   then lists, then staging.
//! - One failure never aborts the rest of the queue.
//! - A drain stops writing as soon as the store generation no longer
//!   matches the scan stamp (the store was replaced under it).
//! - A drain never schedules a follow-up scan; re-projection and rescans
//!   belong to the caller.

use crate::geocode::Geocoder;
use crate::model::item::Section;
use crate::model::trip::ContainerRef;
use crate::repo::cache_repo::CacheRepository;
use crate::store::trip_store::TripStore;
use crate::sync::gateway::PersistenceGateway;
use crate::sync::snapshot::SnapshotFetcher;
use log::{error, info, warn};
use std::thread;
use std::time::Duration;
use uuid::Uuid;

/// Pause after every lookup, success or failure (provider rate policy).
const DEFAULT_REQUEST_PAUSE: Duration = Duration::from_millis(1100);
/// User-visible pause after the queue drains, before the caller rescans.
const DEFAULT_COMPLETION_PAUSE: Duration = Duration::from_millis(1000);

/// One unresolved placeable item, addressed positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub container: ContainerRef,
    pub index: usize,
    pub place: String,
}

/// Scan result: entries plus the store generation they were scanned
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeBatch {
    entries: Vec<QueueEntry>,
    generation: u64,
}

impl GeocodeBatch {
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store generation observed at scan time.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of one drain run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueReport {
    /// Entries whose first candidate was written back.
    pub resolved: usize,
    /// Lookups that failed or returned no candidate.
    pub failed: usize,
    /// Entries whose write-back target vanished.
    pub skipped: usize,
    /// Drain stopped early because the store was replaced.
    pub aborted: bool,
}

/// Paced sequential geocoding runner.
#[derive(Debug, Clone, Copy)]
pub struct GeocodeQueue {
    request_pause: Duration,
    completion_pause: Duration,
}

impl Default for GeocodeQueue {
    fn default() -> Self {
        Self {
            request_pause: DEFAULT_REQUEST_PAUSE,
            completion_pause: DEFAULT_COMPLETION_PAUSE,
        }
    }
}

impl GeocodeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides pacing; tests pass `Duration::ZERO`.
    pub fn with_pacing(request_pause: Duration, completion_pause: Duration) -> Self {
        Self {
            request_pause,
            completion_pause,
        }
    }

    /// Collects placeable items missing a coordinate, in structural order.
    pub fn scan(store: &TripStore) -> GeocodeBatch {
        let data = store.data();
        let mut entries = Vec::new();

        for (date, plan) in data.days() {
            for section in Section::ALL {
                for (index, item) in plan.section(section).iter().enumerate() {
                    if item.is_placeable() && item.needs_geocoding() {
                        entries.push(QueueEntry {
                            container: ContainerRef::date_section(date.clone(), section),
                            index,
                            place: item.place.clone(),
                        });
                    }
                }
            }
        }
        for (list_index, list) in data.lists().iter().enumerate() {
            for (index, item) in list.items.iter().enumerate() {
                if item.is_placeable() && item.needs_geocoding() {
                    entries.push(QueueEntry {
                        container: ContainerRef::list(list_index),
                        index,
                        place: item.place.clone(),
                    });
                }
            }
        }
        for (index, item) in data.staging().iter().enumerate() {
            if item.is_placeable() && item.needs_geocoding() {
                entries.push(QueueEntry {
                    container: ContainerRef::Staging,
                    index,
                    place: item.place.clone(),
                });
            }
        }

        GeocodeBatch {
            entries,
            generation: store.generation(),
        }
    }

    /// Drains one batch against the live store.
    ///
    /// Each entry gets exactly one lookup followed by the fixed pause. A
    /// successful lookup writes the first candidate into the store and
    /// persists immediately; persistence failures are logged and the drain
    /// continues. After the last entry the completion pause runs, then the
    /// report is returned for the caller to re-project on.
    pub fn drain<G, C, F>(
        &self,
        store: &mut TripStore,
        batch: &GeocodeBatch,
        geocoder: &G,
        gateway: &PersistenceGateway<C, F>,
    ) -> QueueReport
    where
        G: Geocoder,
        C: CacheRepository,
        F: SnapshotFetcher,
    {
        let run_id = Uuid::new_v4();
        let mut report = QueueReport::default();
        info!(
            "event=geocode_run module=geocode status=start run={run_id} queued={}",
            batch.len()
        );

        for entry in &batch.entries {
            if store.generation() != batch.generation {
                report.aborted = true;
                warn!(
                    "event=geocode_run module=geocode status=aborted run={run_id} reason=store_replaced"
                );
                break;
            }

            // Locators are positional; a deletion since the scan may have
            // shifted or removed the target. Verify before spending a
            // rate-limited request on it.
            let target_is_current = match store.item(&entry.container, entry.index) {
                Ok(item) => item.place == entry.place && item.needs_geocoding(),
                Err(_) => false,
            };
            if !target_is_current {
                report.skipped += 1;
                continue;
            }

            match geocoder.lookup(&entry.place) {
                Ok(candidates) => match candidates.first() {
                    Some(candidate) => {
                        match store.set_item_coordinates(
                            &entry.container,
                            entry.index,
                            candidate.lat,
                            candidate.lon,
                        ) {
                            Ok(()) => {
                                report.resolved += 1;
                                if let Err(err) = gateway.save(store) {
                                    error!(
                                        "event=geocode_save module=geocode status=error run={run_id} error={err}"
                                    );
                                }
                            }
                            Err(err) => {
                                report.skipped += 1;
                                warn!(
                                    "event=geocode_run module=geocode status=skip run={run_id} error={err}"
                                );
                            }
                        }
                    }
                    None => report.failed += 1,
                },
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        "event=geocode_lookup module=geocode status=error run={run_id} error={err}"
                    );
                }
            }

            thread::sleep(self.request_pause);
        }

        thread::sleep(self.completion_pause);
        info!(
            "event=geocode_run module=geocode status=ok run={run_id} resolved={} failed={} skipped={} aborted={}",
            report.resolved, report.failed, report.skipped, report.aborted
        );
        report
    }
}
