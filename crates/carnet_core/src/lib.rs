//! Core domain logic for Carnet trip planning.
//! This crate is the single source of truth for planner invariants.

pub mod db;
pub mod geocode;
pub mod logging;
pub mod model;
pub mod project;
pub mod repo;
pub mod store;
pub mod sync;

pub use geocode::nominatim::{NominatimGeocoder, NOMINATIM_ENDPOINT};
pub use geocode::queue::{GeocodeBatch, GeocodeQueue, QueueEntry, QueueReport};
pub use geocode::{GeoCandidate, GeocodeError, GeocodeResult, Geocoder};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemField, Section};
pub use model::trip::{
    is_date_key, ContainerRef, DayPlan, MoveRequest, NamedList, TripData, TripDecodeError,
};
pub use project::map_view::{render_all, render_group, Bounds, MapRender, Marker};
pub use project::organize::{
    list_source_label, planned_dates, GroupKey, OrganizedData, ProjectedItem, LISTS_GROUP_LABEL,
    STAGING_SOURCE_LABEL,
};
pub use repo::cache_repo::{
    CacheError, CacheRepository, CacheResult, SqliteCacheRepository, PLANNING_SLOT_KEY,
};
pub use store::trip_store::{StoreError, StoreResult, TripStore};
pub use sync::gateway::{PersistenceGateway, SyncError, SyncResult, DEFAULT_LIST_NAME};
pub use sync::snapshot::{
    HttpSnapshotFetcher, NoRemote, SnapshotError, SnapshotFetcher, SNAPSHOT_FILE_NAME,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
