//! View projection: read-only groupings for the map and timeline.

pub mod map_view;
pub mod organize;
