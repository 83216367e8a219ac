//! Marker, polyline and bounds derivation for the map surface.
//!
//! # Responsibility
//! - Turn an organized projection into drawable markers and, for a single
//!   date group, the day's travel path.
//!
//! # Invariants
//! - Only geocoded items become markers.
//! - A polyline exists iff the rendered group is a date group with at
//!   least two geocoded items; list groups have no visiting order.

use crate::project::organize::{GroupKey, OrganizedData, ProjectedItem};

/// One drawable map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub place: String,
    /// Popup context: the group label in the all-view, the item's own
    /// source label in a single-group view.
    pub source: String,
}

/// Rectangle the map fits to, grown point by point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    fn around(lat: f64, lon: f64) -> Self {
        Self {
            south: lat,
            west: lon,
            north: lat,
            east: lon,
        }
    }

    fn extend(&mut self, lat: f64, lon: f64) {
        self.south = self.south.min(lat);
        self.west = self.west.min(lon);
        self.north = self.north.max(lat);
        self.east = self.east.max(lon);
    }
}

/// Drawable output of one map view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapRender {
    /// Markers in projection order.
    pub markers: Vec<Marker>,
    /// Ordered travel path, present only for date groups with ≥2 points.
    pub polyline: Option<Vec<(f64, f64)>>,
    /// Fit rectangle, absent when nothing is geocoded.
    pub bounds: Option<Bounds>,
}

impl MapRender {
    fn push_marker(&mut self, item: &ProjectedItem, source: String) {
        let (Some(lat), Some(lon)) = (item.lat, item.lon) else {
            return;
        };
        self.markers.push(Marker {
            lat,
            lon,
            title: item.title.clone(),
            place: item.place.clone(),
            source,
        });
        match &mut self.bounds {
            Some(bounds) => bounds.extend(lat, lon),
            None => self.bounds = Some(Bounds::around(lat, lon)),
        }
    }
}

/// Global view: every group flattened into one marker cloud, no path.
pub fn render_all(organized: &OrganizedData) -> MapRender {
    let mut render = MapRender::default();
    for (key, items) in organized.groups() {
        for item in items {
            render.push_marker(item, key.label().to_string());
        }
    }
    render
}

/// Single-group view: markers in source order plus the day's travel path.
pub fn render_group(organized: &OrganizedData, key: &GroupKey) -> MapRender {
    let mut render = MapRender::default();
    let Some(items) = organized.group(key) else {
        return render;
    };

    for item in items {
        render.push_marker(item, item.source.clone());
    }

    if key.is_date() && render.markers.len() > 1 {
        render.polyline = Some(
            render
                .markers
                .iter()
                .map(|marker| (marker.lat, marker.lon))
                .collect(),
        );
    }
    render
}
