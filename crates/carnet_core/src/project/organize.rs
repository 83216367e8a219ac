//! Map/timeline grouping projection.
//!
//! # Responsibility
//! - Derive presentation-ready groupings from the trip aggregate: one
//!   group per planned date plus one pseudo-group aggregating lists and
//!   staging.
//! - Derive the calendar's planned-date marks.
//!
//! # Invariants
//! - Pure reads; the projector never mutates the store.
//! - Only placeable items are projected; a placeable item lands in exactly
//!   one group.
//! - Group keys with zero items are omitted, never shown empty.

use crate::model::item::{Item, Section};
use crate::model::trip::TripData;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Label of the pseudo-group aggregating lists and staging.
pub const LISTS_GROUP_LABEL: &str = "Listes";
/// Source label of staging items inside the pseudo-group.
pub const STAGING_SOURCE_LABEL: &str = "Boîte à idées";

/// Source label of items coming from one named list.
pub fn list_source_label(name: &str) -> String {
    format!("Dossier: {name}")
}

/// Timeline group key: a planned date, or the lists pseudo-group.
///
/// Derived ordering is the timeline order: dates ascending, lists last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupKey {
    Date(String),
    Lists,
}

impl GroupKey {
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Display label of this group.
    pub fn label(&self) -> &str {
        match self {
            Self::Date(date) => date,
            Self::Lists => LISTS_GROUP_LABEL,
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One projected item, tagged with its origin label.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedItem {
    pub title: String,
    pub place: String,
    pub desc: String,
    pub img: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Section name, `Dossier: <list>`, or the staging label.
    pub source: String,
}

impl ProjectedItem {
    fn from_item(item: &Item, source: String) -> Self {
        Self {
            title: item.title.clone(),
            place: item.place.clone(),
            desc: item.desc.clone(),
            img: item.img.clone(),
            lat: item.lat,
            lon: item.lon,
            source,
        }
    }

    /// Returns whether this item can appear as a map marker.
    pub fn is_geocoded(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Grouped projection of one trip aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizedData {
    groups: BTreeMap<GroupKey, Vec<ProjectedItem>>,
}

impl OrganizedData {
    /// Projects the aggregate into timeline groups.
    ///
    /// Walk order inside a group follows storage: sections in display
    /// order for a date, list order then staging for the pseudo-group.
    pub fn organize(data: &TripData) -> Self {
        let mut groups: BTreeMap<GroupKey, Vec<ProjectedItem>> = BTreeMap::new();
        let mut push = |key: GroupKey, item: &Item, source: String| {
            if item.is_placeable() {
                groups
                    .entry(key)
                    .or_default()
                    .push(ProjectedItem::from_item(item, source));
            }
        };

        for (date, plan) in data.days() {
            for section in Section::ALL {
                for item in plan.section(section) {
                    push(
                        GroupKey::Date(date.clone()),
                        item,
                        section.label().to_string(),
                    );
                }
            }
        }
        for list in data.lists() {
            for item in &list.items {
                push(GroupKey::Lists, item, list_source_label(&list.name));
            }
        }
        for item in data.staging() {
            push(GroupKey::Lists, item, STAGING_SOURCE_LABEL.to_string());
        }

        Self { groups }
    }

    /// Groups in timeline order.
    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &[ProjectedItem])> {
        self.groups
            .iter()
            .map(|(key, items)| (key, items.as_slice()))
    }

    /// Items of one group, `None` when the group has nothing to show.
    pub fn group(&self, key: &GroupKey) -> Option<&[ProjectedItem]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Group keys in timeline order.
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Dates carrying a day plan, for the calendar's has-data marks.
pub fn planned_dates(data: &TripData) -> Vec<String> {
    data.days().keys().cloned().collect()
}
