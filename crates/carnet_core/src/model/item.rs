//! Item and section domain model.
//!
//! # Responsibility
//! - Define the single trip-entry record shared by planner, lists and map.
//! - Define the fixed time-of-day section set and its display order.
//! - Decode/encode items from the tolerant JSON wire shape.
//!
//! # Invariants
//! - An item is placeable iff `place` is non-blank after trimming.
//! - Missing `lat` or `lon` marks a placeable item as needing geocoding.
//! - Wire decoding never fails for an item; malformed entries degrade to
//!   defaults exactly like the original reader.

use serde_json::{Map, Number, Value};

/// Fixed time-of-day slots of a day plan, in display order.
///
/// The declaration order is the display order and drives `Ord`, so section
/// maps iterate from `Breakfast` to `Night` without extra bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Breakfast,
    Morning,
    Lunch,
    Afternoon,
    Dinner,
    Evening,
    Night,
}

impl Section {
    /// All sections in display order.
    pub const ALL: [Section; 7] = [
        Section::Breakfast,
        Section::Morning,
        Section::Lunch,
        Section::Afternoon,
        Section::Dinner,
        Section::Evening,
        Section::Night,
    ];

    /// Wire/display label of this section.
    pub fn label(self) -> &'static str {
        match self {
            Section::Breakfast => "Breakfast",
            Section::Morning => "Morning",
            Section::Lunch => "Lunch",
            Section::Afternoon => "Afternoon",
            Section::Dinner => "Dinner",
            Section::Evening => "Evening",
            Section::Night => "Night",
        }
    }

    /// Parses a wire label back to a section.
    pub fn from_label(value: &str) -> Option<Section> {
        match value {
            "Breakfast" => Some(Section::Breakfast),
            "Morning" => Some(Section::Morning),
            "Lunch" => Some(Section::Lunch),
            "Afternoon" => Some(Section::Afternoon),
            "Dinner" => Some(Section::Dinner),
            "Evening" => Some(Section::Evening),
            "Night" => Some(Section::Night),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Editable item fields addressed by in-place field updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Place,
    /// Free-form note text.
    Desc,
    /// Photo as a data URI; empty string means no photo.
    Img,
}

/// One trip entry: a card on the planner, in a named list, or in staging.
///
/// Coordinates stay optional; the geocoding queue fills them in place
/// without changing the item's container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub title: String,
    pub place: String,
    pub desc: String,
    /// Data URI of an attached photo, or empty.
    pub img: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// List-card expansion state; planner cards leave this unset.
    pub expanded: Option<bool>,
}

impl Item {
    /// Creates an empty item the way the planner "+ add" action does.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Returns whether this item participates in geocoding and map display.
    pub fn is_placeable(&self) -> bool {
        !self.place.trim().is_empty()
    }

    /// Returns whether a geocoding lookup is still owed for this item.
    ///
    /// Meaningful only for placeable items; blank-place items never enter
    /// the queue regardless of coordinates.
    pub fn needs_geocoding(&self) -> bool {
        self.lat.is_none() || self.lon.is_none()
    }

    /// Returns whether the item has any persistable content.
    ///
    /// Coordinates alone do not count: a card with nothing typed into it is
    /// empty even if a stale lookup left numbers behind.
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty()
            || !self.place.trim().is_empty()
            || !self.desc.trim().is_empty()
            || !self.img.is_empty()
    }

    /// Decodes one item from its wire value.
    ///
    /// Returns `None` for non-object values; inside an object every missing
    /// or mistyped field falls back to its default.
    pub fn from_value(value: &Value) -> Option<Item> {
        let map = value.as_object()?;
        Some(Item {
            title: string_field(map, "title"),
            place: string_field(map, "place"),
            desc: string_field(map, "desc"),
            img: string_field(map, "img"),
            lat: coordinate_field(map, "lat"),
            lon: coordinate_field(map, "lon"),
            expanded: map.get("expanded").and_then(Value::as_bool),
        })
    }

    /// Encodes this item to its wire value.
    ///
    /// Text fields are always present; `lat`/`lon`/`expanded` are emitted
    /// only when set, matching documents written by the original app.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("title".to_string(), Value::String(self.title.clone()));
        map.insert("place".to_string(), Value::String(self.place.clone()));
        map.insert("desc".to_string(), Value::String(self.desc.clone()));
        map.insert("img".to_string(), Value::String(self.img.clone()));
        if let Some(number) = self.lat.and_then(Number::from_f64) {
            map.insert("lat".to_string(), Value::Number(number));
        }
        if let Some(number) = self.lon.and_then(Number::from_f64) {
            map.insert("lon".to_string(), Value::Number(number));
        }
        if let Some(expanded) = self.expanded {
            map.insert("expanded".to_string(), Value::Bool(expanded));
        }
        Value::Object(map)
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads a coordinate that may be a JSON number or a numeric string.
///
/// The geocoding provider returns `lat`/`lon` as strings and older
/// documents store them verbatim, so both spellings are accepted.
fn coordinate_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, Section};
    use serde_json::json;

    #[test]
    fn sections_iterate_in_display_order() {
        let labels: Vec<_> = Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            [
                "Breakfast",
                "Morning",
                "Lunch",
                "Afternoon",
                "Dinner",
                "Evening",
                "Night"
            ]
        );
    }

    #[test]
    fn placeable_requires_non_blank_place() {
        let mut item = Item::blank();
        assert!(!item.is_placeable());
        item.place = "   ".to_string();
        assert!(!item.is_placeable());
        item.place = " Paris ".to_string();
        assert!(item.is_placeable());
    }

    #[test]
    fn coordinates_decode_from_numbers_and_numeric_strings() {
        let item = Item::from_value(&json!({"place": "Paris", "lat": "48.85", "lon": 2.35}))
            .expect("object should decode");
        assert_eq!(item.lat, Some(48.85));
        assert_eq!(item.lon, Some(2.35));
        assert!(!item.needs_geocoding());
    }

    #[test]
    fn malformed_fields_degrade_to_defaults() {
        let item = Item::from_value(&json!({"title": 7, "lat": "not-a-number"}))
            .expect("object should decode");
        assert_eq!(item.title, "");
        assert_eq!(item.lat, None);
        assert!(Item::from_value(&json!([1, 2])).is_none());
    }
}
