//! Trip aggregate model.
//!
//! # Responsibility
//! - Define the root aggregate: dated day plans, named lists and staging.
//! - Decode/encode the fixed JSON wire shape used by cache, snapshot,
//!   import and export.
//! - Provide container addressing for mutation and move requests.
//!
//! # Invariants
//! - Day keys always match `YYYY-MM-DD`; junk keys never become day plans.
//! - `lists` and `staging` keep manual order; day plans keep section order.
//! - Decoding is tolerant field-by-field; only a non-object root fails.

use crate::model::item::{Item, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

/// Returns whether a top-level key names a calendar day.
pub fn is_date_key(value: &str) -> bool {
    DATE_KEY_RE.is_match(value)
}

/// Decode error for trip documents.
#[derive(Debug)]
pub enum TripDecodeError {
    /// Payload is not syntactically valid JSON.
    Json(serde_json::Error),
    /// Payload parsed but the root is not a JSON object.
    NotAnObject,
}

impl Display for TripDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid trip document: {err}"),
            Self::NotAnObject => write!(f, "trip document root must be a JSON object"),
        }
    }
}

impl Error for TripDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for TripDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// A user-named, ordered, collapsible collection of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedList {
    pub name: String,
    /// Sidebar fold state; persisted with the data like the original app.
    pub collapsed: bool,
    pub items: Vec<Item>,
}

impl NamedList {
    /// Creates an expanded, empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collapsed: false,
            items: Vec::new(),
        }
    }
}

/// Items scheduled for one calendar date, grouped by section.
///
/// A missing section entry is equivalent to an empty sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPlan {
    sections: BTreeMap<Section, Vec<Item>>,
}

impl DayPlan {
    /// Items of one section, empty when the section was never touched.
    pub fn section(&self, section: Section) -> &[Item] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable item sequence of one section, created on first use.
    pub fn section_mut(&mut self, section: Section) -> &mut Vec<Item> {
        self.sections.entry(section).or_default()
    }

    /// Existing mutable section entry, without creating one.
    pub(crate) fn existing_section_mut(&mut self, section: Section) -> Option<&mut Vec<Item>> {
        self.sections.get_mut(&section)
    }

    /// Returns whether any section holds an item with persistable content.
    pub fn has_content(&self) -> bool {
        self.sections
            .values()
            .any(|items| items.iter().any(Item::has_content))
    }

    /// Total item count across sections.
    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    fn from_value(value: &Value) -> DayPlan {
        let mut plan = DayPlan::default();
        let Some(map) = value.as_object() else {
            return plan;
        };
        for section in Section::ALL {
            if let Some(Value::Array(entries)) = map.get(section.label()) {
                let items: Vec<Item> = entries.iter().filter_map(Item::from_value).collect();
                plan.sections.insert(section, items);
            }
        }
        plan
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (section, items) in &self.sections {
            let entries: Vec<Value> = items.iter().map(Item::to_value).collect();
            map.insert(section.label().to_string(), Value::Array(entries));
        }
        Value::Object(map)
    }
}

/// Root aggregate: one trip's planner days, lists and staging inbox.
///
/// Day enumeration is structural (ascending date order); callers must not
/// rely on any other order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripData {
    pub(crate) days: BTreeMap<String, DayPlan>,
    pub(crate) lists: Vec<NamedList>,
    pub(crate) staging: Vec<Item>,
}

impl TripData {
    pub fn days(&self) -> &BTreeMap<String, DayPlan> {
        &self.days
    }

    pub fn day(&self, date: &str) -> Option<&DayPlan> {
        self.days.get(date)
    }

    pub fn lists(&self) -> &[NamedList] {
        &self.lists
    }

    pub fn staging(&self) -> &[Item] {
        &self.staging
    }

    /// Total item count across days, lists and staging.
    pub fn total_items(&self) -> usize {
        self.days.values().map(DayPlan::item_count).sum::<usize>()
            + self.lists.iter().map(|list| list.items.len()).sum::<usize>()
            + self.staging.len()
    }

    /// Decodes a trip document from JSON text.
    pub fn from_json_str(payload: &str) -> Result<TripData, TripDecodeError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(&value)
    }

    /// Decodes a trip document from a parsed JSON value.
    ///
    /// Tolerance mirrors the original reader: date-shaped keys become day
    /// plans, `lists`/`staging` decode element-wise, and every other
    /// top-level key is dropped.
    pub fn from_value(value: &Value) -> Result<TripData, TripDecodeError> {
        let root = value.as_object().ok_or(TripDecodeError::NotAnObject)?;
        let mut data = TripData::default();

        for (key, entry) in root {
            match key.as_str() {
                "lists" => data.lists = decode_lists(entry),
                "staging" => data.staging = decode_items(entry),
                _ if is_date_key(key) => {
                    data.days.insert(key.clone(), DayPlan::from_value(entry));
                }
                // Unknown keys are never day plans; drop them.
                _ => {}
            }
        }

        Ok(data)
    }

    /// Encodes this trip to its wire value: day keys, then lists, staging.
    ///
    /// `lists`/`staging` are emitted only when non-empty, matching documents
    /// the original app writes.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (date, plan) in &self.days {
            map.insert(date.clone(), plan.to_value());
        }
        if !self.lists.is_empty() {
            let lists: Vec<Value> = self.lists.iter().map(list_to_value).collect();
            map.insert("lists".to_string(), Value::Array(lists));
        }
        if !self.staging.is_empty() {
            let staging: Vec<Value> = self.staging.iter().map(Item::to_value).collect();
            map.insert("staging".to_string(), Value::Array(staging));
        }
        Value::Object(map)
    }

    /// Encodes this trip to JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

impl Serialize for TripData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TripData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TripData::from_value(&value).map_err(DeError::custom)
    }
}

fn decode_lists(value: &Value) -> Vec<NamedList> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let map = entry.as_object()?;
            Some(NamedList {
                name: map
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                collapsed: map
                    .get("collapsed")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                items: map.get("items").map(decode_items).unwrap_or_default(),
            })
        })
        .collect()
}

fn decode_items(value: &Value) -> Vec<Item> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries.iter().filter_map(Item::from_value).collect()
}

fn list_to_value(list: &NamedList) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(list.name.clone()));
    map.insert("collapsed".to_string(), Value::Bool(list.collapsed));
    let items: Vec<Value> = list.items.iter().map(Item::to_value).collect();
    map.insert("items".to_string(), Value::Array(items));
    Value::Object(map)
}

/// Addresses one item container: a planner section, a list, or staging.
///
/// Mutation operations take this tagged reference instead of ad-hoc string
/// keys; list addressing stays positional because lists have no stable ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    DateSection { date: String, section: Section },
    List { index: usize },
    Staging,
}

impl ContainerRef {
    /// Convenience constructor for a planner section container.
    pub fn date_section(date: impl Into<String>, section: Section) -> Self {
        Self::DateSection {
            date: date.into(),
            section,
        }
    }

    /// Convenience constructor for a list container.
    pub fn list(index: usize) -> Self {
        Self::List { index }
    }
}

impl Display for ContainerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateSection { date, section } => write!(f, "{date}/{section}"),
            Self::List { index } => write!(f, "list {index}"),
            Self::Staging => write!(f, "staging"),
        }
    }
}

/// In-process drag-and-drop payload: take one item, append it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source: ContainerRef,
    pub source_index: usize,
    pub dest: ContainerRef,
}

#[cfg(test)]
mod tests {
    use super::{is_date_key, TripData, TripDecodeError};
    use serde_json::json;

    #[test]
    fn date_key_pattern_is_strict() {
        assert!(is_date_key("2024-01-31"));
        assert!(!is_date_key("2024-1-31"));
        assert!(!is_date_key("lists"));
        assert!(!is_date_key("2024-01-31x"));
    }

    #[test]
    fn junk_top_level_keys_are_dropped() {
        let data = TripData::from_value(&json!({
            "2024-05-01": {"Morning": [{"title": "a", "place": "", "desc": "", "img": ""}]},
            "notes": "remember the charger",
            "lists": [],
        }))
        .expect("object should decode");
        assert_eq!(data.days().len(), 1);
        assert!(data.day("2024-05-01").is_some());
        assert!(data.lists().is_empty());
    }

    #[test]
    fn non_object_root_is_a_decode_error() {
        let err = TripData::from_json_str("[1, 2, 3]").expect_err("array root must fail");
        assert!(matches!(err, TripDecodeError::NotAnObject));
        let err = TripData::from_json_str("{not json").expect_err("bad syntax must fail");
        assert!(matches!(err, TripDecodeError::Json(_)));
    }
}
