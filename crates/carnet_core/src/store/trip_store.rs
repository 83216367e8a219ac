//! Canonical trip store and its mutation operations.
//!
//! # Responsibility
//! - Own the session's `TripData` and every structural mutation on it.
//! - Enforce container invariants: positional indices, single ownership,
//!   date-key validity, prune-on-save emptiness.
//!
//! # Invariants
//! - A move transfers exactly one item; the total item count is preserved,
//!   including moves within one container.
//! - Stale indices surface as `IndexOutOfRange`, never as silent
//!   corruption of a neighboring item.
//! - `generation` increases on every wholesale replacement, so paced
//!   background work can detect that its scan went stale.

use crate::model::item::{Item, ItemField};
use crate::model::trip::{is_date_key, ContainerRef, MoveRequest, NamedList, TripData};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Defensive faults raised by store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A positional item index does not exist in its container.
    IndexOutOfRange {
        container: ContainerRef,
        index: usize,
        len: usize,
    },
    /// A list index does not exist in the `lists` sequence.
    ListIndexOutOfRange { index: usize, len: usize },
    /// A date string that does not match `YYYY-MM-DD` tried to address a
    /// day plan.
    InvalidDateKey(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange {
                container,
                index,
                len,
            } => write!(
                f,
                "item index {index} out of range for {container} (len {len})"
            ),
            Self::ListIndexOutOfRange { index, len } => {
                write!(f, "list index {index} out of range (len {len})")
            }
            Self::InvalidDateKey(key) => write!(f, "invalid date key `{key}`"),
        }
    }
}

impl Error for StoreError {}

/// Owner of the canonical trip aggregate for one session.
///
/// One instance is created by the persistence gateway at startup and passed
/// by reference to the geocoding queue and the projector; there is no
/// module-level singleton.
#[derive(Debug, Default)]
pub struct TripStore {
    data: TripData,
    generation: u64,
}

impl TripStore {
    pub fn new(data: TripData) -> Self {
        Self {
            data,
            generation: 0,
        }
    }

    /// Read access for projection and scans.
    pub fn data(&self) -> &TripData {
        &self.data
    }

    /// Consumes the store, yielding the aggregate.
    pub fn into_data(self) -> TripData {
        self.data
    }

    /// Replacement stamp; see [`TripStore::replace`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the aggregate wholesale (remote overwrite, manual import).
    ///
    /// Bumps the generation stamp so an in-flight geocoding drain stops
    /// writing through indices scanned against the old structure.
    pub fn replace(&mut self, data: TripData) {
        self.data = data;
        self.generation += 1;
    }

    /// Appends a blank item to a container.
    ///
    /// Planner and staging blanks start fully empty; a list blank opens
    /// expanded and un-collapses its list, the way the sidebar behaves. The
    /// blank survives in memory until the next save prunes its day.
    pub fn add_item(&mut self, target: &ContainerRef) -> StoreResult<()> {
        let mut item = Item::blank();
        if let ContainerRef::List { index } = target {
            item.expanded = Some(true);
            self.list_mut(*index)?.collapsed = false;
        }
        self.ensure_container_mut(target)?.push(item);
        Ok(())
    }

    /// Assigns one field of one item in place.
    ///
    /// Never reorders or prunes, so a save after a keystroke cannot disturb
    /// editing state elsewhere.
    pub fn update_item_field(
        &mut self,
        target: &ContainerRef,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        let item = self.item_mut(target, index)?;
        let value = value.into();
        match field {
            ItemField::Title => item.title = value,
            ItemField::Place => item.place = value,
            ItemField::Desc => item.desc = value,
            ItemField::Img => item.img = value,
        }
        Ok(())
    }

    /// Writes resolved coordinates into an item without moving it.
    pub fn set_item_coordinates(
        &mut self,
        target: &ContainerRef,
        index: usize,
        lat: f64,
        lon: f64,
    ) -> StoreResult<()> {
        let item = self.item_mut(target, index)?;
        item.lat = Some(lat);
        item.lon = Some(lon);
        Ok(())
    }

    /// Flips an item's card expansion state.
    pub fn toggle_item_expanded(&mut self, target: &ContainerRef, index: usize) -> StoreResult<()> {
        let item = self.item_mut(target, index)?;
        item.expanded = Some(!item.expanded.unwrap_or(false));
        Ok(())
    }

    /// Removes one item; later indices in the container shift down.
    pub fn delete_item(&mut self, target: &ContainerRef, index: usize) -> StoreResult<()> {
        let items = match self.open_container_mut(target)? {
            Some(items) if index < items.len() => items,
            other => {
                let len = other.map(|items| items.len()).unwrap_or(0);
                return Err(StoreError::IndexOutOfRange {
                    container: target.clone(),
                    index,
                    len,
                });
            }
        };
        items.remove(index);
        Ok(())
    }

    /// Moves one item between containers, or reorders within one.
    ///
    /// Effectively append-to-destination plus remove-from-source. A
    /// same-container request is handled as remove-then-append: appending
    /// first and removing by the stale index would silently delete the
    /// wrong element after a self-drop. Dropping into a list collapses the
    /// card and un-collapses the list.
    pub fn move_item(&mut self, request: &MoveRequest) -> StoreResult<()> {
        // Validate the destination before touching the source so a failed
        // move leaves the aggregate untouched.
        match &request.dest {
            ContainerRef::DateSection { date, .. } => {
                if !is_date_key(date) {
                    return Err(StoreError::InvalidDateKey(date.clone()));
                }
            }
            ContainerRef::List { index } => {
                self.list_mut(*index)?;
            }
            ContainerRef::Staging => {}
        }

        let source = match self.open_container_mut(&request.source)? {
            Some(items) if request.source_index < items.len() => items,
            other => {
                let len = other.map(|items| items.len()).unwrap_or(0);
                return Err(StoreError::IndexOutOfRange {
                    container: request.source.clone(),
                    index: request.source_index,
                    len,
                });
            }
        };
        let mut item = source.remove(request.source_index);

        if let ContainerRef::List { index } = request.dest {
            item.expanded = Some(false);
            self.list_mut(index)?.collapsed = false;
        }
        self.ensure_container_mut(&request.dest)?.push(item);
        Ok(())
    }

    /// Drops every day plan without persistable content.
    ///
    /// Runs before every persistence write; idempotent.
    pub fn prune_empty_days(&mut self) {
        self.data.days.retain(|_, plan| plan.has_content());
    }

    /// Appends an expanded, empty named list.
    pub fn create_list(&mut self, name: impl Into<String>) {
        self.data.lists.push(NamedList::new(name));
    }

    /// Removes a list; its items are discarded irrecoverably.
    pub fn delete_list(&mut self, index: usize) -> StoreResult<()> {
        let len = self.data.lists.len();
        if index >= len {
            return Err(StoreError::ListIndexOutOfRange { index, len });
        }
        self.data.lists.remove(index);
        Ok(())
    }

    /// Flips a list's sidebar fold state.
    pub fn toggle_list_collapsed(&mut self, index: usize) -> StoreResult<()> {
        let list = self.list_mut(index)?;
        list.collapsed = !list.collapsed;
        Ok(())
    }

    /// Read access to one item by container and position.
    pub fn item(&self, target: &ContainerRef, index: usize) -> StoreResult<&Item> {
        let items = self.existing_container(target)?;
        items.get(index).ok_or_else(|| StoreError::IndexOutOfRange {
            container: target.clone(),
            index,
            len: items.len(),
        })
    }

    fn item_mut(&mut self, target: &ContainerRef, index: usize) -> StoreResult<&mut Item> {
        match self.open_container_mut(target)? {
            Some(items) if index < items.len() => Ok(&mut items[index]),
            other => {
                let len = other.map(|items| items.len()).unwrap_or(0);
                Err(StoreError::IndexOutOfRange {
                    container: target.clone(),
                    index,
                    len,
                })
            }
        }
    }

    /// Resolves a container for reading; a missing day or section reads as
    /// an empty sequence, like the wire shape.
    fn existing_container(&self, target: &ContainerRef) -> StoreResult<&[Item]> {
        match target {
            ContainerRef::DateSection { date, section } => {
                if !is_date_key(date) {
                    return Err(StoreError::InvalidDateKey(date.clone()));
                }
                Ok(self
                    .data
                    .days
                    .get(date)
                    .map(|plan| plan.section(*section))
                    .unwrap_or(&[]))
            }
            ContainerRef::List { index } => {
                let len = self.data.lists.len();
                self.data
                    .lists
                    .get(*index)
                    .map(|list| list.items.as_slice())
                    .ok_or(StoreError::ListIndexOutOfRange { index: *index, len })
            }
            ContainerRef::Staging => Ok(&self.data.staging),
        }
    }

    /// Resolves a container for mutation without creating day entries.
    ///
    /// `Ok(None)` means the container is structurally absent (missing day
    /// or untouched section), which callers report as a length-0 bounds
    /// fault rather than a distinct error kind.
    fn open_container_mut(&mut self, target: &ContainerRef) -> StoreResult<Option<&mut Vec<Item>>> {
        match target {
            ContainerRef::DateSection { date, section } => {
                if !is_date_key(date) {
                    return Err(StoreError::InvalidDateKey(date.clone()));
                }
                Ok(self
                    .data
                    .days
                    .get_mut(date)
                    .and_then(|plan| plan.existing_section_mut(*section)))
            }
            ContainerRef::List { index } => {
                let len = self.data.lists.len();
                self.data
                    .lists
                    .get_mut(*index)
                    .map(|list| Some(&mut list.items))
                    .ok_or(StoreError::ListIndexOutOfRange { index: *index, len })
            }
            ContainerRef::Staging => Ok(Some(&mut self.data.staging)),
        }
    }

    /// Resolves a container for mutation, creating day/section slots.
    fn ensure_container_mut(&mut self, target: &ContainerRef) -> StoreResult<&mut Vec<Item>> {
        match target {
            ContainerRef::DateSection { date, section } => {
                if !is_date_key(date) {
                    return Err(StoreError::InvalidDateKey(date.clone()));
                }
                let plan = self.data.days.entry(date.clone()).or_default();
                Ok(plan.section_mut(*section))
            }
            ContainerRef::List { index } => {
                let len = self.data.lists.len();
                self.data
                    .lists
                    .get_mut(*index)
                    .map(|list| &mut list.items)
                    .ok_or(StoreError::ListIndexOutOfRange { index: *index, len })
            }
            ContainerRef::Staging => Ok(&mut self.data.staging),
        }
    }

    fn list_mut(&mut self, index: usize) -> StoreResult<&mut NamedList> {
        let len = self.data.lists.len();
        self.data
            .lists
            .get_mut(index)
            .ok_or(StoreError::ListIndexOutOfRange { index, len })
    }
}
