//! Display topology.
//!
//! A [`Topology`] is an immutable, normalised snapshot of the connected
//! displays.  It is rebuilt from raw [`DisplayRecord`]s for every layout
//! request, because displays can be plugged in or out between requests.
//!
//! # Ordering
//!
//! Iteration order is part of the contract: the primary display comes
//! first, then every other display by ascending `x` origin (ties broken by
//! `y`, then by id).  [`Topology::main`] is therefore always the primary
//! display when there is one, and the left-most display otherwise.

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A raw display record as reported by a
/// [`DisplayEnumerator`](crate::traits::DisplayEnumerator).
///
/// Only origin and size are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// Persistent display id.  Generated as `display-<index>` when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub is_primary: Option<bool>,
    /// Height of persistent chrome (e.g. a menu bar) at the top.
    #[serde(default)]
    pub reserved_top: Option<i32>,
}

/// The raw display list for one layout request.
///
/// On disk this is `{ "displays": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub displays: Vec<DisplayRecord>,
}

/// One physical display in the shared virtual desktop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub id: String,
    pub origin: Point,
    pub size: Size,
    pub is_primary: bool,
    pub reserved_top: i32,
}

impl Display {
    /// Full bounds, chrome included.
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.size.width,
            height: self.size.height,
        }
    }

    /// Bounds minus the reserved strip at the top.
    pub fn usable(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y + self.reserved_top,
            width: self.size.width,
            height: self.size.height - self.reserved_top,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }
}

/// Errors from normalising display records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// No displays at all; nothing can be laid out.
    #[error("empty topology: no displays to lay out on")]
    Empty,
    #[error("duplicate display id {0:?}")]
    DuplicateId(String),
    #[error("more than one primary display ({0:?} and {1:?})")]
    MultiplePrimary(String, String),
    #[error("display {id:?} has invalid bounds: {reason}")]
    InvalidBounds { id: String, reason: String },
}

/// Normalised set of displays with a defined iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    displays: Vec<Display>,
}

impl Topology {
    /// Normalise raw records into a topology.
    ///
    /// Fails with [`TopologyError::Empty`] for an empty list; callers must
    /// treat that as fatal for the layout request.
    pub fn new(records: Vec<DisplayRecord>) -> Result<Self, TopologyError> {
        if records.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut seen = HashSet::new();
        let mut primary: Option<String> = None;
        let mut displays = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let id = record
                .id
                .unwrap_or_else(|| format!("display-{}", index));
            if !seen.insert(id.clone()) {
                return Err(TopologyError::DuplicateId(id));
            }

            let reserved_top = record.reserved_top.unwrap_or(0);
            if record.width <= 0 || record.height <= 0 {
                return Err(TopologyError::InvalidBounds {
                    id,
                    reason: format!("size {}x{} is not positive", record.width, record.height),
                });
            }
            if Rect::new(record.x, record.y, record.width, record.height).is_none() {
                return Err(TopologyError::InvalidBounds {
                    id,
                    reason: format!(
                        "{}x{} at ({}, {}) extends past the coordinate range",
                        record.width, record.height, record.x, record.y
                    ),
                });
            }
            if reserved_top < 0 || reserved_top >= record.height {
                return Err(TopologyError::InvalidBounds {
                    id,
                    reason: format!(
                        "reserved top {} leaves no usable height out of {}",
                        reserved_top, record.height
                    ),
                });
            }

            let is_primary = record.is_primary.unwrap_or(false);
            if is_primary {
                if let Some(existing) = &primary {
                    return Err(TopologyError::MultiplePrimary(existing.clone(), id));
                }
                primary = Some(id.clone());
            }

            displays.push(Display {
                id,
                origin: Point {
                    x: record.x,
                    y: record.y,
                },
                size: Size::new(record.width, record.height),
                is_primary,
                reserved_top,
            });
        }

        displays.sort_by(|a, b| {
            b.is_primary
                .cmp(&a.is_primary)
                .then(a.origin.x.cmp(&b.origin.x))
                .then(a.origin.y.cmp(&b.origin.y))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self { displays })
    }

    /// The main display: primary if any, otherwise the left-most one.
    pub fn main(&self) -> &Display {
        // `new` rejects empty input.
        &self.displays[0]
    }

    /// Look a display up by id.
    pub fn get(&self, id: &str) -> Option<&Display> {
        self.displays.iter().find(|d| d.id == id)
    }

    /// Displays in topology order.
    pub fn iter(&self) -> impl Iterator<Item = &Display> {
        self.displays.iter()
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    /// Always `false`; present for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// The display directly to the left of `display`.
    ///
    /// Among displays that start left of `display.x`, picks the one whose
    /// right edge is at or below `display.x` and closest to it.  Ties go to
    /// the display that comes first in topology order.
    pub fn left_of(&self, display: &Display) -> Option<&Display> {
        self.displays
            .iter()
            .filter(|c| c.origin.x < display.origin.x && c.right() <= display.origin.x)
            .min_by_key(|c| i64::from(display.origin.x) - i64::from(c.right()))
    }

    /// The display directly to the right of `display`.
    ///
    /// Symmetric to [`left_of`](Self::left_of): the candidate's left edge
    /// must be at or beyond `display`'s right edge.
    pub fn right_of(&self, display: &Display) -> Option<&Display> {
        self.displays
            .iter()
            .filter(|c| c.origin.x > display.origin.x && c.origin.x >= display.right())
            .min_by_key(|c| i64::from(c.origin.x) - i64::from(display.right()))
    }
}
