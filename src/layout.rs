//! Layout composition.
//!
//! [`compose`] turns a [`LayoutSpec`] (an ordered list of [`Slot`]s) into a
//! concrete [`Layout`] for the current display topology:
//!
//! 1. each slot's display is selected and its raw rectangle computed from an
//!    explicit rectangle, a zone range, a fractional region or an inset;
//! 2. the rectangle is [snapped](crate::snap) against the windows already
//!    placed on the same display;
//! 3. overlaps across the whole set are [resolved](crate::overlap);
//! 4. the result is [validated](crate::validate).
//!
//! Structural problems in a layout spec (no displays, a bad grid, a zone range
//! outside the grid, a duplicated app) abort composition.  Geometric
//! imperfections never do: the layout is returned together with a
//! [`ValidationReport`] so the caller can decide whether to apply it.

use crate::config::LayoutConfig;
use crate::display::{Display, Topology, TopologyError, TopologySnapshot};
use crate::geometry::Rect;
use crate::grid::{Grid, GridError};
use crate::overlap::resolve_overlaps;
use crate::snap::snap;
use crate::validate::{validate, ValidationReport};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

//  Output types

/// One window bound to one rectangle on one display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowAssignment {
    pub app_id: String,
    pub display_id: String,
    pub rect: Rect,
}

/// A named set of window assignments, at most one per app id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub assignments: Vec<WindowAssignment>,
}

impl Layout {
    /// The assignment for `app_id`, if the layout places it.
    pub fn get(&self, app_id: &str) -> Option<&WindowAssignment> {
        self.assignments.iter().find(|a| a.app_id == app_id)
    }
}

/// How overlap resolution went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub passes: usize,
    pub converged: bool,
}

/// Everything [`compose`] produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub layout: Layout,
    pub report: ValidationReport,
    pub resolution: ResolutionSummary,
    /// App ids whose requested display is not connected.
    pub skipped: Vec<String>,
}

//  Input types

/// Which display a slot lands on, relative to the main display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySelector {
    /// The primary display, or the left-most one when none is primary.
    #[default]
    Main,
    /// The display directly left of the main one.
    Left,
    /// The display directly right of the main one.
    Right,
    /// A display by id.
    Id(String),
}

/// What to do when a slot's display is not connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDisplay {
    /// Leave the window out of the layout.
    #[default]
    Skip,
    /// Put the window on the main display instead.
    Main,
}

/// Where inside the selected display a slot's window goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// An explicit rectangle in virtual-desktop coordinates.
    Rect(Rect),
    /// The union of a contiguous block of grid zones.
    Zones {
        rows: usize,
        cols: usize,
        row: usize,
        col: usize,
        #[serde(default = "one")]
        row_span: usize,
        #[serde(default = "one")]
        col_span: usize,
    },
    /// A region given as fractions (`0.0..=1.0`) of the usable area.
    Fraction {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// The usable area shrunk by the given margins.
    Inset {
        #[serde(default)]
        left: i32,
        #[serde(default)]
        top: i32,
        #[serde(default)]
        right: i32,
        #[serde(default)]
        bottom: i32,
    },
}

fn one() -> usize {
    1
}

/// One window request within a [`LayoutSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub app_id: String,
    #[serde(default)]
    pub display: DisplaySelector,
    pub placement: Placement,
    #[serde(default)]
    pub on_missing_display: MissingDisplay,
}

impl Slot {
    pub fn new(app_id: impl Into<String>, display: DisplaySelector, placement: Placement) -> Self {
        Self {
            app_id: app_id.into(),
            display,
            placement,
            on_missing_display: MissingDisplay::Skip,
        }
    }

    /// Fall back to the main display when the selected one is missing.
    pub fn or_main(mut self) -> Self {
        self.on_missing_display = MissingDisplay::Main;
        self
    }
}

/// A named, ordered list of slots.
///
/// Slot order matters: earlier slots win overlap conflicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub name: String,
    pub slots: Vec<Slot>,
}

//  Errors

/// Structural errors that abort composition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("slot {app_id}: {source}")]
    Grid { app_id: String, source: GridError },
    #[error("slot {app_id}: zones ({row}, {col}) spanning {row_span}x{col_span} fall outside the {rows}x{cols} grid")]
    ZoneOutOfRange {
        app_id: String,
        rows: usize,
        cols: usize,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
    },
    #[error("slot {app_id}: invalid region: {reason}")]
    InvalidRegion { app_id: String, reason: String },
    #[error("app {0} appears in more than one slot")]
    DuplicateApp(String),
}

//  Composition

/// Compose `spec` against a freshly normalised `snapshot`.
///
/// Fails with [`TopologyError::Empty`] when the snapshot has no displays.
pub fn compose(
    snapshot: &TopologySnapshot,
    spec: &LayoutSpec,
    config: &LayoutConfig,
) -> Result<Composition, ComposeError> {
    let topology = Topology::new(snapshot.displays.clone())?;
    compose_on(&topology, spec, config)
}

/// Compose `spec` against an already normalised topology.
pub fn compose_on(
    topology: &Topology,
    spec: &LayoutSpec,
    config: &LayoutConfig,
) -> Result<Composition, ComposeError> {
    info!(
        "composing {:?}: {} slot(s) over {} display(s)",
        spec.name,
        spec.slots.len(),
        topology.len()
    );

    let mut seen = HashSet::new();
    let mut placed: Vec<WindowAssignment> = Vec::with_capacity(spec.slots.len());
    let mut skipped = Vec::new();

    for slot in &spec.slots {
        if !seen.insert(slot.app_id.as_str()) {
            return Err(ComposeError::DuplicateApp(slot.app_id.clone()));
        }

        let Some(display) = select_display(topology, slot) else {
            warn!(
                "{}: display {:?} not connected, skipping",
                slot.app_id, slot.display
            );
            skipped.push(slot.app_id.clone());
            continue;
        };

        let raw = raw_rect(&slot.app_id, &slot.placement, display)?;
        let siblings: Vec<WindowAssignment> = placed
            .iter()
            .filter(|a| a.display_id == display.id)
            .cloned()
            .collect();
        let rect = snap(&slot.app_id, raw, &siblings, display, config.snap_tolerance);
        debug!("{} -> {} on {}", slot.app_id, rect, display.id);

        placed.push(WindowAssignment {
            app_id: slot.app_id.clone(),
            display_id: display.id.clone(),
            rect,
        });
    }

    let resolution = resolve_overlaps(&placed, topology, config.max_resolve_passes);
    let layout = Layout {
        name: spec.name.clone(),
        assignments: resolution.assignments,
    };
    let report = validate(&layout, config.min_window);

    if report.valid {
        info!("{:?}: {} window(s) placed cleanly", layout.name, layout.assignments.len());
    } else {
        warn!(
            "{:?}: {} overlap(s), {} undersized window(s)",
            layout.name,
            report.overlaps.len(),
            report.undersized.len()
        );
    }

    Ok(Composition {
        layout,
        report,
        resolution: ResolutionSummary {
            passes: resolution.passes,
            converged: resolution.converged,
        },
        skipped,
    })
}

/// Resolve a slot's display, honouring its missing-display policy.
fn select_display<'a>(topology: &'a Topology, slot: &Slot) -> Option<&'a Display> {
    let main = topology.main();
    let selected = match &slot.display {
        DisplaySelector::Main => Some(main),
        DisplaySelector::Left => topology.left_of(main),
        DisplaySelector::Right => topology.right_of(main),
        DisplaySelector::Id(id) => topology.get(id),
    };
    match (selected, slot.on_missing_display) {
        (Some(display), _) => Some(display),
        (None, MissingDisplay::Main) => Some(main),
        (None, MissingDisplay::Skip) => None,
    }
}

/// The slot's rectangle before snapping.
fn raw_rect(app_id: &str, placement: &Placement, display: &Display) -> Result<Rect, ComposeError> {
    let usable = display.usable();
    let invalid = |reason: &str| ComposeError::InvalidRegion {
        app_id: app_id.to_string(),
        reason: reason.to_string(),
    };

    match placement {
        Placement::Rect(r) => Rect::new(r.x, r.y, r.width, r.height)
            .ok_or_else(|| invalid("extent must be positive and stay within i32 coordinates")),

        &Placement::Zones {
            rows,
            cols,
            row,
            col,
            row_span,
            col_span,
        } => {
            let grid = Grid::new(display, rows, cols).map_err(|source| ComposeError::Grid {
                app_id: app_id.to_string(),
                source,
            })?;
            let out_of_range = || ComposeError::ZoneOutOfRange {
                app_id: app_id.to_string(),
                rows,
                cols,
                row,
                col,
                row_span,
                col_span,
            };
            if row_span == 0 || col_span == 0 {
                return Err(out_of_range());
            }
            let last_row = row.checked_add(row_span - 1).ok_or_else(out_of_range)?;
            let last_col = col.checked_add(col_span - 1).ok_or_else(out_of_range)?;
            let first = grid.zone(row, col).ok_or_else(out_of_range)?;
            let last = grid.zone(last_row, last_col).ok_or_else(out_of_range)?;
            Ok(first.rect.union(&last.rect))
        }

        &Placement::Fraction {
            x,
            y,
            width,
            height,
        } => {
            const EPSILON: f64 = 1e-9;
            let parts = [x, y, width, height];
            if parts.iter().any(|p| !p.is_finite()) {
                return Err(invalid("fractions must be finite"));
            }
            if x < 0.0 || y < 0.0 || width <= 0.0 || height <= 0.0 {
                return Err(invalid("fractions must be non-negative with positive extent"));
            }
            if x + width > 1.0 + EPSILON || y + height > 1.0 + EPSILON {
                return Err(invalid("fractional region extends past the display"));
            }
            // Floor each edge rather than each size so adjacent regions
            // share edges exactly.
            let edge = |origin: i32, extent: i32, f: f64| -> i32 {
                origin + ((extent as f64 * f + EPSILON).floor() as i32).min(extent)
            };
            let left = edge(usable.x, usable.width, x);
            let right = edge(usable.x, usable.width, x + width);
            let top = edge(usable.y, usable.height, y);
            let bottom = edge(usable.y, usable.height, y + height);
            Rect::from_edges(left, top, right, bottom)
                .ok_or_else(|| invalid("fractional region is smaller than one pixel"))
        }

        &Placement::Inset {
            left,
            top,
            right,
            bottom,
        } => {
            if left < 0 || top < 0 || right < 0 || bottom < 0 {
                return Err(invalid("insets must be non-negative"));
            }
            let no_room = || invalid("insets leave no room");
            Rect::from_edges(
                usable.x.checked_add(left).ok_or_else(no_room)?,
                usable.y.checked_add(top).ok_or_else(no_room)?,
                usable.right().checked_sub(right).ok_or_else(no_room)?,
                usable.bottom().checked_sub(bottom).ok_or_else(no_room)?,
            )
            .ok_or_else(no_room)
        }
    }
}
