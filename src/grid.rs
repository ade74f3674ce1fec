//! Grid zoning.
//!
//! A [`Grid`] partitions one display's usable area into `rows × cols`
//! [`Zone`]s.  Zones tile the usable area exactly: every zone is
//! `floor(usable / count)` wide (or tall), and the last column (or row)
//! absorbs the integer remainder.  Zones are therefore not always equal in
//! size, but there are never gaps or dead pixels between them.
//!
//! Zones are stored row-major, so the zone at `(row, col)` sits at index
//! `row * cols + col`.

use crate::display::Display;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One cell of a grid partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub rect: Rect,
    pub row: usize,
    pub col: usize,
}

impl Zone {
    /// Diagnostic id, `zone_{row}_{col}`.
    pub fn id(&self) -> String {
        format!("zone_{}_{}", self.row, self.col)
    }
}

/// Errors from building a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Zero rows or columns, or more cells along an axis than the display
    /// has pixels.
    #[error("invalid grid spec {rows}x{cols} for usable area {usable}")]
    InvalidGridSpec {
        rows: usize,
        cols: usize,
        usable: Rect,
    },
}

/// A `rows × cols` partition of one display's usable area.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    zones: Vec<Zone>,
}

impl Grid {
    /// Partition `display`'s usable area into `rows × cols` zones.
    pub fn new(display: &Display, rows: usize, cols: usize) -> Result<Self, GridError> {
        let usable = display.usable();
        let invalid = || GridError::InvalidGridSpec { rows, cols, usable };

        if rows == 0 || cols == 0 {
            return Err(invalid());
        }
        let rows_i = i32::try_from(rows).map_err(|_| invalid())?;
        let cols_i = i32::try_from(cols).map_err(|_| invalid())?;

        let zone_width = usable.width / cols_i;
        let zone_height = usable.height / rows_i;
        if zone_width == 0 || zone_height == 0 {
            return Err(invalid());
        }

        let last_width = usable.width - (cols_i - 1) * zone_width;
        let last_height = usable.height - (rows_i - 1) * zone_height;

        let mut zones = Vec::with_capacity(rows * cols);
        for row in 0..rows_i {
            for col in 0..cols_i {
                zones.push(Zone {
                    rect: Rect {
                        x: usable.x + col * zone_width,
                        y: usable.y + row * zone_height,
                        width: if col == cols_i - 1 { last_width } else { zone_width },
                        height: if row == rows_i - 1 { last_height } else { zone_height },
                    },
                    row: row as usize,
                    col: col as usize,
                });
            }
        }

        Ok(Self { rows, cols, zones })
    }

    /// Grid dimensions as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All zones in row-major order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The zone at `(row, col)`, if inside the grid.
    pub fn zone(&self, row: usize, col: usize) -> Option<&Zone> {
        if row < self.rows && col < self.cols {
            self.zones.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// The zone at a row-major `index`.
    pub fn zone_at(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }
}

/// Convenience wrapper returning just the zones of a `rows × cols` grid.
pub fn zones(display: &Display, rows: usize, cols: usize) -> Result<Vec<Zone>, GridError> {
    Grid::new(display, rows, cols).map(|g| g.zones)
}

//  Tests
