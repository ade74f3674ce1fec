//! Integer geometry shared by every stage of the layout pipeline.
//!
//! All coordinates live in the shared virtual-desktop space reported by the
//! display enumerator: `x` grows to the right, `y` grows downward, and a
//! display to the left of the primary one has a negative `x` origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle.
///
/// Rectangles are plain values: two rectangles are equal when all four
/// fields are equal.  Every rectangle produced by this crate has a strictly
/// positive width and height; use [`Rect::new`] when building one from
/// untrusted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Build a rectangle, rejecting empty or negative extents and edges
    /// that would not fit in `i32`.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width > 0
            && height > 0
            && x.checked_add(width).is_some()
            && y.checked_add(height).is_some()
        {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        } else {
            None
        }
    }

    /// Build a rectangle from its left/top/right/bottom edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Option<Self> {
        Self::new(left, top, right.checked_sub(left)?, bottom.checked_sub(top)?)
    }

    /// Exclusive right edge (`x + width`).
    ///
    /// Rectangles built with [`Rect::new`] never overflow here.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge (`y + height`).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether the interiors of `self` and `other` intersect.
    ///
    /// Rectangles that merely share an edge do **not** overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        Rect {
            x: left,
            y: top,
            width: self.right().max(other.right()) - left,
            height: self.bottom().max(other.bottom()) - top,
        }
    }

    /// Same size, new left edge.
    pub fn with_x(self, x: i32) -> Rect {
        Rect { x, ..self }
    }

    /// Same size, new top edge.
    pub fn with_y(self, y: i32) -> Rect {
        Rect { y, ..self }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}
