//! Edge snapping.
//!
//! [`snap`] translates a rectangle so that its edges line up with nearby
//! display edges or sibling-window edges.  It never changes the size of the
//! rectangle and never corrects overlaps; that is left to the
//! [overlap resolver](crate::overlap), which runs after every window of a
//! layout has been snapped.
//!
//! Each axis is snapped independently and at most once, in this order:
//!
//! 1. an edge already flush with the display's edge keeps the axis as is;
//! 2. the display's left/right (or top/bottom) edge, if within tolerance;
//! 3. an edge already flush with a sibling keeps the axis as is;
//! 4. sibling edges, in sibling order: our left edge against the sibling's
//!    right edge, then our right edge against the sibling's left edge.
//!
//! Sibling targets whose landing position would itself be within tolerance
//! of a display edge are skipped, so a second `snap` never moves the
//! rectangle again.  The top display edge is the top of the usable area,
//! i.e. below any reserved chrome.

use crate::display::Display;
use crate::geometry::Rect;
use crate::layout::WindowAssignment;
use log::debug;

/// Snap `rect`, owned by `app_id`, onto nearby display or sibling edges.
///
/// `siblings` owned by the same `app_id` are ignored.  A `tolerance` of
/// zero or less disables snapping entirely.
pub fn snap(
    app_id: &str,
    rect: Rect,
    siblings: &[WindowAssignment],
    display: &Display,
    tolerance: i32,
) -> Rect {
    if tolerance <= 0 {
        return rect;
    }

    let usable = display.usable();
    let others: Vec<&Rect> = siblings
        .iter()
        .filter(|s| s.app_id != app_id)
        .map(|s| &s.rect)
        .collect();

    let horizontal: Vec<(i32, i32)> = others.iter().map(|s| (s.x, s.right())).collect();
    let vertical: Vec<(i32, i32)> = others.iter().map(|s| (s.y, s.bottom())).collect();

    let x = snap_axis(
        rect.x,
        rect.width,
        (display.origin.x, display.right()),
        &horizontal,
        tolerance,
    );
    let y = snap_axis(
        rect.y,
        rect.height,
        (usable.y, display.bottom()),
        &vertical,
        tolerance,
    );

    let snapped = rect.with_x(x).with_y(y);
    if snapped != rect {
        debug!("snapped {} from {} to {}", app_id, rect, snapped);
    }
    snapped
}

/// Snap one axis.  `start`/`len` describe the rectangle's extent along the
/// axis, `bounds` the display's `(low, high)` edges, and `siblings` the
/// `(start, end)` extents of the other windows.
fn snap_axis(
    start: i32,
    len: i32,
    bounds: (i32, i32),
    siblings: &[(i32, i32)],
    tolerance: i32,
) -> i32 {
    let (low, high) = bounds;
    let end = start + len;
    let near = |a: i32, b: i32| (i64::from(a) - i64::from(b)).abs() < i64::from(tolerance);

    if start == low || end == high {
        return start;
    }
    if near(start, low) {
        return low;
    }
    if near(end, high) {
        if let Some(landed) = high.checked_sub(len) {
            return landed;
        }
    }

    if siblings
        .iter()
        .any(|&(s_start, s_end)| start == s_end || end == s_start)
    {
        return start;
    }

    let lands_near_display =
        |at: i32| near(at, low) || at.checked_add(len).map_or(true, |e| near(e, high));
    for &(s_start, s_end) in siblings {
        if near(start, s_end) && !lands_near_display(s_end) {
            return s_end;
        }
        if near(end, s_start) {
            if let Some(landed) = s_start.checked_sub(len) {
                if !lands_near_display(landed) {
                    return landed;
                }
            }
        }
    }

    start
}
