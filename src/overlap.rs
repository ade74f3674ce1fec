//! Overlap detection and resolution.
//!
//! Two assignments *conflict* when they sit on the same display, belong to
//! different windows, and their rectangles overlap (see
//! [`Rect::overlaps`]).  Resolution is "first wins": of a conflicting pair
//! the earlier assignment stays put and the later one is relocated next to
//! it.  Candidate positions, in order:
//!
//! 1. immediately right of the fixed rectangle;
//! 2. immediately below it;
//! 3. immediately left of it;
//! 4. immediately above it.
//!
//! The first candidate that lies inside the usable area of the moved
//! window's display is taken.  When none fits the window is left where it is
//! and the conflict is reported later by [validation](crate::validate).
//!
//! A single pass ([`resolve_pass`]) compares every pair once in index
//! order, so a relocation can create a new conflict with a pair that was
//! already visited.  [`resolve_overlaps`] therefore repeats the pass until
//! the layout is conflict-free, a pass changes nothing, or the pass limit
//! is hit.

use crate::display::Topology;
use crate::geometry::Rect;
use crate::layout::WindowAssignment;
use log::{debug, warn};

/// Outcome of [`resolve_overlaps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub assignments: Vec<WindowAssignment>,
    /// Number of pairwise passes that ran.
    pub passes: usize,
    /// `true` when no conflicting pair remains.
    pub converged: bool,
}

/// Whether `a` and `b` are different windows overlapping on one display.
pub fn conflicts(a: &WindowAssignment, b: &WindowAssignment) -> bool {
    a.display_id == b.display_id && a.app_id != b.app_id && a.rect.overlaps(&b.rect)
}

/// Every conflicting `(i, j)` index pair with `i < j`.
pub fn conflicting_pairs(assignments: &[WindowAssignment]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..assignments.len() {
        for j in (i + 1)..assignments.len() {
            if conflicts(&assignments[i], &assignments[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// One pairwise pass in index order.
///
/// For every conflicting pair `(i, j)` with `i < j`, `j` is relocated
/// against the current position of `i`.  Earlier assignments are never
/// moved on account of later ones, so the first assignment keeps its
/// geometry.
pub fn resolve_pass(
    assignments: &[WindowAssignment],
    topology: &Topology,
) -> Vec<WindowAssignment> {
    let mut resolved = assignments.to_vec();

    for i in 0..resolved.len() {
        for j in (i + 1)..resolved.len() {
            if !conflicts(&resolved[i], &resolved[j]) {
                continue;
            }

            let fixed = resolved[i].rect;
            let Some(display) = topology.get(&resolved[j].display_id) else {
                debug!(
                    "cannot relocate {}: unknown display {}",
                    resolved[j].app_id, resolved[j].display_id
                );
                continue;
            };

            match relocate(&resolved[j].rect, &fixed, &display.usable()) {
                Some(rect) => {
                    debug!(
                        "moved {} from {} to {} to clear {}",
                        resolved[j].app_id, resolved[j].rect, rect, resolved[i].app_id
                    );
                    resolved[j].rect = rect;
                }
                None => {
                    debug!(
                        "no room to move {} clear of {}",
                        resolved[j].app_id, resolved[i].app_id
                    );
                }
            }
        }
    }

    resolved
}

/// Repeat [`resolve_pass`] until no conflict remains, at most `max_passes`
/// times.
///
/// Stops early when a pass leaves the layout unchanged, since further
/// passes would do the same.  Never fails: residual conflicts are signalled
/// through [`Resolution::converged`].
pub fn resolve_overlaps(
    assignments: &[WindowAssignment],
    topology: &Topology,
    max_passes: usize,
) -> Resolution {
    let mut current = assignments.to_vec();
    let mut passes = 0;

    while passes < max_passes && !conflicting_pairs(&current).is_empty() {
        let next = resolve_pass(&current, topology);
        passes += 1;
        if next == current {
            break;
        }
        current = next;
    }

    let converged = conflicting_pairs(&current).is_empty();
    if !converged {
        warn!("overlap resolution did not converge after {} pass(es)", passes);
    }

    Resolution {
        assignments: current,
        passes,
        converged,
    }
}

/// First candidate position for `moving` next to `fixed` that fits `area`.
fn relocate(moving: &Rect, fixed: &Rect, area: &Rect) -> Option<Rect> {
    let at = |x: Option<i32>, y: Option<i32>| Rect::new(x?, y?, moving.width, moving.height);
    let candidates = [
        at(Some(fixed.right()), Some(moving.y)),
        at(Some(moving.x), Some(fixed.bottom())),
        at(fixed.x.checked_sub(moving.width), Some(moving.y)),
        at(Some(moving.x), fixed.y.checked_sub(moving.height)),
    ];
    candidates.into_iter().flatten().find(|c| area.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayRecord;

    fn topology(reserved_top: i32) -> Topology {
        Topology::new(vec![DisplayRecord {
            id: Some("DP-1".into()),
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary: Some(true),
            reserved_top: Some(reserved_top),
        }])
        .unwrap()
    }

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn assign(app: &str, r: Rect) -> WindowAssignment {
        WindowAssignment {
            app_id: app.into(),
            display_id: "DP-1".into(),
            rect: r,
        }
    }

    #[test]
    fn two_pixel_overlap_moves_second_to_the_right() {
        let t = topology(25);
        let input = vec![
            assign("code", rect(0, 25, 1152, 1000)),
            assign("safari", rect(1150, 25, 768, 500)),
        ];
        let out = resolve_pass(&input, &t);
        assert_eq!(out[0].rect, input[0].rect);
        assert_eq!(out[1].rect, rect(1152, 25, 768, 500));
    }

    #[test]
    fn falls_back_to_below_when_right_does_not_fit() {
        let t = topology(0);
        let input = vec![
            assign("a", rect(0, 0, 1500, 400)),
            assign("b", rect(100, 100, 600, 300)),
        ];
        let out = resolve_pass(&input, &t);
        assert_eq!(out[1].rect, rect(100, 400, 600, 300));
    }

    #[test]
    fn falls_back_to_left() {
        let t = topology(0);
        let input = vec![
            assign("a", rect(1000, 0, 920, 1080)),
            assign("b", rect(1100, 100, 600, 300)),
        ];
        let out = resolve_pass(&input, &t);
        assert_eq!(out[1].rect, rect(400, 100, 600, 300));
    }

    #[test]
    fn falls_back_to_above_respecting_reserved_top() {
        let t = topology(25);
        // Right, below and left all leave the display.
        let fixed = rect(0, 625, 1920, 455);
        let input = vec![assign("a", fixed), assign("b", rect(10, 700, 1900, 300))];
        let out = resolve_pass(&input, &t);
        assert_eq!(out[1].rect, rect(10, 325, 1900, 300));

        // Same thing, but "above" would poke into the menu bar.
        let input = vec![assign("a", fixed), assign("b", rect(10, 700, 1900, 601))];
        let out = resolve_pass(&input, &t);
        assert_eq!(out[1].rect, input[1].rect);
    }

    #[test]
    fn no_fit_leaves_rectangle_unchanged() {
        let t = topology(0);
        let input = vec![
            assign("a", rect(0, 0, 1920, 1080)),
            assign("b", rect(100, 100, 500, 500)),
        ];
        let res = resolve_overlaps(&input, &t, 8);
        assert_eq!(res.assignments, input);
        assert!(!res.converged);
        assert_eq!(res.passes, 1);
    }

    #[test]
    fn left_candidate_at_coordinate_floor_is_skipped() {
        let t = Topology::new(vec![DisplayRecord {
            id: Some("DP-1".into()),
            x: i32::MIN,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary: Some(true),
            reserved_top: None,
        }])
        .unwrap();
        let input = vec![
            assign("a", rect(i32::MIN, 0, 1800, 1080)),
            assign("b", rect(i32::MIN + 100, 100, 300, 300)),
        ];
        let res = resolve_overlaps(&input, &t, 8);
        assert_eq!(res.assignments, input);
        assert!(!res.converged);
    }

    #[test]
    fn different_displays_never_conflict() {
        let a = assign("a", rect(0, 0, 100, 100));
        let mut b = assign("b", rect(0, 0, 100, 100));
        b.display_id = "DP-2".into();
        assert!(!conflicts(&a, &b));
    }

    #[test]
    fn same_app_never_conflicts() {
        let a = assign("a", rect(0, 0, 100, 100));
        let b = assign("a", rect(50, 50, 100, 100));
        assert!(!conflicts(&a, &b));
    }

    /// Moving `c` clear of `b` pushes it into `a`, which a single pass has
    /// already visited.
    fn chain() -> Vec<WindowAssignment> {
        vec![
            assign("a", rect(1200, 0, 720, 500)),
            assign("b", rect(0, 0, 1000, 1080)),
            assign("c", rect(800, 300, 400, 300)),
        ]
    }

    #[test]
    fn single_pass_can_leave_a_residual_overlap() {
        let t = topology(0);
        let res = resolve_overlaps(&chain(), &t, 1);
        assert_eq!(res.passes, 1);
        assert!(!res.converged);
        assert_eq!(res.assignments[2].rect, rect(1000, 300, 400, 300));
        assert_eq!(conflicting_pairs(&res.assignments), vec![(0, 2)]);
    }

    #[test]
    fn repeated_passes_converge() {
        let t = topology(0);
        let res = resolve_overlaps(&chain(), &t, 8);
        assert!(res.converged);
        assert_eq!(res.passes, 2);
        assert_eq!(res.assignments[0].rect, chain()[0].rect);
        assert_eq!(res.assignments[1].rect, chain()[1].rect);
        assert_eq!(res.assignments[2].rect, rect(1000, 500, 400, 300));
        assert!(conflicting_pairs(&res.assignments).is_empty());
    }

    #[test]
    fn conflict_free_input_runs_no_pass() {
        let t = topology(25);
        let input = vec![
            assign("code", rect(0, 25, 1152, 1055)),
            assign("safari", rect(1152, 25, 768, 527)),
        ];
        let res = resolve_overlaps(&input, &t, 8);
        assert_eq!(res.passes, 0);
        assert!(res.converged);
        assert_eq!(res.assignments, input);
    }
}
