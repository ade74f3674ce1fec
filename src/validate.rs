//! Read-only layout validation.
//!
//! Validation never changes a layout.  It reports two kinds of geometric
//! imperfection that composition deliberately does not correct:
//!
//! * residual overlaps the [resolver](crate::overlap) could not clear;
//! * windows smaller than the configured minimum size.  Growing them
//!   automatically could reintroduce overlaps, so they are only flagged.

use crate::geometry::Size;
use crate::layout::Layout;
use crate::overlap::conflicting_pairs;
use log::debug;
use serde::{Deserialize, Serialize};

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` iff both `overlaps` and `undersized` are empty.
    pub valid: bool,
    /// App-id pairs whose windows overlap on the same display, in layout
    /// order.
    pub overlaps: Vec<(String, String)>,
    /// App ids whose window is narrower or shorter than the minimum.
    pub undersized: Vec<String>,
}

/// Check `layout` for overlaps and windows below `min_size`.
pub fn validate(layout: &Layout, min_size: Size) -> ValidationReport {
    let assignments = &layout.assignments;

    let overlaps: Vec<(String, String)> = conflicting_pairs(assignments)
        .into_iter()
        .map(|(i, j)| {
            debug!(
                "{}: {} overlaps {}",
                layout.name, assignments[i].app_id, assignments[j].app_id
            );
            (assignments[i].app_id.clone(), assignments[j].app_id.clone())
        })
        .collect();

    let undersized: Vec<String> = assignments
        .iter()
        .filter(|a| a.rect.width < min_size.width || a.rect.height < min_size.height)
        .map(|a| {
            debug!(
                "{}: {} is {}, below the {} minimum",
                layout.name,
                a.app_id,
                a.rect.size(),
                min_size
            );
            a.app_id.clone()
        })
        .collect();

    ValidationReport {
        valid: overlaps.is_empty() && undersized.is_empty(),
        overlaps,
        undersized,
    }
}
