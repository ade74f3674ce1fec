//! Built-in layout specs.
//!
//! | Name            | Main display                                   | Left display           | Right display    |
//! |-----------------|------------------------------------------------|------------------------|------------------|
//! | `coding`        | 5×2 grid: editor 3 cols, browser/terminal 2    | –                      | assistant, inset |
//! | `multi-monitor` | editor, usable area less a bottom margin       | browser over terminal  | assistant, inset |
//! | `split`         | editor left half, browser right half           | –                      | –                |
//!
//! Windows meant for a side display are skipped when that display is not
//! connected.  The app ids come from [`AppConfig`].

use crate::config::AppConfig;
use crate::layout::{DisplaySelector, LayoutSpec, Placement, Slot};

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["coding", "multi-monitor", "split"];

/// Look up a preset by name.
pub fn by_name(name: &str, apps: &AppConfig) -> Option<LayoutSpec> {
    match name {
        "coding" => Some(coding(apps)),
        "multi-monitor" => Some(multi_monitor(apps)),
        "split" => Some(split(apps)),
        _ => None,
    }
}

fn zones(
    row: usize,
    col: usize,
    row_span: usize,
    col_span: usize,
    rows: usize,
    cols: usize,
) -> Placement {
    Placement::Zones {
        rows,
        cols,
        row,
        col,
        row_span,
        col_span,
    }
}

fn inset(left: i32, top: i32, right: i32, bottom: i32) -> Placement {
    Placement::Inset {
        left,
        top,
        right,
        bottom,
    }
}

fn fraction(x: f64, y: f64, width: f64, height: f64) -> Placement {
    Placement::Fraction {
        x,
        y,
        width,
        height,
    }
}

/// Editor on the left 60% of the main display, browser over terminal on the
/// right 40%, assistant on the right-hand display.
pub fn coding(apps: &AppConfig) -> LayoutSpec {
    LayoutSpec {
        name: "coding".into(),
        slots: vec![
            Slot::new(&apps.editor, DisplaySelector::Main, zones(0, 0, 2, 3, 2, 5)),
            Slot::new(&apps.browser, DisplaySelector::Main, zones(0, 3, 1, 2, 2, 5)),
            Slot::new(&apps.terminal, DisplaySelector::Main, zones(1, 3, 1, 2, 2, 5)),
            Slot::new(&apps.assistant, DisplaySelector::Right, inset(50, 50, 50, 50)),
        ],
    }
}

/// One job per display: editor on main, reference material on the left
/// (browser 60%, terminal 40%), assistant on the right.  The editor keeps a
/// 25 px margin above the Dock; the assistant sits 50 px in from the
/// display's edges.
pub fn multi_monitor(apps: &AppConfig) -> LayoutSpec {
    LayoutSpec {
        name: "multi-monitor".into(),
        slots: vec![
            Slot::new(&apps.editor, DisplaySelector::Main, inset(0, 0, 0, 25)),
            Slot::new(&apps.browser, DisplaySelector::Left, fraction(0.0, 0.0, 1.0, 0.6)),
            Slot::new(&apps.terminal, DisplaySelector::Left, fraction(0.0, 0.6, 1.0, 0.4)),
            Slot::new(&apps.assistant, DisplaySelector::Right, inset(50, 25, 50, 50)),
        ],
    }
}

/// Two halves of the main display.
pub fn split(apps: &AppConfig) -> LayoutSpec {
    let half = |x: f64| fraction(x, 0.0, 0.5, 1.0);
    LayoutSpec {
        name: "split".into(),
        slots: vec![
            Slot::new(&apps.editor, DisplaySelector::Main, half(0.0)),
            Slot::new(&apps.browser, DisplaySelector::Main, half(0.5)),
        ],
    }
}
