//! File-backed [`DisplayEnumerator`]s.
//!
//! Two formats are understood:
//!
//! * JSON, either `{ "displays": [ ... ] }` or a bare array of
//!   [`DisplayRecord`]s;
//! * the text printed by `displayplacer list`, captured to a file.
//!
//! # `displayplacer list` format
//!
//! Each display block starts with a `Persistent screen id:` line.  Only a
//! handful of lines matter:
//!
//! ```text
//! Persistent screen id: 37D8832A-2D66-02CA-B9F7-8F30A301B230
//! Type: 24 inch external screen
//! Resolution: 1920x1080
//! Origin: (-1920,0)
//! Main Display: Yes
//! ```
//!
//! Newer releases mark the main display on the origin line instead
//! (`Origin: (0,0) - main display`); both spellings are accepted.

use crate::display::{DisplayRecord, TopologySnapshot};
use crate::traits::DisplayEnumerator;
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors from reading a display file.
#[derive(Debug, thiserror::Error)]
pub enum EnumerateError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads a JSON display list from `path` on every call.
pub struct JsonEnumerator {
    path: PathBuf,
}

impl JsonEnumerator {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDisplays {
    Snapshot(TopologySnapshot),
    Bare(Vec<DisplayRecord>),
}

impl DisplayEnumerator for JsonEnumerator {
    type Error = EnumerateError;

    fn displays(&self) -> Result<Vec<DisplayRecord>, EnumerateError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let records = match serde_json::from_str::<JsonDisplays>(&contents)? {
            JsonDisplays::Snapshot(s) => s.displays,
            JsonDisplays::Bare(v) => v,
        };
        debug!("read {} display(s) from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Reads a captured `displayplacer list` dump from `path` on every call.
pub struct DisplayplacerEnumerator {
    path: PathBuf,
    menu_bar_height: i32,
}

impl DisplayplacerEnumerator {
    /// `menu_bar_height` becomes every display's reserved top strip.
    pub fn new(path: impl AsRef<Path>, menu_bar_height: i32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            menu_bar_height,
        }
    }
}

impl DisplayEnumerator for DisplayplacerEnumerator {
    type Error = EnumerateError;

    fn displays(&self) -> Result<Vec<DisplayRecord>, EnumerateError> {
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(parse_displayplacer(&contents, self.menu_bar_height))
    }
}

/// A display block being accumulated.
#[derive(Default)]
struct Block {
    id: String,
    size: Option<(i32, i32)>,
    origin: Option<(i32, i32)>,
    main: bool,
}

impl Block {
    fn finish(self, menu_bar_height: i32) -> Option<DisplayRecord> {
        let (Some((width, height)), Some((x, y))) = (self.size, self.origin) else {
            warn!("displayplacer: dropping {} (no resolution or origin)", self.id);
            return None;
        };
        Some(DisplayRecord {
            id: Some(self.id),
            x,
            y,
            width,
            height,
            is_primary: Some(self.main),
            reserved_top: Some(menu_bar_height),
        })
    }
}

/// Parse `displayplacer list` output into display records.
///
/// Blocks without a resolution or origin are dropped with a warning.
pub fn parse_displayplacer(text: &str, menu_bar_height: i32) -> Vec<DisplayRecord> {
    let mut records = Vec::new();
    let mut current: Option<Block> = None;

    for line in text.lines().map(str::trim) {
        if let Some(id) = line.strip_prefix("Persistent screen id:") {
            if let Some(done) = current.take() {
                records.extend(done.finish(menu_bar_height));
            }
            current = Some(Block {
                id: id.trim().to_string(),
                ..Block::default()
            });
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = line.strip_prefix("Resolution:") {
            block.size = parse_resolution(rest);
        } else if let Some(rest) = line.strip_prefix("Origin:") {
            block.origin = parse_origin(rest);
            if rest.contains("main display") {
                block.main = true;
            }
        } else if line.starts_with("Main Display: Yes") {
            block.main = true;
        }
    }

    if let Some(done) = current {
        records.extend(done.finish(menu_bar_height));
    }
    records
}

/// `"1920x1080"` → `(1920, 1080)`.
fn parse_resolution(s: &str) -> Option<(i32, i32)> {
    let (w, h) = s.trim().split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// `"(-1920,0) - main display"` → `(-1920, 0)`.
fn parse_origin(s: &str) -> Option<(i32, i32)> {
    let inner = s.trim().strip_prefix('(')?;
    let (inner, _) = inner.split_once(')')?;
    let (x, y) = inner.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}
