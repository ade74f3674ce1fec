//! Application configuration.
//!
//! The configuration is loaded from a JSON file whose path is passed on the
//! command line (`--config <path>`) or found at
//! `$XDG_CONFIG_HOME/snapgrd/config.json`.  Every tunable the layout engine
//! uses lives here and is passed explicitly into
//! [`compose`](crate::layout::compose) and the
//! [`Arranger`](crate::arranger::Arranger); nothing falls back to hidden
//! constants.
//!
//! # Example
//!
//! ```json
//! {
//!   "layout": {
//!     "snap_tolerance": 10,
//!     "min_window": { "width": 400, "height": 300 },
//!     "max_resolve_passes": 8
//!   },
//!   "displayplacer": { "menu_bar_height": 25 },
//!   "apps": { "editor": "Zed", "terminal": "Ghostty" }
//! }
//! ```

use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geometry tunables for composition.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// How `displayplacer list` dumps are interpreted.
    #[serde(default)]
    pub displayplacer: DisplayplacerConfig,

    /// App ids used by the built-in presets.
    #[serde(default)]
    pub apps: AppConfig,
}

/// Geometry tunables for [`compose`](crate::layout::compose).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Snap distance in pixels.  `0` (or less) disables snapping.
    pub snap_tolerance: i32,
    /// Windows smaller than this in either dimension are reported.
    pub min_window: Size,
    /// Upper bound on overlap-resolution passes.
    pub max_resolve_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 10,
            min_window: Size::new(400, 300),
            max_resolve_passes: 8,
        }
    }
}

/// Settings for parsing `displayplacer list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayplacerConfig {
    /// Reserved strip at the top of every display (the macOS menu bar).
    pub menu_bar_height: i32,
}

impl Default for DisplayplacerConfig {
    fn default() -> Self {
        Self {
            menu_bar_height: 25,
        }
    }
}

/// App ids the built-in [presets](crate::presets) place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: String,
    pub browser: String,
    pub terminal: String,
    pub assistant: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: "Visual Studio Code".into(),
            browser: "Safari".into(),
            terminal: "iTerm".into(),
            assistant: "Claude".into(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "layout": {
                "snap_tolerance": 4,
                "min_window": { "width": 640, "height": 480 },
                "max_resolve_passes": 3
            },
            "displayplacer": { "menu_bar_height": 37 },
            "apps": {
                "editor": "Zed",
                "browser": "Firefox",
                "terminal": "Ghostty",
                "assistant": "Notes"
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.layout.snap_tolerance, 4);
        assert_eq!(cfg.layout.min_window, Size::new(640, 480));
        assert_eq!(cfg.layout.max_resolve_passes, 3);
        assert_eq!(cfg.displayplacer.menu_bar_height, 37);
        assert_eq!(cfg.apps.editor, "Zed");
        assert_eq!(cfg.apps.assistant, "Notes");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.layout, LayoutConfig::default());
        assert_eq!(cfg.layout.snap_tolerance, 10);
        assert_eq!(cfg.layout.min_window, Size::new(400, 300));
        assert_eq!(cfg.displayplacer.menu_bar_height, 25);
        assert_eq!(cfg.apps, AppConfig::default());
    }

    #[test]
    fn deserialize_partial_layout() {
        let json = r#"{ "layout": { "snap_tolerance": 0 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.layout.snap_tolerance, 0);
        let defaults = LayoutConfig::default();
        assert_eq!(cfg.layout.min_window, defaults.min_window);
        assert_eq!(cfg.layout.max_resolve_passes, defaults.max_resolve_passes);
    }

    #[test]
    fn deserialize_partial_apps() {
        let json = r#"{ "apps": { "terminal": "kitty" } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.apps.terminal, "kitty");
        assert_eq!(cfg.apps.editor, AppConfig::default().editor);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "layout": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    /// Monotonic counter to generate unique file paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_path() -> std::path::PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("snapgrd-config-{}-{}.json", std::process::id(), id))
    }

    #[test]
    fn load_reads_file() {
        let path = tmp_path();
        std::fs::write(&path, r#"{ "displayplacer": { "menu_bar_height": 0 } }"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.displayplacer.menu_bar_height, 0);
        assert_eq!(cfg.layout, LayoutConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_bad_json() {
        let path = tmp_path();
        std::fs::write(&path, "{ layout: ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to parse"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("snapgrd-test-does-not-exist.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to read"));
    }
}
