//! **snapgrd**: a grid-based, non-overlapping multi-monitor window layout
//! engine.
//!
//! Given the connected displays and a declarative [`layout::LayoutSpec`],
//! the engine computes one rectangle per application window.  Windows are
//! placed on grid zones, fractions or insets of a display's usable area,
//! snapped to nearby edges, pushed apart when they overlap, and finally
//! checked against a minimum size.
//!
//! # Architecture
//!
//! The geometry pipeline is pure and lives in [`display`], [`grid`],
//! [`snap`], [`overlap`], [`validate`] and [`layout`].  Everything that
//! touches the outside world sits behind two traits:
//!
//! * [`traits::DisplayEnumerator`]: reports the connected displays.
//! * [`traits::PlacementExecutor`]: moves one window to a rectangle.
//!
//! [`arranger::Arranger`] drives both.  File-backed enumerators live in
//! [`enumerate`]; ready-made layouts live in [`presets`].

pub mod arranger;
pub mod config;
pub mod display;
pub mod enumerate;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod overlap;
pub mod presets;
pub mod snap;
pub mod traits;
pub mod validate;
