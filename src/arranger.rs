//! The orchestrator that ties display enumeration, composition and window
//! placement together.
//!
//! [`Arranger`] is generic over any [`DisplayEnumerator`] and
//! [`PlacementExecutor`], making it independent of the platform that
//! actually reports displays and moves windows.

use crate::config::LayoutConfig;
use crate::display::TopologySnapshot;
use crate::layout::{compose, ComposeError, Composition, Layout, LayoutSpec};
use crate::traits::{DisplayEnumerator, PlacementExecutor};
use log::{debug, info, warn};
use serde::Serialize;

/// Possible errors from the arranger.
#[derive(Debug, thiserror::Error)]
pub enum ArrangeError {
    /// The display enumerator returned an error.
    #[error("display enumerator error: {0}")]
    Enumerator(String),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// One window the executor could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("placing {app_id} failed: {reason}")]
pub struct PlacementFailed {
    pub app_id: String,
    pub reason: String,
}

/// Per-window outcome of [`Arranger::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub placed: Vec<String>,
    pub failed: Vec<PlacementFailed>,
}

/// When [`Arranger::run`] hands a composed layout to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPolicy {
    /// Apply even when validation reported issues.
    Always,
    /// Apply only a layout whose report is valid.
    OnlyValid,
    /// Compose only.
    Never,
}

/// A composition plus what happened when (if) it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrangement {
    pub composition: Composition,
    pub applied: Option<ApplyReport>,
}

/// Enumerates displays, composes layouts and applies them.
///
/// # Typical usage
///
/// ```ignore
/// let arranger = Arranger::new(JsonEnumerator::new("displays.json"), executor, config.layout);
/// let outcome = arranger.run(&presets::coding(&config.apps), ApplyPolicy::OnlyValid)?;
/// ```
pub struct Arranger<E: DisplayEnumerator, P: PlacementExecutor> {
    enumerator: E,
    executor: P,
    config: LayoutConfig,
}

impl<E: DisplayEnumerator, P: PlacementExecutor> Arranger<E, P> {
    pub fn new(enumerator: E, executor: P, config: LayoutConfig) -> Self {
        Self {
            enumerator,
            executor,
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Return a shared reference to the underlying executor.
    pub fn executor(&self) -> &P {
        &self.executor
    }

    /// Enumerate the current displays and compose `spec` against them.
    ///
    /// The topology is rebuilt on every call.
    pub fn arrange(&self, spec: &LayoutSpec) -> Result<Composition, ArrangeError> {
        let displays = self
            .enumerator
            .displays()
            .map_err(|e| ArrangeError::Enumerator(e.to_string()))?;
        debug!("enumerator reported {} display(s)", displays.len());
        let snapshot = TopologySnapshot { displays };
        Ok(compose(&snapshot, spec, &self.config)?)
    }

    /// Place every assignment of `layout`, in layout order.
    ///
    /// Failures are collected; they never stop the remaining placements.
    pub fn apply(&self, layout: &Layout) -> ApplyReport {
        let mut report = ApplyReport::default();
        for assignment in &layout.assignments {
            match self.executor.place(&assignment.app_id, &assignment.rect) {
                Ok(()) => {
                    debug!("placed {} at {}", assignment.app_id, assignment.rect);
                    report.placed.push(assignment.app_id.clone());
                }
                Err(e) => {
                    let failed = PlacementFailed {
                        app_id: assignment.app_id.clone(),
                        reason: e.to_string(),
                    };
                    warn!("{}", failed);
                    report.failed.push(failed);
                }
            }
        }
        info!(
            "{:?}: placed {}, failed {}",
            layout.name,
            report.placed.len(),
            report.failed.len()
        );
        report
    }

    /// [`arrange`](Self::arrange), then [`apply`](Self::apply) according to
    /// `policy`.
    pub fn run(&self, spec: &LayoutSpec, policy: ApplyPolicy) -> Result<Arrangement, ArrangeError> {
        let composition = self.arrange(spec)?;
        let apply = match policy {
            ApplyPolicy::Always => true,
            ApplyPolicy::OnlyValid => composition.report.valid,
            ApplyPolicy::Never => false,
        };
        if !apply && policy == ApplyPolicy::OnlyValid {
            warn!("{:?} has validation issues, not applying", spec.name);
        }
        let applied = apply.then(|| self.apply(&composition.layout));
        Ok(Arrangement {
            composition,
            applied,
        })
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayRecord, TopologyError};
    use crate::geometry::Rect;
    use crate::layout::{DisplaySelector, Placement, Slot};
    use std::cell::RefCell;

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error: {0}")]
    struct RecorderErr(String);

    /// Display source returning a fixed list, or failing.
    struct StaticDisplays(Result<Vec<DisplayRecord>, String>);

    impl DisplayEnumerator for StaticDisplays {
        type Error = RecorderErr;

        fn displays(&self) -> Result<Vec<DisplayRecord>, RecorderErr> {
            self.0.clone().map_err(RecorderErr)
        }
    }

    /// Record-keeping executor that refuses the apps listed in `refuse`.
    #[derive(Debug, Default)]
    struct RecorderExecutor {
        placed: RefCell<Vec<(String, Rect)>>,
        refuse: Vec<String>,
    }

    impl PlacementExecutor for RecorderExecutor {
        type Error = RecorderErr;

        fn place(&self, app_id: &str, rect: &Rect) -> Result<(), RecorderErr> {
            if self.refuse.iter().any(|r| r == app_id) {
                return Err(RecorderErr(format!("{} is not running", app_id)));
            }
            self.placed.borrow_mut().push((app_id.to_string(), *rect));
            Ok(())
        }
    }

    fn one_display() -> StaticDisplays {
        StaticDisplays(Ok(vec![DisplayRecord {
            id: Some("DP-1".into()),
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary: Some(true),
            reserved_top: Some(25),
        }]))
    }

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn fixed(x: i32, y: i32, width: i32, height: i32) -> Placement {
        Placement::Rect(rect(x, y, width, height))
    }

    fn three_windows() -> LayoutSpec {
        LayoutSpec {
            name: "coding".into(),
            slots: vec![
                Slot::new("code", DisplaySelector::Main, fixed(0, 25, 1152, 1000)),
                Slot::new("safari", DisplaySelector::Main, fixed(1150, 25, 768, 500)),
                Slot::new("iterm", DisplaySelector::Main, fixed(1152, 525, 768, 500)),
            ],
        }
    }

    fn arranger(refuse: &[&str]) -> Arranger<StaticDisplays, RecorderExecutor> {
        Arranger::new(
            one_display(),
            RecorderExecutor {
                placed: RefCell::new(Vec::new()),
                refuse: refuse.iter().map(|s| s.to_string()).collect(),
            },
            LayoutConfig::default(),
        )
    }

    #[test]
    fn run_applies_in_layout_order() {
        let a = arranger(&[]);
        let outcome = a.run(&three_windows(), ApplyPolicy::Always).unwrap();
        assert!(outcome.composition.report.valid);
        let placed = a.executor().placed.borrow();
        let order: Vec<&str> = placed.iter().map(|(app, _)| app.as_str()).collect();
        assert_eq!(order, vec!["code", "safari", "iterm"]);
        assert_eq!(placed[1].1, rect(1152, 25, 768, 500));
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let a = arranger(&["safari"]);
        let outcome = a.run(&three_windows(), ApplyPolicy::Always).unwrap();
        let applied = outcome.applied.unwrap();
        assert_eq!(applied.placed, vec!["code".to_string(), "iterm".to_string()]);
        assert_eq!(applied.failed.len(), 1);
        assert_eq!(applied.failed[0].app_id, "safari");
        assert_eq!(applied.failed[0].reason, "recorder error: safari is not running");
    }

    #[test]
    fn only_valid_skips_imperfect_layouts() {
        let a = arranger(&[]);
        let spec = LayoutSpec {
            name: "tiny".into(),
            slots: vec![Slot::new(
                "claude",
                DisplaySelector::Main,
                Placement::Rect(rect(100, 100, 300, 200)),
            )],
        };
        let outcome = a.run(&spec, ApplyPolicy::OnlyValid).unwrap();
        assert!(!outcome.composition.report.valid);
        assert!(outcome.applied.is_none());
        assert!(a.executor().placed.borrow().is_empty());
    }

    #[test]
    fn always_applies_imperfect_layouts() {
        let a = arranger(&[]);
        let spec = LayoutSpec {
            name: "tiny".into(),
            slots: vec![Slot::new(
                "claude",
                DisplaySelector::Main,
                Placement::Rect(rect(100, 100, 300, 200)),
            )],
        };
        let outcome = a.run(&spec, ApplyPolicy::Always).unwrap();
        assert_eq!(outcome.applied.unwrap().placed, vec!["claude".to_string()]);
    }

    #[test]
    fn never_policy_only_composes() {
        let a = arranger(&[]);
        let outcome = a.run(&three_windows(), ApplyPolicy::Never).unwrap();
        assert!(outcome.applied.is_none());
        assert_eq!(outcome.composition.layout.assignments.len(), 3);
    }

    #[test]
    fn enumerator_failure_is_reported() {
        let a = Arranger::new(
            StaticDisplays(Err("displayplacer missing".into())),
            RecorderExecutor::default(),
            LayoutConfig::default(),
        );
        let err = a.arrange(&three_windows()).unwrap_err();
        assert!(matches!(
            err,
            ArrangeError::Enumerator(ref m) if m.contains("displayplacer missing")
        ));
    }

    #[test]
    fn no_displays_is_fatal() {
        let a = Arranger::new(
            StaticDisplays(Ok(vec![])),
            RecorderExecutor::default(),
            LayoutConfig::default(),
        );
        let err = a.run(&three_windows(), ApplyPolicy::Always).unwrap_err();
        assert!(matches!(
            err,
            ArrangeError::Compose(ComposeError::Topology(TopologyError::Empty))
        ));
        assert!(a.executor().placed.borrow().is_empty());
    }
}
