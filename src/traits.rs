//! Core traits that decouple the layout engine from the platform.
//!
//! The engine itself never talks to the operating system.  Display
//! discovery and window placement happen behind these two traits, so the
//! [`Arranger`](crate::arranger::Arranger) can be driven by a real backend,
//! a captured dump, or a test double.

use crate::display::DisplayRecord;
use crate::geometry::Rect;

/// A source of raw display records.
///
/// Called once per layout request; implementations must not cache results
/// across calls, since displays can be reconnected at any time.
pub trait DisplayEnumerator {
    /// The error type produced by this enumerator.
    type Error: std::error::Error + Send + 'static;

    /// Return the currently connected displays, in any order.
    fn displays(&self) -> Result<Vec<DisplayRecord>, Self::Error>;
}

/// Moves and resizes one application window.
///
/// Every call is independent: a failure for one window says nothing about
/// the others, and the caller keeps going.
pub trait PlacementExecutor {
    /// The error type produced by this executor.
    type Error: std::error::Error + Send + 'static;

    /// Move `app_id`'s window to `rect`.
    fn place(&self, app_id: &str, rect: &Rect) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// A test double that records every call made to it.
    #[derive(Debug, Default)]
    struct MockExecutor {
        log: RefCell<Vec<(String, Rect)>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl PlacementExecutor for MockExecutor {
        type Error = MockError;

        fn place(&self, app_id: &str, rect: &Rect) -> Result<(), MockError> {
            self.log.borrow_mut().push((app_id.to_string(), *rect));
            Ok(())
        }
    }

    struct FixedDisplays(Vec<DisplayRecord>);

    impl DisplayEnumerator for FixedDisplays {
        type Error = MockError;

        fn displays(&self) -> Result<Vec<DisplayRecord>, MockError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn mock_executor_records_placements() {
        let exec = MockExecutor::default();
        let r = Rect {
            x: 0,
            y: 25,
            width: 800,
            height: 600,
        };
        exec.place("Safari", &r).unwrap();
        assert_eq!(exec.log.borrow().len(), 1);
        assert_eq!(exec.log.borrow()[0], ("Safari".into(), r));
    }

    #[test]
    fn enumerator_returns_fresh_copies() {
        let source = FixedDisplays(vec![DisplayRecord {
            id: Some("DP-1".into()),
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary: Some(true),
            reserved_top: None,
        }]);
        let mut first = source.displays().unwrap();
        first[0].width = 1;
        assert_eq!(source.displays().unwrap()[0].width, 1920);
    }
}
