//! Millisecond simulation timestamps.
//!
//! The core never reads a wall clock. Every entrypoint takes an explicit
//! `SimNow`, so the browser host can pass `performance.now()` while tests
//! and the headless tester drive a manual clock deterministically.

use serde::{Deserialize, Serialize};

/// A point in simulation time, in milliseconds since the host started.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SimNow(pub u64);

impl SimNow {
    /// Construct a timestamp from raw milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Raw millisecond value.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since an earlier timestamp, saturating at zero.
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Timestamp `millis` later than this one.
    #[must_use]
    pub const fn plus_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Whether this timestamp is at or past the given deadline.
    #[must_use]
    pub const fn has_reached(self, deadline: Self) -> bool {
        self.0 >= deadline.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_saturates_instead_of_underflowing() {
        let early = SimNow::from_millis(1_000);
        let late = SimNow::from_millis(4_500);
        assert_eq!(late.since(early), 3_500);
        assert_eq!(early.since(late), 0);
    }

    #[test]
    fn deadlines_are_inclusive() {
        let deadline = SimNow::from_millis(2_000);
        assert!(SimNow::from_millis(2_000).has_reached(deadline));
        assert!(SimNow::from_millis(2_001).has_reached(deadline));
        assert!(!SimNow::from_millis(1_999).has_reached(deadline));
    }
}
