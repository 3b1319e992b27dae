//! Discussion time limit.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::round::format_time;

/// Seconds of discussion before voting, in `[MIN, MAX]` on a `STEP` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display("{}", format_time(*_0))]
#[serde(from = "u32", into = "u32")]
pub struct TimeLimit(u32);

impl TimeLimit {
    /// Shortest allowed limit.
    pub const MIN: u32 = 30;
    /// Longest allowed limit.
    pub const MAX: u32 = 600;
    /// Increment used by the +/- controls.
    pub const STEP: u32 = 30;
    /// Limit used when nothing is stored.
    pub const DEFAULT: u32 = 300;

    /// Creates a limit, rounding `seconds` to the nearest step and clamping
    /// it into range.
    pub fn new(seconds: u32) -> Self {
        let snapped = seconds.saturating_add(Self::STEP / 2) / Self::STEP * Self::STEP;
        Self(snapped.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the limit in seconds.
    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Returns the limit one step longer, capped at `MAX`.
    #[instrument]
    pub fn increased(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    /// Returns the limit one step shorter, floored at `MIN`.
    #[instrument]
    pub fn decreased(self) -> Self {
        Self::new(self.0.saturating_sub(Self::STEP))
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u32> for TimeLimit {
    fn from(seconds: u32) -> Self {
        Self::new(seconds)
    }
}

impl From<TimeLimit> for u32 {
    fn from(limit: TimeLimit) -> Self {
        limit.0
    }
}
