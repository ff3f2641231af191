//! Pacing speed for automatic conversations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-facing speed dial from 1 (slowest) to 10 (fastest).
///
/// Values outside the range are clamped on construction, so a stored
/// setting can never produce a zero or negative delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct PacingSpeed(u8);

impl PacingSpeed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(speed: u8) -> Self {
        Self(speed.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Delay between two automatic turns: `(11 - speed)` seconds.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(11 - self.0) * 1000)
    }
}

impl Default for PacingSpeed {
    fn default() -> Self {
        Self(5)
    }
}

impl From<u8> for PacingSpeed {
    fn from(speed: u8) -> Self {
        Self::new(speed)
    }
}

impl From<PacingSpeed> for u8 {
    fn from(speed: PacingSpeed) -> Self {
        speed.0
    }
}
