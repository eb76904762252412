//! Period-over-period change.

use serde::{Deserialize, Serialize};

/// Percentage change from `previous` to `current`.
///
/// Returns `0.0` when `previous` is zero rather than an infinite or NaN
/// ratio. The result is not rounded.
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Which way a metric moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Compare raw values.
    pub fn classify(current: f64, previous: f64) -> Self {
        if current > previous {
            Direction::Up
        } else if current < previous {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    /// Sign of a percentage change; flat only for exactly zero.
    pub fn from_change(change_percent: f64) -> Self {
        if change_percent > 0.0 {
            Direction::Up
        } else if change_percent < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Flat => write!(f, "flat"),
        }
    }
}

/// A current/previous pair with its derived change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
    pub direction: Direction,
}

impl ComparisonResult {
    pub fn new(current: f64, previous: f64) -> Self {
        let change_percent = change_percent(current, previous);
        Self {
            current,
            previous,
            change_percent,
            direction: Direction::from_change(change_percent),
        }
    }
}
