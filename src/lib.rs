//! # Social Pulse
//!
//! Metrics derivation for a multi-platform social media dashboard.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (platforms, metrics, records, team, alerts)
//! - **calculate**: Formatting, change, ranking, filtering and aggregation
//! - **present**: View models for each dashboard widget
//! - **ingest**: Validation of data-entry input
//! - **storage**: Filesystem data lake operations (JSONL) and repositories
//! - **export**: Report generation
//! - **sample**: Built-in demo dataset
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod export;
pub mod ingest;
pub mod models;
pub mod present;
pub mod sample;
pub mod storage;

pub use models::*;

/// Parse a human-friendly window length (e.g., "7d", "4w", "30").
///
/// Bare numbers are days. Returns `None` for zero or unparseable input.
pub fn parse_window_days(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = s.strip_suffix('d') {
        (n, 1)
    } else {
        (s, 1)
    };

    let num: u32 = num_str.trim().parse().ok()?;
    let days = num.checked_mul(multiplier)?;
    (days > 0).then_some(days)
}
