//! Metrics derivation engine.
//!
//! Pure functions over in-memory rows that every view shares:
//! - Count, percentage and date formatting
//! - Period-over-period change
//! - Stable descending ranking
//! - Platform / search / date filtering
//! - Field sums, time bucketing and platform shares

mod aggregate;
mod change;
mod filter;
mod format;
mod rank;

pub use aggregate::*;
pub use change::*;
pub use filter::*;
pub use format::*;
pub use rank::*;
