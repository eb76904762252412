//! Core data models for social-pulse.

mod alert;
mod content;
mod ids;
mod metric;
mod platform;
mod team;

pub use alert::*;
pub use content::*;
pub use ids::*;
pub use metric::*;
pub use platform::*;
pub use team::*;
