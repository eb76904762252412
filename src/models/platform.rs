//! The closed set of tracked platforms.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A platform id that is not part of the tracked set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

/// A social channel acting as the partition key for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Twitter,
    Instagram,
    YouTube,
    LinkedIn,
    Medium,
    Reddit,
    Website,
}

impl PlatformId {
    /// Every platform, in sidebar order.
    pub const ALL: [PlatformId; 7] = [
        PlatformId::Twitter,
        PlatformId::Instagram,
        PlatformId::YouTube,
        PlatformId::LinkedIn,
        PlatformId::Medium,
        PlatformId::Reddit,
        PlatformId::Website,
    ];

    /// Lowercase identifier used in filters, series keys and config.
    pub fn id(&self) -> &'static str {
        match self {
            PlatformId::Twitter => "twitter",
            PlatformId::Instagram => "instagram",
            PlatformId::YouTube => "youtube",
            PlatformId::LinkedIn => "linkedin",
            PlatformId::Medium => "medium",
            PlatformId::Reddit => "reddit",
            PlatformId::Website => "website",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            PlatformId::Twitter => "Twitter",
            PlatformId::Instagram => "Instagram",
            PlatformId::YouTube => "YouTube",
            PlatformId::LinkedIn => "LinkedIn",
            PlatformId::Medium => "Medium",
            PlatformId::Reddit => "Reddit",
            PlatformId::Website => "Website",
        }
    }

    /// Brand colour for chart series.
    pub fn color(&self) -> &'static str {
        match self {
            PlatformId::Twitter => "#1DA1F2",
            PlatformId::Instagram => "#E4405F",
            PlatformId::YouTube => "#FF0000",
            PlatformId::LinkedIn => "#0077B5",
            PlatformId::Medium => "#000000",
            PlatformId::Reddit => "#FF4500",
            PlatformId::Website => "#22C55E",
        }
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for PlatformId {
    type Err = UnknownPlatform;

    /// Accepts the id or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PlatformId::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(needle) || p.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
