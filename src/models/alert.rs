//! Performance alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertId, EntityId, MetricKind, PlatformId};

/// Severity of a performance alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Warning,
    Danger,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Success => write!(f, "success"),
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Danger => write!(f, "danger"),
        }
    }
}

/// A notable movement in one platform's metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier (derived from platform + metric + title)
    pub id: AlertId,

    pub kind: AlertKind,

    pub title: String,

    pub message: String,

    pub platform: Option<PlatformId>,

    pub metric: Option<MetricKind>,

    /// Percentage change that triggered the alert
    pub change: Option<f64>,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub dismissed: bool,
}

impl Alert {
    /// Create a new Alert with auto-generated ID.
    pub fn new(kind: AlertKind, title: String, message: String, timestamp: DateTime<Utc>) -> Self {
        let id = EntityId::generate(&[&kind.to_string(), &title, &message]);
        Self {
            id,
            kind,
            title,
            message,
            platform: None,
            metric: None,
            change: None,
            timestamp,
            dismissed: false,
        }
    }

    /// Builder method to attach the platform/metric/change that triggered the alert.
    pub fn with_source(mut self, platform: PlatformId, metric: MetricKind, change: f64) -> Self {
        self.platform = Some(platform);
        self.metric = Some(metric);
        self.change = Some(change);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_builder() {
        let alert = Alert::new(
            AlertKind::Danger,
            "Engagement Down Significantly".to_string(),
            "Instagram engagement dropped 30.0% vs previous period".to_string(),
            Utc::now(),
        )
        .with_source(PlatformId::Instagram, MetricKind::Engagement, -30.0);

        assert_eq!(alert.platform, Some(PlatformId::Instagram));
        assert_eq!(alert.change, Some(-30.0));
        assert!(!alert.dismissed);
    }

    #[test]
    fn test_alert_kind_serialization() {
        let json = serde_json::to_string(&AlertKind::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }
}
