//! Performance alerts derived from period comparisons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ComparisonCard;
use crate::calculate::{format_change_magnitude, Direction};
use crate::config::AlertConfig;
use crate::models::{Alert, AlertId, AlertKind};

/// Percentage thresholds that turn a change into an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertRules {
    pub drop_threshold: f64,
    pub surge_threshold: f64,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self::from(&AlertConfig::default())
    }
}

impl From<&AlertConfig> for AlertRules {
    fn from(config: &AlertConfig) -> Self {
        Self {
            drop_threshold: config.drop_threshold,
            surge_threshold: config.surge_threshold,
        }
    }
}

/// Alerts for the comparison cards that crossed a threshold or stalled.
///
/// A card is flat only when both periods have data and are equal; an empty
/// previous period never raises an alert.
pub fn derive_alerts(
    comparisons: &[ComparisonCard],
    rules: &AlertRules,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for card in comparisons {
        let result = &card.comparison;
        if result.previous == 0.0 {
            continue;
        }

        let metric = card.metric.key();
        let change = result.change_percent;
        let magnitude = format_change_magnitude(change);

        let alert = if change <= -rules.drop_threshold {
            Alert::new(
                AlertKind::Danger,
                format!("{} Down Significantly", card.metric.label()),
                format!(
                    "{} {} dropped {} vs {}",
                    card.label, metric, magnitude, card.previous_period
                ),
                now,
            )
        } else if change >= rules.surge_threshold {
            Alert::new(
                AlertKind::Success,
                format!("{} Surge", card.metric.label()),
                format!(
                    "{} {} increased {} vs {}",
                    card.label, metric, magnitude, card.previous_period
                ),
                now,
            )
        } else if result.direction == Direction::Flat {
            Alert::new(
                AlertKind::Warning,
                format!("{} Plateau", card.metric.label()),
                format!(
                    "{} {} has remained flat since {}",
                    card.label, metric, card.previous_period
                ),
                now,
            )
        } else {
            continue;
        };

        alerts.push(alert.with_source(card.platform, card.metric, change));
    }

    debug!("Derived {} alerts from {} comparisons", alerts.len(), comparisons.len());
    alerts
}

/// Alerts with their dismissed state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

impl AlertFeed {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    /// Mark one alert dismissed. Returns `false` if no active alert has that id.
    pub fn dismiss(&mut self, id: &AlertId) -> bool {
        match self
            .alerts
            .iter_mut()
            .find(|alert| &alert.id == id && !alert.dismissed)
        {
            Some(alert) => {
                alert.dismissed = true;
                true
            }
            None => false,
        }
    }

    /// Dismiss everything.
    pub fn clear_all(&mut self) {
        for alert in &mut self.alerts {
            alert.dismissed = true;
        }
    }

    pub fn active(&self) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| !a.dismissed).collect()
    }

    pub fn dismissed(&self) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.dismissed).collect()
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }
}

/// Relative age of an alert: `3h ago`, `12m ago` or `Just now`.
///
/// Whole hours take precedence, so two days reads as `48h ago`.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "Just now".to_string()
    }
}
