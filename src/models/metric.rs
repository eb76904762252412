//! Metric observations and the tabular records they come from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::{EntityId, PlatformId, RecordId};

/// A metric name that is not one of the tracked KPIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);

/// A tracked key performance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Reach,
    Views,
    Engagement,
    Clicks,
    Leads,
    Conversions,
}

impl MetricKind {
    /// Every metric, in KPI card order.
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Reach,
        MetricKind::Views,
        MetricKind::Engagement,
        MetricKind::Clicks,
        MetricKind::Leads,
        MetricKind::Conversions,
    ];

    /// Field key, as used in series records and config.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Reach => "reach",
            MetricKind::Views => "views",
            MetricKind::Engagement => "engagement",
            MetricKind::Clicks => "clicks",
            MetricKind::Leads => "leads",
            MetricKind::Conversions => "conversions",
        }
    }

    /// Short label for buttons and column headers.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Reach => "Reach",
            MetricKind::Views => "Views",
            MetricKind::Engagement => "Engagement",
            MetricKind::Clicks => "Clicks",
            MetricKind::Leads => "Leads",
            MetricKind::Conversions => "Conversions",
        }
    }

    /// Column label in exported files.
    pub fn export_label(&self) -> &'static str {
        match self {
            MetricKind::Reach => "Total Reach",
            MetricKind::Views => "Total Views",
            MetricKind::Engagement => "Engagements",
            MetricKind::Clicks => "Clicks",
            MetricKind::Leads => "Leads",
            MetricKind::Conversions => "Conversions",
        }
    }

    /// Title of the KPI card.
    pub fn kpi_title(&self) -> &'static str {
        match self {
            MetricKind::Reach => "Total Reach",
            MetricKind::Views => "Total Views",
            other => other.label(),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MetricKind::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// One observation of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub platform: PlatformId,
    pub account: String,
    pub date: NaiveDate,
    pub metric: MetricKind,
    pub value: f64,
}

/// Per-metric totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub reach: u64,
    pub views: u64,
    pub engagement: u64,
    pub clicks: u64,
    pub leads: u64,
    pub conversions: u64,
}

impl MetricTotals {
    /// Value of a single metric.
    pub fn get(&self, metric: MetricKind) -> u64 {
        match metric {
            MetricKind::Reach => self.reach,
            MetricKind::Views => self.views,
            MetricKind::Engagement => self.engagement,
            MetricKind::Clicks => self.clicks,
            MetricKind::Leads => self.leads,
            MetricKind::Conversions => self.conversions,
        }
    }

    fn slot(&mut self, metric: MetricKind) -> &mut u64 {
        match metric {
            MetricKind::Reach => &mut self.reach,
            MetricKind::Views => &mut self.views,
            MetricKind::Engagement => &mut self.engagement,
            MetricKind::Clicks => &mut self.clicks,
            MetricKind::Leads => &mut self.leads,
            MetricKind::Conversions => &mut self.conversions,
        }
    }

    /// Builder method to set one metric.
    pub fn with(mut self, metric: MetricKind, value: u64) -> Self {
        *self.slot(metric) = value;
        self
    }

    /// Add another set of totals into this one, saturating at `u64::MAX`.
    pub fn accumulate(&mut self, other: &MetricTotals) {
        for metric in MetricKind::ALL {
            let slot = self.slot(metric);
            *slot = slot.saturating_add(other.get(metric));
        }
    }
}

/// One data-table row: all metrics for an account on a platform on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Unique identifier (derived from platform + account + date)
    pub id: RecordId,

    pub date: NaiveDate,

    pub platform: PlatformId,

    /// Account name or handle (e.g., "@company")
    pub account: String,

    #[serde(flatten)]
    pub totals: MetricTotals,
}

impl MetricRecord {
    /// Create a new MetricRecord with auto-generated ID.
    pub fn new(date: NaiveDate, platform: PlatformId, account: String, totals: MetricTotals) -> Self {
        let id = EntityId::generate(&[platform.id(), &account, &date.to_string()]);
        Self {
            id,
            date,
            platform,
            account,
            totals,
        }
    }

    /// Value of a single metric.
    pub fn value(&self, metric: MetricKind) -> u64 {
        self.totals.get(metric)
    }

    /// Expand into one point per metric.
    pub fn points(&self) -> Vec<MetricPoint> {
        MetricKind::ALL
            .into_iter()
            .map(|metric| MetricPoint {
                platform: self.platform,
                account: self.account.clone(),
                date: self.date,
                metric,
                value: self.value(metric) as f64,
            })
            .collect()
    }
}

/// Inclusive calendar date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The interval covering every representable date.
    pub fn unbounded() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    /// The `days`-long window ending on `to` (inclusive).
    pub fn last_days(to: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        let from = to
            .checked_sub_signed(chrono::Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self::new(from, to)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// The window of the same length ending the day before this one starts.
    pub fn previous(&self) -> Self {
        let len = self.len_days().max(1);
        let to = self.from.pred_opt().unwrap_or(NaiveDate::MIN);
        let from = to
            .checked_sub_signed(chrono::Duration::days(len - 1))
            .unwrap_or(NaiveDate::MIN);
        Self::new(from, to)
    }
}
