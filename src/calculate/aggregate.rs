//! Sums over series and chronological bucketing of points.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{MetricKind, MetricPoint, MetricRecord, PlatformId};

/// A record whose numeric fields can be looked up by name.
pub trait NumericFields {
    /// The numeric value of `key`, if present and numeric.
    fn numeric_field(&self, key: &str) -> Option<f64>;
}

impl NumericFields for serde_json::Map<String, serde_json::Value> {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(serde_json::Value::as_f64)
    }
}

impl NumericFields for serde_json::Value {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(serde_json::Value::as_f64)
    }
}

impl NumericFields for BTreeMap<String, f64> {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl NumericFields for MetricRecord {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        key.parse::<MetricKind>()
            .ok()
            .map(|metric| self.value(metric) as f64)
    }
}

impl<T: NumericFields + ?Sized> NumericFields for &T {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        (**self).numeric_field(key)
    }
}

/// Sum the field `key` across all records.
///
/// Missing, non-numeric and non-finite values count as zero.
pub fn sum_by_key<R: NumericFields>(series: &[R], key: &str) -> f64 {
    series
        .iter()
        .filter_map(|record| record.numeric_field(key))
        .filter(|value| value.is_finite())
        .sum()
}

/// Bucket width for trend and comparison series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Monday-based weeks
    Week,
    #[default]
    Month,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Week => date
                .checked_sub_signed(Duration::days(i64::from(
                    date.weekday().num_days_from_monday(),
                )))
                .unwrap_or(date),
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Axis label for a bucket.
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Week => format!("Week of {}", start.format("%b %d")),
            Granularity::Month => start.format("%b %Y").to_string(),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

/// One bucket of a time series: platform id → summed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    pub start: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

impl NumericFields for SeriesPoint {
    fn numeric_field(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Sum the points of one metric into chronological buckets keyed by platform.
///
/// Platforms with no points in a bucket are absent from that bucket.
pub fn bucket_series(
    points: &[MetricPoint],
    metric: MetricKind,
    granularity: Granularity,
) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();

    for point in points.iter().filter(|p| p.metric == metric) {
        let start = granularity.bucket_start(point.date);
        *buckets
            .entry(start)
            .or_default()
            .entry(point.platform.id().to_string())
            .or_default() += point.value;
    }

    buckets
        .into_iter()
        .map(|(start, values)| SeriesPoint {
            period: granularity.label(start),
            start,
            values,
        })
        .collect()
}

/// One platform's part of a series total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    pub platform: PlatformId,
    pub total: f64,
    /// Percent of the combined total; zero when the combined total is zero
    pub share_percent: f64,
}

/// Per-platform totals of a bucketed series and each platform's share.
///
/// Shares are returned in the order of `platforms`.
pub fn distribution(series: &[SeriesPoint], platforms: &[PlatformId]) -> Vec<PlatformShare> {
    let totals: Vec<(PlatformId, f64)> = platforms
        .iter()
        .map(|platform| (*platform, sum_by_key(series, platform.id())))
        .collect();
    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    totals
        .into_iter()
        .map(|(platform, total)| PlatformShare {
            platform,
            total,
            share_percent: if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricTotals, PlatformId};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sum_by_key_missing_field_is_zero() {
        let series = vec![json!({"reach": 10}), json!({"reach": 20}), json!({})];
        assert_eq!(sum_by_key(&series, "reach"), 30.0);
    }

    #[test]
    fn test_sum_by_key_non_numeric_is_zero() {
        let series = vec![
            json!({"reach": 5}),
            json!({"reach": "lots"}),
            json!({"reach": null}),
            json!({"reach": 2.5}),
        ];
        assert_eq!(sum_by_key(&series, "reach"), 7.5);
    }

    #[test]
    fn test_sum_by_key_empty_series() {
        let series: Vec<serde_json::Value> = Vec::new();
        assert_eq!(sum_by_key(&series, "reach"), 0.0);
    }

    #[test]
    fn test_sum_by_key_skips_non_finite() {
        let mut a = BTreeMap::new();
        a.insert("views".to_string(), f64::INFINITY);
        let mut b = BTreeMap::new();
        b.insert("views".to_string(), 4.0);
        assert_eq!(sum_by_key(&[a, b], "views"), 4.0);
    }

    #[test]
    fn test_sum_by_key_records() {
        let records = vec![
            MetricRecord::new(
                date(2024, 1, 15),
                PlatformId::Twitter,
                "@company".to_string(),
                MetricTotals::default().with(MetricKind::Clicks, 450),
            ),
            MetricRecord::new(
                date(2024, 1, 15),
                PlatformId::Instagram,
                "@company_insta".to_string(),
                MetricTotals::default().with(MetricKind::Clicks, 780),
            ),
        ];
        assert_eq!(sum_by_key(&records, "clicks"), 1230.0);
        assert_eq!(sum_by_key(&records, "followers"), 0.0);
    }

    fn point(platform: PlatformId, date: NaiveDate, metric: MetricKind, value: f64) -> MetricPoint {
        MetricPoint {
            platform,
            account: "acct".to_string(),
            date,
            metric,
            value,
        }
    }

    #[test]
    fn test_bucket_series_monthly() {
        let points = vec![
            point(PlatformId::Twitter, date(2024, 2, 3), MetricKind::Views, 100.0),
            point(PlatformId::Twitter, date(2024, 1, 20), MetricKind::Views, 40.0),
            point(PlatformId::Twitter, date(2024, 1, 2), MetricKind::Views, 60.0),
            point(PlatformId::Reddit, date(2024, 1, 9), MetricKind::Views, 7.0),
            point(PlatformId::Twitter, date(2024, 1, 9), MetricKind::Reach, 999.0),
        ];

        let series = bucket_series(&points, MetricKind::Views, Granularity::Month);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period, "Jan 2024");
        assert_eq!(series[0].values["twitter"], 100.0);
        assert_eq!(series[0].values["reddit"], 7.0);
        assert_eq!(series[1].period, "Feb 2024");
        assert!(!series[1].values.contains_key("reddit"));

        assert_eq!(sum_by_key(&series, "twitter"), 200.0);
        assert_eq!(sum_by_key(&series, "reddit"), 7.0);
    }

    #[test]
    fn test_bucket_series_weekly_starts_monday() {
        // 2024-01-17 is a Wednesday
        assert_eq!(
            Granularity::Week.bucket_start(date(2024, 1, 17)),
            date(2024, 1, 15)
        );
        assert_eq!(Granularity::Week.label(date(2024, 1, 15)), "Week of Jan 15");

        let points = vec![
            point(PlatformId::Medium, date(2024, 1, 15), MetricKind::Leads, 1.0),
            point(PlatformId::Medium, date(2024, 1, 21), MetricKind::Leads, 2.0),
            point(PlatformId::Medium, date(2024, 1, 22), MetricKind::Leads, 4.0),
        ];
        let series = bucket_series(&points, MetricKind::Leads, Granularity::Week);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].values["medium"], 3.0);
        assert_eq!(series[1].values["medium"], 4.0);
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("week".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!("Monthly".parse::<Granularity>(), Ok(Granularity::Month));
        assert!("quarter".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_distribution_shares() {
        let points = vec![
            point(PlatformId::Twitter, date(2024, 1, 5), MetricKind::Reach, 300.0),
            point(PlatformId::YouTube, date(2024, 1, 5), MetricKind::Reach, 100.0),
            point(PlatformId::Twitter, date(2024, 2, 5), MetricKind::Reach, 100.0),
        ];
        let series = bucket_series(&points, MetricKind::Reach, Granularity::Month);

        let slices = distribution(
            &series,
            &[PlatformId::Twitter, PlatformId::YouTube, PlatformId::Reddit],
        );
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].total, 400.0);
        assert_eq!(slices[0].share_percent, 80.0);
        assert_eq!(slices[1].share_percent, 20.0);
        assert_eq!(slices[2].total, 0.0);
    }

    #[test]
    fn test_distribution_empty_series() {
        let slices = distribution(&[], &[PlatformId::Medium]);
        assert_eq!(slices[0].share_percent, 0.0);
    }
}
