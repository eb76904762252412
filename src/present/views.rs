//! View models for each dashboard widget.
//!
//! Every value a widget shows is computed here; renderers only lay it out.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::DashboardState;
use crate::calculate::{
    bucket_series, distribution, filter, format_change, format_change_magnitude, format_date,
    format_metric, format_short_date, format_thousands, rank, ComparisonResult, Direction,
    FilterCriteria, SeriesPoint,
};
use crate::models::{MetricKind, MetricPoint, MetricRecord, MetricTotals, PlatformId, TeamMember};

pub const EMPTY_TABLE_MESSAGE: &str = "No data found for the selected criteria.";

/// One KPI tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub metric: MetricKind,
    pub title: String,
    pub value: f64,
    /// Abbreviated value, e.g. `2.4M`
    pub display: String,
    pub change_percent: f64,
    /// Signed badge, e.g. `+12.5%`
    pub change_label: String,
    pub direction: Direction,
    pub subtitle: String,
}

/// Totals of each metric in the selected window and the window before it.
pub fn kpi_cards(records: &[MetricRecord], state: &DashboardState) -> Vec<KpiCard> {
    let current = totals(records, &state.criteria());
    let previous = totals(
        records,
        &state.criteria().within(state.date_range.previous()),
    );

    MetricKind::ALL
        .into_iter()
        .map(|metric| {
            let value = current.get(metric) as f64;
            let comparison = ComparisonResult::new(value, previous.get(metric) as f64);
            KpiCard {
                metric,
                title: metric.kpi_title().to_string(),
                value,
                display: format_metric(value),
                change_percent: comparison.change_percent,
                change_label: format_change(comparison.change_percent),
                direction: comparison.direction,
                subtitle: "vs. previous period".to_string(),
            }
        })
        .collect()
}

fn totals(records: &[MetricRecord], criteria: &FilterCriteria) -> MetricTotals {
    let mut totals = MetricTotals::default();
    for record in filter(records, criteria) {
        totals.accumulate(&record.totals);
    }
    totals
}

/// Period-over-period card for one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCard {
    pub platform: PlatformId,
    pub label: String,
    pub color: String,
    pub metric: MetricKind,
    pub period: String,
    pub previous_period: String,
    pub comparison: ComparisonResult,
    pub change_label: String,
    /// Unsigned change, shown beside the direction arrow
    pub magnitude_label: String,
    /// Progress bar fill in percent, `min(|change| * 2, 100)`
    pub bar_width: f64,
}

/// Compare the bucket holding the end of the window with the bucket before it.
pub fn comparison_cards(records: &[MetricRecord], state: &DashboardState) -> Vec<ComparisonCard> {
    let granularity = state.comparison_period;
    let metric = state.selected_metric;

    let current_start = granularity.bucket_start(state.date_range.to);
    let previous_start = current_start
        .pred_opt()
        .map(|d| granularity.bucket_start(d))
        .unwrap_or(current_start);

    let criteria = FilterCriteria::default()
        .with_platforms(state.platforms())
        .with_search(state.search_text.clone());
    let points = points_of(records, &criteria);
    let series = bucket_series(&points, metric, granularity);

    let bucket_value = |start: NaiveDate, platform: PlatformId| -> f64 {
        series
            .iter()
            .find(|bucket| bucket.start == start)
            .and_then(|bucket| bucket.values.get(platform.id()).copied())
            .unwrap_or(0.0)
    };

    state
        .platforms()
        .into_iter()
        .map(|platform| {
            let comparison = ComparisonResult::new(
                bucket_value(current_start, platform),
                bucket_value(previous_start, platform),
            );
            ComparisonCard {
                platform,
                label: platform.label().to_string(),
                color: platform.color().to_string(),
                metric,
                period: granularity.label(current_start),
                previous_period: granularity.label(previous_start),
                comparison,
                change_label: format_change(comparison.change_percent),
                magnitude_label: format_change_magnitude(comparison.change_percent),
                bar_width: (comparison.change_percent.abs() * 2.0).min(100.0),
            }
        })
        .collect()
}

fn points_of(records: &[MetricRecord], criteria: &FilterCriteria) -> Vec<MetricPoint> {
    filter(records, criteria)
        .into_iter()
        .flat_map(MetricRecord::points)
        .collect()
}

/// A data-table row, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: String,
    pub platform: String,
    pub color: String,
    pub account: String,
    pub reach: String,
    pub views: String,
    pub engagement: String,
    pub clicks: String,
    pub leads: String,
    pub conversions: String,
}

impl From<&MetricRecord> for TableRow {
    fn from(record: &MetricRecord) -> Self {
        let abbreviated = |metric| format_metric(record.value(metric) as f64);
        Self {
            date: format_date(record.date),
            platform: record.platform.label().to_string(),
            color: record.platform.color().to_string(),
            account: record.account.clone(),
            reach: abbreviated(MetricKind::Reach),
            views: abbreviated(MetricKind::Views),
            engagement: abbreviated(MetricKind::Engagement),
            clicks: abbreviated(MetricKind::Clicks),
            leads: record.totals.leads.to_string(),
            conversions: record.totals.conversions.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub shown: usize,
    pub total: usize,
    pub empty_message: Option<String>,
    /// `Showing 2 of 5 entries`
    pub summary: String,
    /// `Filtered by: 2 platforms, Jan 01 - Jan 31`
    pub filters: String,
}

pub fn table_view(records: &[MetricRecord], state: &DashboardState) -> TableView {
    let rows: Vec<TableRow> = filter(records, &state.criteria())
        .into_iter()
        .map(TableRow::from)
        .collect();
    let shown = rows.len();
    let total = records.len();

    TableView {
        empty_message: (shown == 0).then(|| EMPTY_TABLE_MESSAGE.to_string()),
        summary: format!("Showing {} of {} entries", shown, total),
        filters: format!(
            "Filtered by: {} platforms, {} - {}",
            state.platforms().len(),
            format_short_date(state.date_range.from),
            format_short_date(state.date_range.to)
        ),
        rows,
        shown,
        total,
    }
}

/// One slice of the platform distribution pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub platform: PlatformId,
    pub label: String,
    pub color: String,
    pub value: f64,
    pub display: String,
    pub share_percent: f64,
}

pub fn distribution_slices(
    records: &[MetricRecord],
    state: &DashboardState,
) -> Vec<DistributionSlice> {
    let series = trend_series(records, state);
    distribution(&series, &state.platforms())
        .into_iter()
        .map(|share| DistributionSlice {
            platform: share.platform,
            label: share.platform.label().to_string(),
            color: share.platform.color().to_string(),
            value: share.total,
            display: format_metric(share.total),
            share_percent: share.share_percent,
        })
        .collect()
}

/// The selected metric over the selected window, bucketed per platform.
pub fn trend_series(records: &[MetricRecord], state: &DashboardState) -> Vec<SeriesPoint> {
    let points = points_of(records, &state.criteria());
    let series = bucket_series(&points, state.selected_metric, state.comparison_period);
    debug!(
        "Trend for {} has {} buckets",
        state.selected_metric,
        series.len()
    );
    series
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub initials: String,
    pub role: String,
    pub accounts_managed: u32,
    pub value: u64,
    /// Value with thousands separators, e.g. `850,000`
    pub display: String,
    /// Signed change vs the previous period, e.g. `+25.4%`
    pub performance: String,
    pub direction: Direction,
}

/// Team members ranked by `metric`, highest first.
pub fn leaderboard(team: &[TeamMember], metric: MetricKind) -> Vec<LeaderboardRow> {
    rank(team, |member| member.metric(metric) as f64)
        .into_iter()
        .map(|ranked| {
            let member = ranked.entity;
            let value = member.metric(metric);
            let comparison =
                ComparisonResult::new(value as f64, member.previous.get(metric) as f64);
            LeaderboardRow {
                rank: ranked.rank,
                name: member.name.clone(),
                initials: member.initials(),
                role: member.role.clone(),
                accounts_managed: member.accounts_managed,
                value,
                display: format_thousands(i64::try_from(value).unwrap_or(i64::MAX)),
                performance: format_change(comparison.change_percent),
                direction: comparison.direction,
            }
        })
        .collect()
}
