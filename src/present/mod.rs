//! Presentation adapter.
//!
//! Binds the calculation engine to a data source and the current selection,
//! producing one view model per dashboard widget:
//! - KPI cards and period comparisons
//! - Data table, distribution and trend
//! - Team leaderboard
//! - Alerts and platform drilldowns

mod alerts;
mod drilldown;
mod views;

pub use alerts::*;
pub use drilldown::*;
pub use views::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculate::{FilterCriteria, Granularity, SeriesPoint};
use crate::config::DashboardConfig;
use crate::models::{Alert, DateRange, MetricKind, PlatformId};
use crate::storage::{MetricsRepository, StorageError};

/// The selection shared by every widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Selected platforms; empty means all
    pub selected_platforms: Vec<PlatformId>,
    pub date_range: DateRange,
    pub search_text: String,
    pub selected_metric: MetricKind,
    pub comparison_period: Granularity,
}

impl DashboardState {
    /// Initial selection from config, with the window ending on `today`.
    pub fn from_config(config: &DashboardConfig, today: NaiveDate) -> Self {
        Self {
            selected_platforms: config.default_platforms.clone(),
            date_range: DateRange::last_days(today, config.window_days),
            search_text: String::new(),
            selected_metric: config.default_metric,
            comparison_period: config.comparison_period,
        }
    }

    /// Selected platforms, or every platform when none are selected.
    pub fn platforms(&self) -> Vec<PlatformId> {
        if self.selected_platforms.is_empty() {
            PlatformId::ALL.to_vec()
        } else {
            self.selected_platforms.clone()
        }
    }

    /// Add or remove a platform from the selection, keeping sidebar order.
    pub fn toggle_platform(&mut self, platform: PlatformId) {
        if let Some(pos) = self.selected_platforms.iter().position(|p| *p == platform) {
            self.selected_platforms.remove(pos);
        } else {
            self.selected_platforms.push(platform);
            self.selected_platforms
                .sort_by_key(|p| PlatformId::ALL.iter().position(|q| q == p));
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_platforms(self.selected_platforms.iter().copied())
            .with_search(self.search_text.clone())
            .within(self.date_range)
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub state: DashboardState,
    pub kpis: Vec<KpiCard>,
    pub comparisons: Vec<ComparisonCard>,
    pub table: TableView,
    pub distribution: Vec<DistributionSlice>,
    pub trend: Vec<SeriesPoint>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub alerts: Vec<Alert>,
}

/// A data source viewed through the current selection.
pub struct Dashboard<R> {
    repo: R,
    state: DashboardState,
    rules: AlertRules,
}

impl<R: MetricsRepository> Dashboard<R> {
    pub fn new(repo: R, state: DashboardState) -> Self {
        Self {
            repo,
            state,
            rules: AlertRules::default(),
        }
    }

    /// Builder method to set alert thresholds.
    pub fn with_alert_rules(mut self, rules: AlertRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn kpis(&self) -> Result<Vec<KpiCard>, StorageError> {
        Ok(kpi_cards(&self.repo.records()?, &self.state))
    }

    pub fn comparisons(&self) -> Result<Vec<ComparisonCard>, StorageError> {
        Ok(comparison_cards(&self.repo.records()?, &self.state))
    }

    pub fn table(&self) -> Result<TableView, StorageError> {
        Ok(table_view(&self.repo.records()?, &self.state))
    }

    pub fn distribution(&self) -> Result<Vec<DistributionSlice>, StorageError> {
        Ok(distribution_slices(&self.repo.records()?, &self.state))
    }

    pub fn trend(&self) -> Result<Vec<SeriesPoint>, StorageError> {
        Ok(trend_series(&self.repo.records()?, &self.state))
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardRow>, StorageError> {
        Ok(leaderboard(&self.repo.team()?, self.state.selected_metric))
    }

    pub fn alerts(&self, now: DateTime<Utc>) -> Result<AlertFeed, StorageError> {
        let comparisons = self.comparisons()?;
        Ok(AlertFeed::new(derive_alerts(&comparisons, &self.rules, now)))
    }

    pub fn drilldown(
        &self,
        platform: PlatformId,
        sort: PostSort,
    ) -> Result<DrilldownView, StorageError> {
        Ok(DrilldownView::build(
            platform,
            self.state.selected_metric,
            sort,
            &self.repo.posts()?,
            &self.repo.campaigns()?,
        ))
    }

    /// Every widget, computed from one read of the repository.
    pub fn view(&self, now: DateTime<Utc>) -> Result<DashboardView, StorageError> {
        let records = self.repo.records()?;
        let team = self.repo.team()?;
        let state = &self.state;

        let comparisons = comparison_cards(&records, state);
        let alerts = derive_alerts(&comparisons, &self.rules, now);

        let view = DashboardView {
            state: state.clone(),
            kpis: kpi_cards(&records, state),
            table: table_view(&records, state),
            distribution: distribution_slices(&records, state),
            trend: trend_series(&records, state),
            leaderboard: leaderboard(&team, state.selected_metric),
            comparisons,
            alerts,
        };

        info!(
            "Built dashboard: {} rows, {} comparisons, {} alerts",
            view.table.shown,
            view.comparisons.len(),
            view.alerts.len()
        );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertKind;
    use crate::sample;
    use crate::storage::{InMemoryRepository, JsonlRepository, StorageConfig};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_state_from_config() {
        let state = DashboardState::from_config(&DashboardConfig::default(), date(2024, 1, 31));
        assert_eq!(state.date_range, DateRange::new(date(2024, 1, 2), date(2024, 1, 31)));
        assert_eq!(state.selected_metric, MetricKind::Views);
        assert_eq!(state.platforms().len(), 3);
    }

    #[test]
    fn test_toggle_platform_keeps_sidebar_order() {
        let mut state = DashboardState::from_config(&DashboardConfig::default(), date(2024, 1, 31));
        state.toggle_platform(PlatformId::Twitter);
        assert_eq!(
            state.selected_platforms,
            vec![PlatformId::Instagram, PlatformId::YouTube]
        );

        state.toggle_platform(PlatformId::Twitter);
        state.toggle_platform(PlatformId::Website);
        state.toggle_platform(PlatformId::LinkedIn);
        assert_eq!(
            state.selected_platforms,
            vec![
                PlatformId::Twitter,
                PlatformId::Instagram,
                PlatformId::YouTube,
                PlatformId::LinkedIn,
                PlatformId::Website,
            ]
        );
    }

    #[test]
    fn test_empty_selection_means_all_platforms() {
        let mut state = DashboardState::from_config(&DashboardConfig::default(), date(2024, 1, 31));
        state.selected_platforms.clear();
        assert_eq!(state.platforms(), PlatformId::ALL.to_vec());
        assert!(state.criteria().platforms.is_empty());
    }

    #[test]
    fn test_dashboard_view_over_sample_history() {
        let config = DashboardConfig {
            window_days: 182,
            ..DashboardConfig::default()
        };
        let state = DashboardState::from_config(&config, date(2024, 6, 30));
        let dashboard = Dashboard::new(
            InMemoryRepository::new(sample::dataset_with_history()),
            state,
        );

        let view = dashboard.view(now()).unwrap();
        assert_eq!(view.kpis.len(), 6);
        assert_eq!(view.comparisons.len(), 3);
        assert_eq!(view.trend.len(), 6);
        assert_eq!(view.distribution.len(), 3);
        assert_eq!(view.leaderboard.len(), 5);
        assert_eq!(view.leaderboard[0].name, "Sarah Johnson");

        // Twitter +26.5% and Instagram -20.8% cross the default 20% thresholds
        let kinds: Vec<_> = view.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AlertKind::Success, AlertKind::Danger]
        );

        assert_eq!(dashboard.kpis().unwrap(), view.kpis);
        assert_eq!(dashboard.table().unwrap(), view.table);
        assert_eq!(dashboard.alerts(now()).unwrap().active().len(), 2);
    }

    #[test]
    fn test_dashboard_over_jsonl_repository() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonlRepository::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        repo.seed(&sample::dataset()).unwrap();

        let mut state = DashboardState::from_config(&DashboardConfig::default(), date(2024, 1, 31));
        state.selected_platforms = vec![PlatformId::Twitter];
        let dashboard = Dashboard::new(repo, state);

        let table = dashboard.table().unwrap();
        assert_eq!(table.shown, 1);
        assert_eq!(table.rows[0].account, "@company");

        let drilldown = dashboard
            .drilldown(PlatformId::Twitter, PostSort::Reach)
            .unwrap();
        assert_eq!(drilldown.posts.len(), 3);
        assert_eq!(drilldown.campaigns.len(), 3);
    }

    #[test]
    fn test_dashboard_with_no_data() {
        let state = DashboardState::from_config(&DashboardConfig::default(), date(2024, 1, 31));
        let dashboard = Dashboard::new(InMemoryRepository::default(), state);

        let view = dashboard.view(now()).unwrap();
        assert!(view.kpis.iter().all(|k| k.value == 0.0 && k.change_percent == 0.0));
        assert_eq!(view.table.empty_message.as_deref(), Some(EMPTY_TABLE_MESSAGE));
        assert!(view.alerts.is_empty());
        assert!(view.leaderboard.is_empty());
    }
}
