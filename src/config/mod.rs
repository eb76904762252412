//! Configuration loading and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calculate::Granularity;
use crate::export::ExportFormat;
use crate::models::{MetricKind, PlatformId};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Initial dashboard selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Length of the default date window, ending on the reference date
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Fixed "today" for the date window; the system clock when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,

    #[serde(default = "default_metric")]
    pub default_metric: MetricKind,

    /// Platforms selected on start; empty selects all
    #[serde(default = "default_platforms")]
    pub default_platforms: Vec<PlatformId>,

    /// Bucket width for comparison cards and trend series
    #[serde(default)]
    pub comparison_period: Granularity,
}

fn default_window_days() -> u32 {
    30
}

fn default_metric() -> MetricKind {
    MetricKind::Views
}

fn default_platforms() -> Vec<PlatformId> {
    vec![
        PlatformId::Twitter,
        PlatformId::Instagram,
        PlatformId::YouTube,
    ]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            reference_date: None,
            default_metric: default_metric(),
            default_platforms: default_platforms(),
            comparison_period: Granularity::default(),
        }
    }
}

/// Thresholds for derived performance alerts, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// A fall of at least this much raises a danger alert
    #[serde(default = "default_drop_threshold")]
    pub drop_threshold: f64,

    /// A rise of at least this much raises a success alert
    #[serde(default = "default_surge_threshold")]
    pub surge_threshold: f64,
}

fn default_drop_threshold() -> f64 {
    20.0
}

fn default_surge_threshold() -> f64 {
    20.0
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            drop_threshold: default_drop_threshold(),
            surge_threshold: default_surge_threshold(),
        }
    }
}

/// Report export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,

    #[serde(default = "default_export_metrics")]
    pub metrics: Vec<MetricKind>,

    /// File name without extension
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_export_metrics() -> Vec<MetricKind> {
    vec![MetricKind::Reach, MetricKind::Views, MetricKind::Engagement]
}

fn default_file_name() -> String {
    "social-media-report".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            metrics: default_export_metrics(),
            file_name: default_file_name(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub alerts: AlertConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            dashboard: DashboardConfig::default(),
            alerts: AlertConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.window_days == 0 {
            return Err(ConfigError::ValidationError(
                "Dashboard window must be at least 1 day".to_string(),
            ));
        }

        for (name, value) in [
            ("drop_threshold", self.alerts.drop_threshold),
            ("surge_threshold", self.alerts.surge_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "Alert {} must be a positive percentage",
                    name
                )));
            }
        }

        if self.export.metrics.is_empty() {
            return Err(ConfigError::ValidationError(
                "Export needs at least one metric".to_string(),
            ));
        }

        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Export file name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
