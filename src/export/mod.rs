//! Report export.
//!
//! Only CSV is produced. The other formats are accepted by the request
//! model but rendering them reports [`ExportError::Unsupported`].

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::calculate::FilterCriteria;
use crate::models::{DateRange, MetricKind, MetricRecord, PlatformId};

/// Export errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("{0} export is not supported yet")]
    Unsupported(ExportFormat),

    #[error("Select at least one metric to export")]
    NoMetrics,

    #[error("Select at least one platform to export")]
    NoPlatforms,

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Unknown date range preset: {0}")]
    UnknownPreset(String),
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Excel => write!(f, "EXCEL"),
            ExportFormat::Pdf => write!(f, "PDF"),
            ExportFormat::Png => write!(f, "PNG"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Named date windows offered by the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePreset {
    Last7Days,
    Last30Days,
    Last90Days,
    ThisMonth,
    LastMonth,
    Custom(DateRange),
}

impl DateRangePreset {
    /// Concrete interval relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            DateRangePreset::Last7Days => DateRange::last_days(today, 7),
            DateRangePreset::Last30Days => DateRange::last_days(today, 30),
            DateRangePreset::Last90Days => DateRange::last_days(today, 90),
            DateRangePreset::ThisMonth => DateRange::new(month_start(today), today),
            DateRangePreset::LastMonth => {
                let end = month_start(today)
                    .checked_sub_signed(Duration::days(1))
                    .unwrap_or(NaiveDate::MIN);
                DateRange::new(month_start(end), end)
            }
            DateRangePreset::Custom(range) => *range,
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl FromStr for DateRangePreset {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last7days" => Ok(DateRangePreset::Last7Days),
            "last30days" => Ok(DateRangePreset::Last30Days),
            "last90days" => Ok(DateRangePreset::Last90Days),
            "thismonth" => Ok(DateRangePreset::ThisMonth),
            "lastmonth" => Ok(DateRangePreset::LastMonth),
            other => Err(ExportError::UnknownPreset(other.to_string())),
        }
    }
}

/// Everything chosen in the export dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub metrics: Vec<MetricKind>,
    pub platforms: Vec<PlatformId>,
    pub range: DateRange,
    /// File name without extension
    pub file_name: String,
}

impl ExportRequest {
    /// File name with the format's extension.
    pub fn output_name(&self) -> String {
        format!("{}.{}", self.file_name, self.format.extension())
    }

    /// One-line description shown when an export starts.
    pub fn summary(&self) -> String {
        format!(
            "Exporting {} file with {} metrics for {} platforms",
            self.format,
            self.metrics.len(),
            self.platforms.len()
        )
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_platforms(self.platforms.iter().copied())
            .within(self.range)
    }
}

/// Render the records matching `request` as a report.
pub fn render(request: &ExportRequest, records: &[MetricRecord]) -> Result<String, ExportError> {
    if request.metrics.is_empty() {
        return Err(ExportError::NoMetrics);
    }
    if request.platforms.is_empty() {
        return Err(ExportError::NoPlatforms);
    }

    match request.format {
        ExportFormat::Csv => Ok(render_csv(request, records)),
        other => Err(ExportError::Unsupported(other)),
    }
}

fn render_csv(request: &ExportRequest, records: &[MetricRecord]) -> String {
    let criteria = request.criteria();
    let mut out = String::new();

    let mut header = vec!["Date".to_string(), "Platform".to_string()];
    header.extend(request.metrics.iter().map(|m| m.export_label().to_string()));
    push_line(&mut out, &header);

    let mut rows = 0;
    for record in records.iter().filter(|r| criteria.matches(*r)) {
        let mut fields = vec![
            record.date.format("%Y-%m-%d").to_string(),
            record.platform.label().to_string(),
        ];
        fields.extend(request.metrics.iter().map(|m| record.value(*m).to_string()));
        push_line(&mut out, &fields);
        rows += 1;
    }

    debug!("Rendered {} CSV rows", rows);
    out
}

fn push_line(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quote a field only when it contains a comma, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
