//! Data-entry validation.
//!
//! Form input arrives as loosely-typed strings. Everything is checked here,
//! once, so the derivation code downstream can assume well-formed records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{MetricKind, MetricRecord, MetricTotals, PlatformId};

/// A rejected entry, naming the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: String },

    #[error("unknown platform '{value}'")]
    UnknownPlatform { value: String },

    #[error("{field}: '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    #[error("{field}: '{value}' is not a whole number")]
    InvalidNumber { field: String, value: String },

    #[error("{field}: {value} must not be negative")]
    Negative { field: String, value: String },

    #[error("id '{value}' does not match platform, account and date")]
    StaleId { value: String },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::InvalidDate { field, .. }
            | ValidationError::InvalidNumber { field, .. }
            | ValidationError::Negative { field, .. } => field,
            ValidationError::UnknownPlatform { .. } => "platform",
            ValidationError::StaleId { .. } => "id",
        }
    }
}

/// Raw data-entry form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub platform: String,
    pub account: String,
    pub date: String,
    #[serde(default)]
    pub reach: String,
    #[serde(default)]
    pub views: String,
    #[serde(default)]
    pub engagement: String,
    #[serde(default)]
    pub clicks: String,
    #[serde(default)]
    pub leads: String,
    #[serde(default)]
    pub conversions: String,
}

impl RawEntry {
    fn metric_input(&self, metric: MetricKind) -> &str {
        match metric {
            MetricKind::Reach => &self.reach,
            MetricKind::Views => &self.views,
            MetricKind::Engagement => &self.engagement,
            MetricKind::Clicks => &self.clicks,
            MetricKind::Leads => &self.leads,
            MetricKind::Conversions => &self.conversions,
        }
    }
}

/// Validate a form submission into a record.
pub fn validate_entry(entry: &RawEntry) -> Result<MetricRecord, ValidationError> {
    let platform_input = entry.platform.trim();
    if platform_input.is_empty() {
        return Err(ValidationError::Missing {
            field: "platform".to_string(),
        });
    }
    let platform: PlatformId =
        platform_input
            .parse()
            .map_err(|_| ValidationError::UnknownPlatform {
                value: platform_input.to_string(),
            })?;

    let account = entry.account.trim();
    if account.is_empty() {
        return Err(ValidationError::Missing {
            field: "account".to_string(),
        });
    }

    let date = parse_date("date", &entry.date)?;

    let mut totals = MetricTotals::default();
    for metric in MetricKind::ALL {
        let value = parse_count(metric.key(), entry.metric_input(metric))?;
        totals = totals.with(metric, value);
    }

    let record = MetricRecord::new(date, platform, account.to_string(), totals);
    debug!("Validated entry {} for {} on {}", record.id, platform, date);
    Ok(record)
}

/// Check a record read back from storage rather than entered through the form.
///
/// Stored ids must still match the platform, account and date they were derived from.
pub fn validate_record(record: &MetricRecord) -> Result<(), ValidationError> {
    if record.account.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "account".to_string(),
        });
    }

    let expected = MetricRecord::new(
        record.date,
        record.platform,
        record.account.clone(),
        MetricTotals::default(),
    );
    if expected.id != record.id {
        return Err(ValidationError::StaleId {
            value: record.id.to_string(),
        });
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: field.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        value: trimmed.to_string(),
    })
}

/// Parse a non-negative whole count. `"1200"` and `"1200.0"` are accepted.
fn parse_count(field: &str, input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: field.to_string(),
        });
    }

    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        value: trimmed.to_string(),
    };

    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(n);
    }

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }
    if value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RawEntry {
        RawEntry {
            platform: "twitter".to_string(),
            account: "@company".to_string(),
            date: "2024-01-15".to_string(),
            reach: "45000".to_string(),
            views: "23000".to_string(),
            engagement: "1200".to_string(),
            clicks: "450".to_string(),
            leads: "12".to_string(),
            conversions: "3".to_string(),
        }
    }

    #[test]
    fn test_validate_entry_ok() {
        let record = validate_entry(&entry()).unwrap();
        assert_eq!(record.platform, PlatformId::Twitter);
        assert_eq!(record.account, "@company");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(record.totals.reach, 45000);
        assert_eq!(record.totals.conversions, 3);
    }

    #[test]
    fn test_validate_entry_accepts_label_and_whitespace() {
        let mut e = entry();
        e.platform = " LinkedIn ".to_string();
        e.account = "  Company Page ".to_string();
        e.views = " 12000.0 ".to_string();

        let record = validate_entry(&e).unwrap();
        assert_eq!(record.platform, PlatformId::LinkedIn);
        assert_eq!(record.account, "Company Page");
        assert_eq!(record.totals.views, 12000);
    }

    #[test]
    fn test_validate_entry_unknown_platform() {
        let mut e = entry();
        e.platform = "friendster".to_string();
        let err = validate_entry(&e).unwrap_err();
        assert_eq!(err.field(), "platform");
        assert!(matches!(err, ValidationError::UnknownPlatform { .. }));
    }

    #[test]
    fn test_validate_entry_missing_fields() {
        let mut e = entry();
        e.account = "   ".to_string();
        assert_eq!(validate_entry(&e).unwrap_err().field(), "account");

        let mut e = entry();
        e.leads = String::new();
        let err = validate_entry(&e).unwrap_err();
        assert_eq!(err.field(), "leads");
        assert_eq!(err.to_string(), "leads is required");
    }

    #[test]
    fn test_validate_entry_bad_numbers() {
        let mut e = entry();
        e.reach = "NaN".to_string();
        assert!(matches!(
            validate_entry(&e).unwrap_err(),
            ValidationError::InvalidNumber { ref field, .. } if field == "reach"
        ));

        let mut e = entry();
        e.clicks = "-4".to_string();
        assert!(matches!(
            validate_entry(&e).unwrap_err(),
            ValidationError::Negative { ref field, .. } if field == "clicks"
        ));

        let mut e = entry();
        e.engagement = "12.5".to_string();
        assert_eq!(validate_entry(&e).unwrap_err().field(), "engagement");

        let mut e = entry();
        e.views = "lots".to_string();
        assert_eq!(validate_entry(&e).unwrap_err().field(), "views");
    }

    #[test]
    fn test_validate_entry_bad_date() {
        let mut e = entry();
        e.date = "2024-02-30".to_string();
        let err = validate_entry(&e).unwrap_err();
        assert_eq!(err.field(), "date");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn test_validate_record() {
        let mut record = validate_entry(&entry()).unwrap();
        assert_eq!(validate_record(&record), Ok(()));

        record.account = "@other".to_string();
        let err = validate_record(&record).unwrap_err();
        assert_eq!(err.field(), "id");
        assert!(matches!(err, ValidationError::StaleId { .. }));

        record.account = "  ".to_string();
        assert_eq!(validate_record(&record).unwrap_err().field(), "account");
    }

    #[test]
    fn test_raw_entry_deserialize_defaults() {
        let json = r#"{"platform":"medium","account":"@company-blog","date":"2024-01-13"}"#;
        let e: RawEntry = serde_json::from_str(json).unwrap();
        assert!(e.reach.is_empty());
        assert_eq!(validate_entry(&e).unwrap_err().field(), "reach");
    }
}
