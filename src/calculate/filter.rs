//! Row filtering by platform, search text and date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{DateRange, MetricPoint, MetricRecord, PlatformId};

/// Anything that can be filtered like a data-table row.
pub trait Filterable {
    fn platform(&self) -> PlatformId;
    fn account(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

impl Filterable for MetricRecord {
    fn platform(&self) -> PlatformId {
        self.platform
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Filterable for MetricPoint {
    fn platform(&self) -> PlatformId {
        self.platform
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn platform(&self) -> PlatformId {
        (**self).platform()
    }

    fn account(&self) -> &str {
        (**self).account()
    }

    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// Query built from the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Platforms to keep; empty keeps every platform
    pub platforms: BTreeSet<PlatformId>,

    /// Case-insensitive substring of the platform label or account; empty matches all
    pub search_text: String,

    /// Inclusive lower bound
    pub date_from: NaiveDate,

    /// Inclusive upper bound
    pub date_to: NaiveDate,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        let range = DateRange::unbounded();
        Self {
            platforms: BTreeSet::new(),
            search_text: String::new(),
            date_from: range.from,
            date_to: range.to,
        }
    }
}

impl FilterCriteria {
    /// Builder method to restrict platforms.
    pub fn with_platforms<I: IntoIterator<Item = PlatformId>>(mut self, platforms: I) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    /// Builder method to set the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Builder method to set the date interval.
    pub fn within(mut self, range: DateRange) -> Self {
        self.date_from = range.from;
        self.date_to = range.to;
        self
    }

    /// Whether a single row passes every condition.
    pub fn matches<R: Filterable + ?Sized>(&self, row: &R) -> bool {
        let platform = row.platform();

        let platform_ok = self.platforms.is_empty() || self.platforms.contains(&platform);

        let search_ok = self.search_text.is_empty() || {
            let needle = self.search_text.to_lowercase();
            platform.label().to_lowercase().contains(&needle)
                || row.account().to_lowercase().contains(&needle)
        };

        let date = row.date();
        let date_ok = date >= self.date_from && date <= self.date_to;

        platform_ok && search_ok && date_ok
    }
}

/// Keep the rows matching `criteria`, in input order.
pub fn filter<R, I>(rows: I, criteria: &FilterCriteria) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Filterable,
{
    rows.into_iter().filter(|row| criteria.matches(row)).collect()
}
