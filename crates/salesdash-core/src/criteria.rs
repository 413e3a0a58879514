use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::orders::Dataset;

/// Closed date interval, inclusive on both ends.
///
/// A range with `start > end` is legal and contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Fully resolved filter: every predicate is explicit.
///
/// An empty `cities` or `segments` set matches no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub cities: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new<C, S>(cities: C, segments: S, date_range: DateRange) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            segments: segments.into_iter().map(Into::into).collect(),
            date_range,
        }
    }
}

/// City and segment selections used when a caller does not supply one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDefaults {
    pub cities: Vec<String>,
    pub segments: Vec<String>,
}

impl FilterDefaults {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            cities: config.default_cities.clone(),
            segments: config.default_segments.clone(),
        }
    }
}

/// What a UI hands over: any part may be left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub cities: Option<BTreeSet<String>>,
    pub segments: Option<BTreeSet<String>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FilterSelection {
    /// Fill the gaps from `defaults` and the dataset's date span.
    ///
    /// Absent city/segment lists take the defaults; a present but empty list
    /// stays empty. Absent dates take the earliest/latest order date, or the
    /// widest representable date when the dataset is empty.
    #[must_use]
    pub fn resolve(self, defaults: &FilterDefaults, dataset: &Dataset) -> FilterCriteria {
        let (min_date, max_date) = dataset
            .timestamp_bounds()
            .map_or((NaiveDate::MIN, NaiveDate::MAX), |(lo, hi)| {
                (lo.date(), hi.date())
            });

        FilterCriteria {
            cities: self
                .cities
                .unwrap_or_else(|| defaults.cities.iter().cloned().collect()),
            segments: self
                .segments
                .unwrap_or_else(|| defaults.segments.iter().cloned().collect()),
            date_range: DateRange::new(
                self.start.unwrap_or(min_date),
                self.end.unwrap_or(max_date),
            ),
        }
    }
}
