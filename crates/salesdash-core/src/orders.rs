use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Segment assigned to orders whose `customer_segment` is missing.
pub const DEFAULT_CUSTOMER_SEGMENT: &str = "Mid Value Customers";

/// Category label for orders whose `product_category_name_english` is missing.
pub const UNKNOWN_PRODUCT_CATEGORY: &str = "unknown";

/// One row of the pre-joined orders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_city: String,
    pub customer_segment: Option<String>,
    pub order_purchase_timestamp: NaiveDateTime,
    pub total_price: Decimal,
    pub review_score: Option<Decimal>,
    pub product_category_name_english: String,
}

impl OrderRecord {
    /// Calendar date of the purchase, time of day dropped.
    #[must_use]
    pub fn order_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

/// The orders table, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    /// Wrap already-parsed records. No segment fill is applied here.
    #[must_use]
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Assign [`DEFAULT_CUSTOMER_SEGMENT`] to every order without a segment.
    ///
    /// Returns the number of orders that were filled; a second call returns 0
    /// and leaves the dataset unchanged.
    pub fn fill_missing_segments(&mut self) -> usize {
        let mut filled = 0;
        for record in &mut self.records {
            if record.customer_segment.is_none() {
                record.customer_segment = Some(DEFAULT_CUSTOMER_SEGMENT.to_string());
                filled += 1;
            }
        }
        filled
    }

    /// Distinct cities in first-appearance order.
    #[must_use]
    pub fn cities(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.customer_city.as_str()))
    }

    /// Distinct segments in first-appearance order. Missing segments are skipped.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .filter_map(|r| r.customer_segment.as_deref()),
        )
    }

    /// Earliest and latest purchase timestamps, or `None` for an empty dataset.
    #[must_use]
    pub fn timestamp_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut iter = self.records.iter().map(|r| r.order_purchase_timestamp);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(ToOwned::to_owned)
        .collect()
}
