//! Orders CSV loader.
//!
//! Reads the pre-joined orders table, validates each row into an
//! [`OrderRecord`] and applies the one-time segment fill. Structural problems
//! (unreadable file, missing columns, ragged rows) abort the load; a row with
//! a bad value is rejected on its own and recorded in the [`LoadReport`].

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use salesdash_core::{is_null_token, Dataset, OrderRecord, UNKNOWN_PRODUCT_CATEGORY};

use crate::error::{LoadError, ParseError};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "customer_city",
    "customer_segment",
    "order_purchase_timestamp",
    "total_price",
    "review_score",
    "product_category_name_english",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Largest `total_price` a row may carry. Anything above is a data error and
/// would overflow the sales totals.
const MAX_TOTAL_PRICE: u64 = 1_000_000_000_000_000;

/// What happened while loading: counts plus every rejected row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub segments_filled: usize,
    pub rejected: Vec<ParseError>,
}

/// Load the orders dataset from `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened, is not well-formed CSV,
/// or lacks one of [`REQUIRED_COLUMNS`].
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    load_dataset_with_report(path).map(|(dataset, _)| dataset)
}

/// Like [`load_dataset`], also returning the [`LoadReport`].
///
/// # Errors
///
/// See [`load_dataset`].
pub fn load_dataset_with_report(path: &Path) -> Result<(Dataset, LoadReport), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let (dataset, report) = read_dataset(file)?;

    tracing::info!(
        path = %path.display(),
        total_rows = report.total_rows,
        loaded_rows = report.loaded_rows,
        rejected_rows = report.rejected.len(),
        segments_filled = report.segments_filled,
        "orders dataset loaded"
    );

    Ok((dataset, report))
}

/// Parse an orders table from any reader.
///
/// # Errors
///
/// Returns [`LoadError`] for structural problems; bad values only reject
/// their row.
pub fn read_dataset<R: Read>(reader: R) -> Result<(Dataset, LoadReport), LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::EmptyHeader);
    }
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let row = result?;
        report.total_rows += 1;
        let line = row.position().map_or(0, csv::Position::line);

        match columns.parse_row(&row, line) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(error = %err, "rejecting order row");
                report.rejected.push(err);
            }
        }
    }

    let mut dataset = Dataset::from_records(records);
    report.segments_filled = dataset.fill_missing_segments();
    report.loaded_rows = dataset.len();

    Ok((dataset, report))
}

/// Parse an ISO-8601-ish timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` with a space or `T`, RFC 3339 with an
/// offset (kept as wall-clock time), and bare dates (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Positions of the required columns within the header row.
struct ColumnIndex {
    city: usize,
    segment: usize,
    timestamp: usize,
    price: usize,
    review: usize,
    category: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            city: find("customer_city")?,
            segment: find("customer_segment")?,
            timestamp: find("order_purchase_timestamp")?,
            price: find("total_price")?,
            review: find("review_score")?,
            category: find("product_category_name_english")?,
        })
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<OrderRecord, ParseError> {
        let field = move |idx: usize| row.get(idx).filter(|v| !is_null_token(v)).map(str::trim);
        let required = move |idx: usize, column: &'static str| {
            field(idx).ok_or(ParseError::MissingField { line, column })
        };

        let customer_city = required(self.city, "customer_city")?.to_string();

        let raw_ts = required(self.timestamp, "order_purchase_timestamp")?;
        let order_purchase_timestamp =
            parse_timestamp(raw_ts).ok_or_else(|| ParseError::InvalidTimestamp {
                line,
                value: raw_ts.to_string(),
            })?;

        let raw_price = required(self.price, "total_price")?;
        let total_price = parse_decimal(raw_price).ok_or_else(|| ParseError::InvalidNumber {
            line,
            column: "total_price",
            value: raw_price.to_string(),
        })?;
        if total_price < Decimal::ZERO {
            return Err(ParseError::NegativePrice {
                line,
                value: raw_price.to_string(),
            });
        }
        if total_price > Decimal::from(MAX_TOTAL_PRICE) {
            return Err(ParseError::InvalidNumber {
                line,
                column: "total_price",
                value: raw_price.to_string(),
            });
        }

        let review_score = field(self.review)
            .map(|raw| {
                parse_decimal(raw).ok_or_else(|| ParseError::InvalidNumber {
                    line,
                    column: "review_score",
                    value: raw.to_string(),
                })
            })
            .transpose()?;

        Ok(OrderRecord {
            customer_city,
            customer_segment: field(self.segment).map(ToOwned::to_owned),
            order_purchase_timestamp,
            total_price,
            review_score,
            product_category_name_english: field(self.category)
                .unwrap_or(UNKNOWN_PRODUCT_CATEGORY)
                .to_string(),
        })
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
