//! Per-column missing-value percentages for any headed CSV table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::{Decimal, RoundingStrategy};
use salesdash_core::{is_null_token, Dataset};
use serde::Serialize;

use crate::error::LoadError;
use crate::loader::read_dataset;
use crate::presentation::{Bar, BarChart, Orientation};

pub const MISSING_BAR_COLOR: &str = "#E1341E";

/// Value axis cap for the missing-value chart, in percent.
pub const MISSING_AXIS_MAX_PERCENT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub null_count: usize,
    /// `null_count * 100 / row_count`, 2 decimal places.
    pub missing_percentage: Decimal,
}

/// Columns sorted by missing percentage, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingValueReport {
    pub row_count: usize,
    pub columns: Vec<ColumnMissing>,
}

impl MissingValueReport {
    /// Horizontal bar chart of the report, labelled `12.34%`.
    #[must_use]
    pub fn chart(&self) -> BarChart {
        let bars = self
            .columns
            .iter()
            .map(|c| Bar {
                label: c.column.clone(),
                value: c.missing_percentage,
                annotation: Some(format_percentage(c.missing_percentage)),
            })
            .collect();
        let mut chart = BarChart::new(
            "Missing values Percentage for Each Column",
            "Missing percentage %",
            "Column",
            Orientation::Horizontal,
            MISSING_BAR_COLOR,
        )
        .with_bars(bars);
        chart.value_axis_max = Some(Decimal::from(MISSING_AXIS_MAX_PERCENT));
        chart
    }
}

/// Compute the report for the CSV file at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or is not well-formed CSV.
pub fn missing_report(path: &Path) -> Result<MissingValueReport, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let report = read_missing_report(file)?;

    tracing::info!(
        path = %path.display(),
        rows = report.row_count,
        columns = report.columns.len(),
        "missing-value report computed"
    );

    Ok(report)
}

/// Load the orders dataset and its missing-value report from a single read
/// of the file at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or either pass finds a
/// structural problem.
pub fn load_with_missing_report(path: &Path) -> Result<(Dataset, MissingValueReport), LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let (dataset, load) = read_dataset(bytes.as_slice())?;
    let report = read_missing_report(bytes.as_slice())?;

    tracing::info!(
        path = %path.display(),
        total_rows = load.total_rows,
        loaded_rows = load.loaded_rows,
        rejected_rows = load.rejected.len(),
        segments_filled = load.segments_filled,
        "orders dataset and missing-value report loaded"
    );

    Ok((dataset, report))
}

/// Compute the report from any CSV reader.
///
/// # Errors
///
/// Returns [`LoadError::EmptyHeader`] for input without a header row and
/// [`LoadError::Csv`] for ragged rows.
pub fn read_missing_report<R: Read>(reader: R) -> Result<MissingValueReport, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::EmptyHeader);
    }

    let mut null_counts = vec![0_usize; headers.len()];
    let mut row_count = 0_usize;
    for result in csv_reader.records() {
        let row = result?;
        row_count += 1;
        for (count, value) in null_counts.iter_mut().zip(row.iter()) {
            if is_null_token(value) {
                *count += 1;
            }
        }
    }

    let mut columns: Vec<ColumnMissing> = headers
        .iter()
        .zip(null_counts)
        .map(|(column, null_count)| ColumnMissing {
            column: column.trim().to_string(),
            null_count,
            missing_percentage: percentage(null_count, row_count),
        })
        .collect();
    // stable: equal percentages keep header order
    columns.sort_by(|a, b| b.missing_percentage.cmp(&a.missing_percentage));

    Ok(MissingValueReport { row_count, columns })
}

/// `12.3` -> `12.30%`
#[must_use]
pub fn format_percentage(value: Decimal) -> String {
    format!("{value:.2}%")
}

fn percentage(nulls: usize, rows: usize) -> Decimal {
    if rows == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(nulls) * Decimal::ONE_HUNDRED)
        .checked_div(Decimal::from(rows))
        .map_or(Decimal::ZERO, |p| {
            p.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        })
}
