//! `missing` command handler.

use std::path::Path;

use salesdash_analytics::{missing_report, MissingValueReport};

use crate::render::render_bar_chart;

/// Print the per-column missing-value table and its bar chart.
///
/// # Errors
///
/// Returns an error if the file cannot be read as CSV.
pub(crate) fn run_missing(data_path: &Path, width: usize) -> anyhow::Result<()> {
    let report = missing_report(data_path)?;
    print!("{}", render_table(&report));
    println!();
    print!("{}", render_bar_chart(&report.chart(), width));
    Ok(())
}

fn render_table(report: &MissingValueReport) -> String {
    let column_width = report
        .columns
        .iter()
        .map(|c| c.column.chars().count())
        .max()
        .unwrap_or(0)
        .max("COLUMN".len());

    let mut out = format!("{:<column_width$}  MISSING %\n", "COLUMN");
    for column in &report.columns {
        out.push_str(&format!(
            "{:<column_width$}  {:>9.2}\n",
            column.column, column.missing_percentage
        ));
    }
    out
}
