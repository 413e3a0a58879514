//! `dashboard` and `options` command handlers.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use salesdash_analytics::{build_dashboard, load_dataset, FilterOptions, NO_DATA_NOTICE};
use salesdash_core::{FilterDefaults, FilterSelection};

use crate::render::render_dashboard;

/// Filters as given on the command line. Empty vectors mean "not given"
/// unless the matching `no_*` flag asks for an empty selection.
#[derive(Debug, Default)]
pub(crate) struct DashboardArgs {
    pub cities: Vec<String>,
    pub no_city: bool,
    pub segments: Vec<String>,
    pub no_segment: bool,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub width: usize,
}

impl DashboardArgs {
    fn selection(&self) -> FilterSelection {
        let as_set = |values: &[String], none: bool| -> Option<BTreeSet<String>> {
            if none {
                return Some(BTreeSet::new());
            }
            (!values.is_empty()).then(|| values.iter().cloned().collect())
        };
        FilterSelection {
            cities: as_set(&self.cities, self.no_city),
            segments: as_set(&self.segments, self.no_segment),
            start: self.start,
            end: self.end,
        }
    }
}

/// Load the orders file, apply the filters and print the dashboard.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub(crate) fn run_dashboard(
    data_path: &Path,
    defaults: &FilterDefaults,
    args: &DashboardArgs,
) -> anyhow::Result<()> {
    let dataset = load_dataset(data_path)?;
    let criteria = args.selection().resolve(defaults, &dataset);

    match build_dashboard(&dataset, &criteria) {
        Ok(dashboard) => print!("{}", render_dashboard(&dashboard, args.width)),
        Err(warning) => {
            tracing::info!(%warning, "nothing to show");
            println!("{NO_DATA_NOTICE}");
        }
    }
    Ok(())
}

/// Print the values available to the dashboard filters.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub(crate) fn run_options(data_path: &Path) -> anyhow::Result<()> {
    let dataset = load_dataset(data_path)?;
    print!("{}", render_options(&FilterOptions::from_dataset(&dataset)));
    Ok(())
}

fn render_options(options: &FilterOptions) -> String {
    let span = match (options.min_date, options.max_date) {
        (Some(min), Some(max)) => format!("{min} to {max}"),
        _ => "no orders".to_string(),
    };
    let mut out = format!("CITIES ({})\n", options.cities.len());
    for city in &options.cities {
        out.push_str("  ");
        out.push_str(city);
        out.push('\n');
    }
    out.push_str(&format!("SEGMENTS ({})\n", options.segments.len()));
    for segment in &options.segments {
        out.push_str("  ");
        out.push_str(segment);
        out.push('\n');
    }
    out.push_str(&format!("DATES {span}\n"));
    out
}
