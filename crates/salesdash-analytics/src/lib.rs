//! Loading, filtering and aggregation behind the sales dashboard.
//!
//! The pipeline is `load_dataset` once, then per interaction
//! `filter` -> `summarize` + `aggregate_by_*` on the same subset.
//! [`build_dashboard`] runs the per-interaction part in one call.

pub mod charts;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod missing;
pub mod presentation;

pub use charts::{aggregate_by_category, aggregate_by_day, CategoryTotal, DayTotal};
pub use dashboard::{build_dashboard, Dashboard, FilterOptions};
pub use error::{EmptyResultWarning, LoadError, ParseError};
pub use filter::{filter, FilteredOrder, FilteredSubset};
pub use kpi::{summarize, KpiSummary};
pub use loader::{load_dataset, load_dataset_with_report, read_dataset, LoadReport};
pub use missing::{
    load_with_missing_report, missing_report, read_missing_report, ColumnMissing,
    MissingValueReport,
};
pub use presentation::{
    BarChart, KpiDisplay, Orientation, DASHBOARD_TITLE, NO_DATA_NOTICE,
};
