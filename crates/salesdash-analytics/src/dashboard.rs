use chrono::NaiveDate;
use salesdash_core::{Dataset, FilterCriteria};
use serde::Serialize;

use crate::charts::{aggregate_by_category, aggregate_by_day, CategoryTotal, DayTotal};
use crate::error::EmptyResultWarning;
use crate::filter::filter;
use crate::kpi::{summarize, KpiSummary};
use crate::presentation::{daily_sales_chart, product_line_chart, BarChart, KpiDisplay};

/// KPIs and both aggregates, all computed from one filtered subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    pub row_count: usize,
    pub kpis: KpiSummary,
    pub by_category: Vec<CategoryTotal>,
    pub by_day: Vec<DayTotal>,
}

impl Dashboard {
    #[must_use]
    pub fn kpi_display(&self) -> KpiDisplay {
        KpiDisplay::from(&self.kpis)
    }

    #[must_use]
    pub fn product_line_chart(&self) -> BarChart {
        product_line_chart(&self.by_category)
    }

    #[must_use]
    pub fn daily_sales_chart(&self) -> BarChart {
        daily_sales_chart(&self.by_day)
    }
}

/// Run filter, KPI and chart aggregation for `criteria`.
///
/// # Errors
///
/// Returns [`EmptyResultWarning`] when no order matches; nothing is
/// aggregated in that case.
pub fn build_dashboard(
    dataset: &Dataset,
    criteria: &FilterCriteria,
) -> Result<Dashboard, EmptyResultWarning> {
    let subset = filter(dataset, criteria);
    if subset.is_empty() {
        tracing::debug!(?criteria, "filters matched no orders");
        return Err(EmptyResultWarning);
    }

    Ok(Dashboard {
        criteria: criteria.clone(),
        row_count: subset.len(),
        kpis: summarize(&subset),
        by_category: aggregate_by_category(&subset),
        by_day: aggregate_by_day(&subset),
    })
}

/// Values a UI offers in its filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub segments: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let bounds = dataset.timestamp_bounds();
        Self {
            cities: dataset.cities(),
            segments: dataset.segments(),
            min_date: bounds.map(|(lo, _)| lo.date()),
            max_date: bounds.map(|(_, hi)| hi.date()),
        }
    }
}
