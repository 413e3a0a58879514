use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use salesdash_analytics::{
    build_dashboard, BarChart, EmptyResultWarning, KpiDisplay, KpiSummary, NO_DATA_NOTICE,
};
use salesdash_core::{FilterCriteria, FilterSelection};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Query string for the dashboard. Lists are comma-separated; a parameter
/// present with an empty value selects nothing.
#[derive(Debug, Default, Deserialize)]
pub(super) struct DashboardQuery {
    pub cities: Option<String>,
    pub segments: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct KpiView {
    #[serde(flatten)]
    values: KpiSummary,
    formatted: KpiDisplay,
}

#[derive(Debug, Serialize)]
pub(super) struct ChartsView {
    by_category: BarChart,
    by_day: BarChart,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(super) enum DashboardData {
    Ready {
        criteria: FilterCriteria,
        row_count: usize,
        kpis: KpiView,
        charts: ChartsView,
    },
    NoData {
        notice: &'static str,
    },
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardData>>, ApiError> {
    let selection = FilterSelection {
        cities: query.cities.as_deref().map(split_list),
        segments: query.segments.as_deref().map(split_list),
        start: parse_date_param(&req_id, "start", query.start.as_deref())?,
        end: parse_date_param(&req_id, "end", query.end.as_deref())?,
    };
    let criteria = selection.resolve(&state.defaults, &state.dataset);
    tracing::debug!(request_id = %req_id.0, ?criteria, "resolved dashboard filters");

    let data = match build_dashboard(&state.dataset, &criteria) {
        Ok(dashboard) => DashboardData::Ready {
            kpis: KpiView {
                values: dashboard.kpis,
                formatted: dashboard.kpi_display(),
            },
            charts: ChartsView {
                by_category: dashboard.product_line_chart(),
                by_day: dashboard.daily_sales_chart(),
            },
            row_count: dashboard.row_count,
            criteria: dashboard.criteria,
        },
        Err(EmptyResultWarning) => DashboardData::NoData {
            notice: NO_DATA_NOTICE,
        },
    };

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_date_param(
    req_id: &RequestId,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ApiError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("{name} must be a date in YYYY-MM-DD format, got {value:?}"),
            )
        })
    })
    .transpose()
}
