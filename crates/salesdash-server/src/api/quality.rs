use axum::{extract::State, Extension, Json};
use salesdash_analytics::{BarChart, MissingValueReport};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct MissingData {
    report: MissingValueReport,
    chart: BarChart,
}

pub(super) async fn get_missing_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<MissingData>> {
    Json(ApiResponse::new(
        MissingData {
            chart: state.missing.chart(),
            report: (*state.missing).clone(),
        },
        req_id.0,
    ))
}
