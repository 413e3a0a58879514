use axum::{extract::State, Extension, Json};
use salesdash_analytics::FilterOptions;
use salesdash_core::FilterDefaults;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct FiltersData {
    options: FilterOptions,
    defaults: FilterDefaults,
}

pub(super) async fn get_filters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FiltersData>> {
    Json(ApiResponse::new(
        FiltersData {
            options: (*state.options).clone(),
            defaults: (*state.defaults).clone(),
        },
        req_id.0,
    ))
}
