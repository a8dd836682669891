//! Warning listing, detail, and by-location handlers.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;

use alert_common::AlertError;
use storage::WarningStore;

use crate::handlers::{alert_error_response, json_response, parse_geo_point, LocationQueryParams};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 1000;

/// Query parameters for the warning list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQueryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/warnings?limit=&offset=
pub async fn list_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListQueryParams>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(0, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let warnings = match state.store.list(limit, offset).await {
        Ok(warnings) => warnings,
        Err(e) => return alert_error_response(&e),
    };
    let total = match state.store.count().await {
        Ok(total) => total,
        Err(e) => return alert_error_response(&e),
    };

    json_response(
        StatusCode::OK,
        &serde_json::json!({ "warnings": warnings, "total": total }),
    )
}

/// GET /api/warnings/:id
pub async fn detail_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.store.get(id).await {
        Ok(Some(warning)) => json_response(StatusCode::OK, &warning),
        Ok(None) => alert_error_response(&AlertError::WarningNotFound(id)),
        Err(e) => alert_error_response(&e),
    }
}

/// GET /api/warnings/by-location?lat=&lon=
///
/// Resolves the coordinates to a region code and returns the warnings
/// currently active for that code. Unlike the plain region lookup, a
/// point outside every region is a 404 here.
pub async fn by_location_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<LocationQueryParams>,
) -> Response {
    let point = match parse_geo_point(&params) {
        Ok(point) => point,
        Err(response) => return response,
    };

    let Some(code) = state.resolver.resolve_code(point) else {
        return alert_error_response(&AlertError::RegionNotFound);
    };

    match state.store.active_for(&code, Utc::now()).await {
        Ok(warnings) => json_response(
            StatusCode::OK,
            &serde_json::json!({ "code": code, "warnings": warnings }),
        ),
        Err(e) => alert_error_response(&e),
    }
}
