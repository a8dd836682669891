//! Region lookup handler.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::Response;

use crate::handlers::{json_response, parse_geo_point, LocationQueryParams};
use crate::state::AppState;

/// GET /api/region?lat=&lon=
///
/// Resolves the coordinates to a region classification code. A point
/// outside every region is a regular `{"code": null}` response, not an
/// error.
pub async fn region_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<LocationQueryParams>,
) -> Response {
    let point = match parse_geo_point(&params) {
        Ok(point) => point,
        Err(response) => return response,
    };

    let code = state.resolver.resolve_code(point);
    json_response(StatusCode::OK, &serde_json::json!({ "code": code }))
}
