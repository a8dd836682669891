//! HTTP handlers and shared response helpers.

pub mod health;
pub mod locate;
pub mod warnings;

use axum::http::{header, StatusCode};
use axum::response::Response;
use serde::Deserialize;

use alert_common::{AlertError, GeoPoint};

/// Query parameters shared by the coordinate-based endpoints.
#[derive(Debug, Deserialize)]
pub struct LocationQueryParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Parse and validate the lat/lon query parameters.
///
/// Missing, non-numeric, and out-of-range values all map to a client
/// error; coordinates are never coerced or clamped.
pub fn parse_geo_point(params: &LocationQueryParams) -> Result<GeoPoint, Response> {
    let lat = parse_coordinate("lat", &params.lat)?;
    let lon = parse_coordinate("lon", &params.lon)?;

    GeoPoint::new(lat, lon).map_err(|e| alert_error_response(&e))
}

fn parse_coordinate(param: &str, value: &Option<String>) -> Result<f64, Response> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            return Err(alert_error_response(&AlertError::MissingParameter(
                param.to_string(),
            )))
        }
    };

    raw.trim().parse::<f64>().map_err(|_| {
        alert_error_response(&AlertError::InvalidParameter {
            param: param.to_string(),
            message: format!("not a number: {:?}", raw),
        })
    })
}

/// Serialize a value as a JSON response with the given status.
pub fn json_response(status: StatusCode, body: &impl serde::Serialize) -> Response {
    let json = serde_json::to_string(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(json.into())
        .unwrap()
}

/// Map an error to its `{"error": ...}` JSON response.
pub fn alert_error_response(err: &AlertError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, &serde_json::json!({ "error": err.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lon: Option<&str>) -> LocationQueryParams {
        LocationQueryParams {
            lat: lat.map(str::to_string),
            lon: lon.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_geo_point_valid() {
        let point = parse_geo_point(&params(Some("52.4"), Some("16.9"))).unwrap();
        assert_eq!(point.lat(), 52.4);
        assert_eq!(point.lon(), 16.9);
    }

    #[test]
    fn test_parse_geo_point_missing() {
        let response = parse_geo_point(&params(None, Some("16.9"))).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_geo_point_not_a_number() {
        let response = parse_geo_point(&params(Some("north"), Some("16.9"))).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_geo_point_out_of_range() {
        let response = parse_geo_point(&params(Some("123.0"), Some("16.9"))).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
