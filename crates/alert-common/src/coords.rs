//! Validated geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{AlertError, AlertResult};

/// A WGS84 geographic point in degrees, validated at construction.
///
/// Latitude is constrained to [-90, 90], longitude to [-180, 180]. Out of
/// range or non-finite values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> AlertResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AlertError::InvalidParameter {
                param: "lat".to_string(),
                message: format!("latitude must be in [-90, 90], got {}", lat),
            });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(AlertError::InvalidParameter {
                param: "lon".to_string(),
                message: format!("longitude must be in [-180, 180], got {}", lon),
            });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}
