//! Region type, ring validation, and boundary encoding.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::GeometryError;
use crate::gml::PolygonRings;

/// An administrative region with a unique classification code.
///
/// The boundary is a multi-polygon in the projected CRS: one polygon per
/// disjoint part (mainland, islands, enclaves), each with an exterior ring
/// and zero or more interior rings (holes).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

/// Validate one ring of coordinate pairs.
///
/// Consecutive duplicate points and an explicit closing point are removed;
/// what remains must be at least 3 vertices enclosing a nonzero area.
/// Returns the open ring (geo closes rings on polygon construction).
fn validate_ring(coords: &[(f64, f64)]) -> Result<Vec<Coord<f64>>, GeometryError> {
    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for &(x, y) in coords {
        let c = Coord { x, y };
        if ring.last() != Some(&c) {
            ring.push(c);
        }
    }
    // Drop the explicit closing point if the ring came closed
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(GeometryError::DegenerateRing(format!(
            "ring has {} distinct vertices, need at least 3",
            ring.len()
        )));
    }

    // Shoelace test: collinear vertices enclose no area
    let mut doubled_area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        doubled_area += a.x * b.y - b.x * a.y;
    }
    if doubled_area.abs() < 1e-9 {
        return Err(GeometryError::DegenerateRing(
            "ring vertices are collinear".to_string(),
        ));
    }

    Ok(ring)
}

/// Build a validated polygon from raw exterior/interior rings.
pub fn polygon_from_rings(rings: &PolygonRings) -> Result<Polygon<f64>, GeometryError> {
    let exterior = LineString::from(validate_ring(&rings.exterior)?);
    let interiors = rings
        .interiors
        .iter()
        .map(|ring| validate_ring(ring).map(LineString::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Build a validated multi-polygon boundary from raw polygon parts.
pub fn boundary_from_parts(parts: &[PolygonRings]) -> Result<MultiPolygon<f64>, GeometryError> {
    if parts.is_empty() {
        return Err(GeometryError::EmptyDocument);
    }
    let polygons = parts
        .iter()
        .map(polygon_from_rings)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiPolygon(polygons))
}

/// Revalidate a boundary that arrived already assembled (e.g. from storage).
pub fn validate_boundary(boundary: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if boundary.0.is_empty() {
        return Err(GeometryError::EmptyDocument);
    }
    for polygon in &boundary.0 {
        validate_ring(&ring_pairs(polygon.exterior()))?;
        for interior in polygon.interiors() {
            validate_ring(&ring_pairs(interior))?;
        }
    }
    Ok(())
}

fn ring_pairs(ring: &LineString<f64>) -> Vec<(f64, f64)> {
    ring.coords().map(|c| (c.x, c.y)).collect()
}

/// Encode a boundary as a GeoJSON MultiPolygon value for storage.
pub fn boundary_to_geojson(boundary: &MultiPolygon<f64>) -> serde_json::Value {
    let geometry = geojson::Geometry::new(geojson::Value::from(boundary));
    serde_json::to_value(geometry).expect("GeoJSON geometry serializes")
}

/// Decode a stored GeoJSON geometry back into a boundary.
///
/// Accepts both Polygon and MultiPolygon geometries.
pub fn boundary_from_geojson(value: &serde_json::Value) -> Result<MultiPolygon<f64>, GeometryError> {
    let geometry: geojson::Geometry = serde_json::from_value(value.clone())
        .map_err(|e| GeometryError::InvalidBoundary(e.to_string()))?;
    let geo_geom: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| GeometryError::InvalidBoundary(e.to_string()))?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(GeometryError::InvalidBoundary(
            "expected Polygon or MultiPolygon geometry".to_string(),
        )),
    }
}
