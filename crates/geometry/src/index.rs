//! In-memory region index with point-containment lookup.

use geo::{BoundingRect, Intersects, MultiPolygon, Point, Rect};
use tracing::debug;

use crate::error::GeometryError;
use crate::region::{validate_boundary, Region};

/// A region plus its precomputed bounding rectangle.
struct IndexedRegion {
    region: Region,
    envelope: Rect<f64>,
}

/// Holds all region boundaries (projected CRS) and answers containment
/// queries.
///
/// Lookup is an insertion-ordered linear scan with a bounding-box
/// pre-filter; the ordering makes shared-edge ties deterministic
/// (first-loaded region wins). The index is built once at startup and
/// treated as immutable afterwards; re-imports build a fresh index.
#[derive(Default)]
pub struct RegionIndex {
    regions: Vec<IndexedRegion>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a region by code.
    ///
    /// Replacement happens in place so a re-imported region keeps its scan
    /// position. Degenerate boundaries are rejected and leave any existing
    /// region untouched.
    pub fn load_region(
        &mut self,
        code: &str,
        name: &str,
        boundary: MultiPolygon<f64>,
    ) -> Result<(), GeometryError> {
        validate_boundary(&boundary)?;
        let envelope = boundary
            .bounding_rect()
            .ok_or(GeometryError::EmptyDocument)?;
        let entry = IndexedRegion {
            region: Region {
                code: code.to_string(),
                name: name.to_string(),
                boundary,
            },
            envelope,
        };

        match self.regions.iter_mut().find(|r| r.region.code == code) {
            Some(slot) => {
                debug!(code = %code, "Replacing region boundary");
                *slot = entry;
            }
            None => self.regions.push(entry),
        }
        Ok(())
    }

    /// Find the region containing a point in the native projected CRS.
    ///
    /// Containment is boundary-inclusive, so a point exactly on a shared
    /// edge matches; the first-loaded of the touching regions is returned.
    pub fn find_containing(&self, x: f64, y: f64) -> Option<&Region> {
        let point = Point::new(x, y);
        for entry in &self.regions {
            let env = &entry.envelope;
            if x < env.min().x || x > env.max().x || y < env.min().y || y > env.max().y {
                continue;
            }
            if entry.region.boundary.intersects(&point) {
                return Some(&entry.region);
            }
        }
        None
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions
            .iter()
            .map(|r| &r.region)
            .find(|r| r.code == code)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gml::PolygonRings;
    use crate::region::boundary_from_parts;

    fn square_boundary(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        boundary_from_parts(&[PolygonRings {
            exterior: vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ],
            interiors: vec![],
        }])
        .unwrap()
    }

    #[test]
    fn test_inside_and_outside() {
        let mut index = RegionIndex::new();
        index
            .load_region("0401", "poznański", square_boundary(0.0, 0.0, 10.0))
            .unwrap();

        assert_eq!(index.find_containing(5.0, 5.0).unwrap().code, "0401");
        assert!(index.find_containing(15.0, 5.0).is_none());
        assert!(index.find_containing(-0.1, 5.0).is_none());
    }

    #[test]
    fn test_hole_excluded_island_included() {
        let boundary = boundary_from_parts(&[
            PolygonRings {
                exterior: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
                interiors: vec![vec![
                    (2.0, 2.0),
                    (4.0, 2.0),
                    (4.0, 4.0),
                    (2.0, 4.0),
                    (2.0, 2.0),
                ]],
            },
            // Disjoint island part of the same region
            PolygonRings {
                exterior: vec![
                    (20.0, 0.0),
                    (25.0, 0.0),
                    (25.0, 5.0),
                    (20.0, 5.0),
                    (20.0, 0.0),
                ],
                interiors: vec![],
            },
        ])
        .unwrap();

        let mut index = RegionIndex::new();
        index.load_region("1408", "z wyspą", boundary).unwrap();

        assert_eq!(index.find_containing(1.0, 1.0).unwrap().code, "1408");
        assert!(index.find_containing(3.0, 3.0).is_none(), "hole interior");
        assert_eq!(index.find_containing(22.0, 2.0).unwrap().code, "1408");
    }

    #[test]
    fn test_shared_edge_first_loaded_wins() {
        let mut index = RegionIndex::new();
        index
            .load_region("0401", "west", square_boundary(0.0, 0.0, 10.0))
            .unwrap();
        index
            .load_region("0402", "east", square_boundary(10.0, 0.0, 10.0))
            .unwrap();

        // (10, 5) lies on the edge both regions share
        assert_eq!(index.find_containing(10.0, 5.0).unwrap().code, "0401");
        // Strict interiors still resolve to their own region
        assert_eq!(index.find_containing(10.1, 5.0).unwrap().code, "0402");
    }

    #[test]
    fn test_replace_by_code_keeps_scan_position() {
        let mut index = RegionIndex::new();
        index
            .load_region("0401", "west", square_boundary(0.0, 0.0, 10.0))
            .unwrap();
        index
            .load_region("0402", "east", square_boundary(10.0, 0.0, 10.0))
            .unwrap();

        index
            .load_region("0401", "west renamed", square_boundary(0.0, 0.0, 10.0))
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("0401").unwrap().name, "west renamed");
        // Tie-break is unchanged after the replace
        assert_eq!(index.find_containing(10.0, 5.0).unwrap().code, "0401");
    }

    #[test]
    fn test_degenerate_boundary_rejected_and_existing_kept() {
        let mut index = RegionIndex::new();
        index
            .load_region("0401", "ok", square_boundary(0.0, 0.0, 10.0))
            .unwrap();

        let degenerate = MultiPolygon(vec![geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            vec![],
        )]);
        assert!(index.load_region("0401", "broken", degenerate).is_err());

        assert_eq!(index.get("0401").unwrap().name, "ok");
    }
}
