//! Point-to-region resolution across the CRS boundary.

use std::sync::Arc;

use alert_common::GeoPoint;
use projection::TransverseMercator;

use crate::index::RegionIndex;
use crate::region::Region;

/// Resolves WGS84 coordinates to the containing region.
///
/// Holds an immutable snapshot of the region index behind an `Arc`, so
/// resolution is read-only and freely concurrent. Replacing boundaries
/// means building a new index and swapping the `Arc`, never mutating a
/// shared one.
pub struct RegionResolver {
    projection: TransverseMercator,
    index: Arc<RegionIndex>,
}

impl RegionResolver {
    pub fn new(index: Arc<RegionIndex>) -> Self {
        Self {
            projection: TransverseMercator::puwg92(),
            index,
        }
    }

    /// The region containing the point, or `None` when no region does.
    ///
    /// `None` is an expected outcome near borders and outside coverage,
    /// not a failure.
    pub fn resolve(&self, point: GeoPoint) -> Option<&Region> {
        let (x, y) = self.projection.geo_to_native(point.lat(), point.lon());
        self.index.find_containing(x, y)
    }

    /// The classification code of the containing region, if any.
    pub fn resolve_code(&self, point: GeoPoint) -> Option<String> {
        self.resolve(point).map(|region| region.code.clone())
    }

    /// Number of regions in the underlying index.
    pub fn region_count(&self) -> usize {
        self.index.len()
    }
}
