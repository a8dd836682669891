//! Region boundaries and point-in-region resolution.
//!
//! Boundaries are held in the projected CRS (EPSG:2180) as
//! [`geo::MultiPolygon`] values; the [`RegionIndex`] answers containment
//! queries and the [`RegionResolver`] bridges WGS84 callers to it.

pub mod error;
pub mod gml;
pub mod index;
pub mod region;
pub mod resolver;

pub use error::GeometryError;
pub use gml::{PolygonRings, RegionFeature};
pub use index::RegionIndex;
pub use region::{boundary_from_geojson, boundary_from_parts, boundary_to_geojson, Region};
pub use resolver::RegionResolver;
