//! Transverse Mercator projection on an ellipsoid.
//!
//! Region boundaries are stored in EPSG:2180 (PUWG 1992), the national grid
//! covering all of Poland with a single zone. It is a transverse Mercator
//! projection of the GRS80 ellipsoid:
//! - Central meridian (lon0): 19°E
//! - Scale factor on the central meridian: 0.9993
//! - False easting: 500 000 m
//! - False northing: -5 300 000 m
//!
//! Forward and inverse mappings use the standard series expansions (Snyder,
//! "Map Projections - A Working Manual", eqs. 8-9..8-25), which keep the
//! round-trip error at the millimeter scale across the projection's extent.

/// Transverse Mercator projection parameters.
///
/// Constants derived from the ellipsoid are precomputed at construction so
/// per-point transforms stay allocation- and branch-free.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Ellipsoid semi-major axis (meters)
    pub a: f64,
    /// First eccentricity squared
    e2: f64,
    /// Second eccentricity squared, e2 / (1 - e2)
    ep2: f64,
    /// Footpoint-latitude series constant
    e1: f64,
    /// Meridian arc coefficients
    m0: f64,
    m1: f64,
    m2: f64,
    m3: f64,
}

impl TransverseMercator {
    /// Create a projection from ellipsoid and grid parameters.
    ///
    /// # Arguments
    /// * `a` - Semi-major axis (meters)
    /// * `inv_f` - Inverse flattening
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `k0` - Scale factor on the central meridian
    /// * `false_easting` - Offset added to x (meters)
    /// * `false_northing` - Offset added to y (meters)
    pub fn new(
        a: f64,
        inv_f: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = 1.0 / inv_f;
        let e2 = f * (2.0 - f);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);

        let sqrt_1me2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);

        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            a,
            e2,
            ep2,
            e1,
            m0: 1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0,
            m1: 3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0,
            m2: 15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0,
            m3: 35.0 * e6 / 3072.0,
        }
    }

    /// The EPSG:2180 (PUWG 1992) projection used for stored boundaries.
    pub fn puwg92() -> Self {
        // GRS80 ellipsoid
        Self::new(6_378_137.0, 298.257_222_101, 19.0, 0.9993, 500_000.0, -5_300_000.0)
    }

    /// Meridian arc length from the equator to `lat` (radians).
    fn meridian_arc(&self, lat: f64) -> f64 {
        self.a
            * (self.m0 * lat - self.m1 * (2.0 * lat).sin() + self.m2 * (4.0 * lat).sin()
                - self.m3 * (6.0 * lat).sin())
    }

    /// Convert geographic coordinates (degrees) to projected (x, y) meters.
    ///
    /// x grows eastward, y northward. Input is assumed pre-validated; the
    /// math itself is defined for any latitude away from the poles.
    pub fn geo_to_native(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = self.a / (1.0 - self.e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = self.ep2 * cos_lat * cos_lat;

        // Normalize the longitude difference to [-pi, pi]
        let mut dlon = lon - self.lon0;
        while dlon > std::f64::consts::PI {
            dlon -= 2.0 * std::f64::consts::PI;
        }
        while dlon < -std::f64::consts::PI {
            dlon += 2.0 * std::f64::consts::PI;
        }

        let aa = dlon * cos_lat;
        let aa2 = aa * aa;
        let aa3 = aa2 * aa;
        let aa4 = aa2 * aa2;
        let aa5 = aa4 * aa;
        let aa6 = aa4 * aa2;

        let m = self.meridian_arc(lat);

        let x = self.false_easting
            + self.k0
                * n
                * (aa
                    + (1.0 - t + c) * aa3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * aa5 / 120.0);

        let y = self.false_northing
            + self.k0
                * (m + n
                    * tan_lat
                    * (aa2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * aa4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * aa6
                            / 720.0));

        (x, y)
    }

    /// Convert projected (x, y) meters to geographic coordinates (degrees).
    pub fn native_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let m = (y - self.false_northing) / self.k0;
        let mu = m / (self.a * self.m0);

        let e1 = self.e1;
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_2 * e1_2;

        // Footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - self.e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - self.e2) / (w * w.sqrt());

        let d = (x - self.false_easting) / (n1 * self.k0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d2 * d2;
        let d5 = d4 * d;
        let d6 = d4 * d2;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_phi1;

        (lat.to_degrees(), lon.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(proj: &TransverseMercator, lat: f64, lon: f64, tol_deg: f64) {
        let (x, y) = proj.geo_to_native(lat, lon);
        let (lat2, lon2) = proj.native_to_geo(x, y);
        assert!(
            (lat - lat2).abs() < tol_deg,
            "lat roundtrip failed at ({}, {}): {} vs {}",
            lat,
            lon,
            lat,
            lat2
        );
        assert!(
            (lon - lon2).abs() < tol_deg,
            "lon roundtrip failed at ({}, {}): {} vs {}",
            lat,
            lon,
            lon,
            lon2
        );
    }

    #[test]
    fn test_roundtrip_across_poland() {
        let proj = TransverseMercator::puwg92();

        // Warszawa, Kraków, Gdańsk, Szczecin (western edge), Poznań area
        let points = [
            (52.2297, 21.0122),
            (50.0647, 19.9450),
            (54.3520, 18.6466),
            (53.4285, 14.5528),
            (52.4, 16.9),
        ];

        for (lat, lon) in points {
            assert_roundtrip(&proj, lat, lon, 1e-6);
        }
    }

    #[test]
    fn test_roundtrip_native() {
        let proj = TransverseMercator::puwg92();

        let (x, y) = proj.geo_to_native(51.7592, 19.4560); // Łódź
        let (lat, lon) = proj.native_to_geo(x, y);
        let (x2, y2) = proj.geo_to_native(lat, lon);

        assert!((x - x2).abs() < 0.01, "x roundtrip failed: {} vs {}", x, x2);
        assert!((y - y2).abs() < 0.01, "y roundtrip failed: {} vs {}", y, y2);
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let proj = TransverseMercator::puwg92();

        let (x, y) = proj.geo_to_native(52.0, 19.0);
        assert!((x - 500_000.0).abs() < 1e-6, "x should be FE on CM, got {}", x);
        // Meridian arc at 52°N, scaled and offset
        assert!(y > 455_000.0 && y < 463_000.0, "unexpected y on CM: {}", y);
    }

    #[test]
    fn test_warsaw_known_value() {
        let proj = TransverseMercator::puwg92();

        // Published PUWG 1992 coordinates for central Warsaw
        let (x, y) = proj.geo_to_native(52.2297, 21.0122);
        assert!(x > 635_500.0 && x < 639_500.0, "unexpected x: {}", x);
        assert!(y > 484_500.0 && y < 488_500.0, "unexpected y: {}", y);
    }

    #[test]
    fn test_axis_orientation() {
        let proj = TransverseMercator::puwg92();

        let (x_west, y_south) = proj.geo_to_native(50.0, 15.0);
        let (x_east, _) = proj.geo_to_native(50.0, 23.0);
        let (_, y_north) = proj.geo_to_native(54.0, 15.0);

        assert!(x_east > x_west, "x must grow eastward");
        assert!(y_north > y_south, "y must grow northward");
    }
}
