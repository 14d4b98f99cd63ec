use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::coord::{Coord, GeoPoint};
use crate::geo::datum::Datum;
use crate::geo::projection::Projection;

/// Spherical (pseudo) Mercator projection, EPSG:3857.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection using the semimajor axis of `datum` as the sphere radius.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            datum: Datum::WGS84,
        }
    }
}

impl Projection for WebMercator {
    type InPoint = Coord;
    type OutPoint = Coord;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        // ln(tan(pi/4 + lat/2)) stays finite at the poles because of rounding.
        if input.lat().abs() >= 90.0 {
            return None;
        }

        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor() * (FRAC_PI_4 + input.lat_rad() / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(input.with_xy(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = 2.0 * (input.y / self.datum.semimajor()).exp().atan() - FRAC_PI_2;
        let lon = input.x / self.datum.semimajor();

        let (lon, lat) = (lon.to_degrees(), lat.to_degrees());
        if lon.is_finite() && lat.is_finite() {
            Some(input.with_xy(lon, lat))
        } else {
            None
        }
    }
}
