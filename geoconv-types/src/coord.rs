//! Coordinates and their geographic interpretation.

use serde::{Deserialize, Serialize};

/// A single position: `x`/longitude, `y`/latitude and an optional elevation.
///
/// Coordinates are kept in the units of the reference system they were read in (degrees for geographic systems,
/// meters for the projected ones) until they are explicitly reprojected.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Coord {
    /// Easting or longitude.
    pub x: f64,
    /// Northing or latitude.
    pub y: f64,
    /// Elevation, if the source had a third ordinate.
    pub z: Option<f64>,
}

impl Coord {
    /// Creates a planar coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a coordinate with elevation.
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Builds a coordinate from a slice of ordinates. Ordinates after the third one are dropped.
    ///
    /// Returns `None` if there are less than two ordinates.
    pub fn from_ordinates(ordinates: &[f64]) -> Option<Self> {
        match ordinates {
            [x, y] => Some(Self::new(*x, *y)),
            [x, y, z, ..] => Some(Self::xyz(*x, *y, *z)),
            _ => None,
        }
    }

    /// Number of ordinates of the coordinate (2 or 3).
    pub fn dimensions(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    /// Returns a copy with `x` and `y` replaced, keeping the elevation.
    pub fn with_xy(&self, x: f64, y: f64) -> Self {
        Self { x, y, z: self.z }
    }

    /// Ordinates of the coordinate in `x, y[, z]` order.
    pub fn ordinates(&self) -> Vec<f64> {
        match self.z {
            Some(z) => vec![self.x, self.y, z],
            None => vec![self.x, self.y],
        }
    }

    /// Whether all ordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

/// Point on the surface of the Earth, in degrees.
pub trait GeoPoint {
    /// Latitude in degrees.
    fn lat(&self) -> f64;
    /// Longitude in degrees.
    fn lon(&self) -> f64;

    /// Latitude in radians.
    fn lat_rad(&self) -> f64 {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> f64 {
        self.lon().to_radians()
    }
}

impl GeoPoint for Coord {
    fn lat(&self) -> f64 {
        self.y
    }

    fn lon(&self) -> f64 {
        self.x
    }
}
