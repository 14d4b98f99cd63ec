/// Reference ellipsoid of a coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    ellipsoid: &'static str,
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        ellipsoid: "WGS84",
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Geodetic Reference System 1980, used by ETRS89.
    pub const GRS80: Self = Datum {
        ellipsoid: "GRS80",
        semimajor: 6_378_137.0,
        inv_flattening: 298.257222101,
    };

    /// Ellipsoid name as understood by `geodesy` operator definitions (`ellps=...`).
    pub fn ellipsoid(&self) -> &'static str {
        self.ellipsoid
    }

    /// Equatorial radius in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening of the ellipsoid.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
