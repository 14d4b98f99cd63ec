use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::GeoconvTypesError;
use crate::geo::datum::Datum;
use crate::geo::projection::{BoxedProjection, ChainProjection, IdentityProjection, WebMercator};

/// How coordinates of a reference system relate to WGS84 longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Longitude/latitude in degrees on a datum compatible with WGS84.
    Geographic,
    /// Spherical Mercator.
    WebMercator,
    /// Projection evaluated by `geodesy`. The value is the operator definition without the ellipsoid.
    Geodesy(&'static str),
}

/// Entry of the named CRS table.
#[derive(Debug, Clone, Copy)]
pub struct CrsDefinition {
    /// EPSG code.
    pub code: u32,
    /// Human readable name.
    pub name: &'static str,
    /// Reference ellipsoid.
    pub datum: Datum,
    /// Projection from WGS84.
    pub projection_type: ProjectionType,
}

lazy_static! {
    static ref CRS_TABLE: HashMap<u32, CrsDefinition> = {
        let definitions = [
            (4326, "WGS 84", Datum::WGS84, ProjectionType::Geographic),
            (4258, "ETRS89", Datum::GRS80, ProjectionType::Geographic),
            (3857, "WGS 84 / Pseudo-Mercator", Datum::WGS84, ProjectionType::WebMercator),
            (25832, "ETRS89 / UTM zone 32N", Datum::GRS80, ProjectionType::Geodesy("utm zone=32")),
            (25833, "ETRS89 / UTM zone 33N", Datum::GRS80, ProjectionType::Geodesy("utm zone=33")),
            (32632, "WGS 84 / UTM zone 32N", Datum::WGS84, ProjectionType::Geodesy("utm zone=32")),
            (32633, "WGS 84 / UTM zone 33N", Datum::WGS84, ProjectionType::Geodesy("utm zone=33")),
            (
                3035,
                "ETRS89 / LAEA Europe",
                Datum::GRS80,
                ProjectionType::Geodesy("laea lon_0=10 lat_0=52 x_0=4321000 y_0=3210000"),
            ),
        ];

        definitions
            .into_iter()
            .map(|(code, name, datum, projection_type)| {
                (code, CrsDefinition { code, name, datum, projection_type })
            })
            .collect()
    };

    static ref TRAILING_CODE: Regex = Regex::new(r"(\d+)\s*$").expect("Must be a valid regex");
}

/// Coordinate reference system from the fixed table of supported systems.
///
/// Values can only be created for codes present in the table, so every `Crs` has a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    code: u32,
}

impl Crs {
    /// Geographic WGS84 (EPSG:4326).
    pub const WGS84: Crs = Crs { code: 4326 };

    /// Web Mercator (EPSG:3857).
    pub const EPSG3857: Crs = Crs { code: 3857 };

    /// Looks up a system by its EPSG code.
    pub fn from_code(code: u32) -> Result<Self, GeoconvTypesError> {
        if CRS_TABLE.contains_key(&code) {
            Ok(Self { code })
        } else {
            Err(GeoconvTypesError::UnsupportedCrs(format!("EPSG:{code}")))
        }
    }

    /// Resolves an `srsName`-style identifier.
    ///
    /// `WGS84` and `CRS84` resolve to [`Crs::WGS84`]. Any identifier ending in a number (`EPSG:3857`,
    /// `urn:ogc:def:crs:EPSG::4326`, `http://www.opengis.net/def/crs/EPSG/0/25832`) is resolved by that number and
    /// fails if the number is not in the table. Other identifiers are not recognized and give `Ok(None)`.
    pub fn from_srs_name(name: &str) -> Result<Option<Self>, GeoconvTypesError> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("WGS84") || trimmed.ends_with("CRS84") {
            return Ok(Some(Self::WGS84));
        }

        let Some(captures) = TRAILING_CODE.captures(trimmed) else {
            return Ok(None);
        };

        let code = captures[1]
            .parse::<u32>()
            .map_err(|_| GeoconvTypesError::UnsupportedCrs(trimmed.to_string()))?;
        if !CRS_TABLE.contains_key(&code) {
            return Err(GeoconvTypesError::UnsupportedCrs(trimmed.to_string()));
        }

        Ok(Some(Self { code }))
    }

    /// EPSG code of the system.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Table entry of the system.
    pub fn definition(&self) -> CrsDefinition {
        CRS_TABLE[&self.code]
    }

    /// Whether coordinates of this system are WGS84 longitude/latitude.
    pub fn is_wgs84(&self) -> bool {
        self.definition().projection_type == ProjectionType::Geographic
    }

    /// Projection from WGS84 into this system.
    pub fn get_projection(&self) -> Result<BoxedProjection, GeoconvTypesError> {
        let definition = self.definition();
        match definition.projection_type {
            ProjectionType::Geographic => Ok(Box::new(IdentityProjection)),
            ProjectionType::WebMercator => Ok(Box::new(WebMercator::new(definition.datum))),
            #[cfg(feature = "geodesy")]
            ProjectionType::Geodesy(operator) => {
                let definition_text = format!("{operator} ellps={}", definition.datum.ellipsoid());
                crate::geo::projection::GeodesyProjection::new(&definition_text)
                    .map(|projection| Box::new(projection) as BoxedProjection)
                    .ok_or_else(|| GeoconvTypesError::UnsupportedCrs(self.to_string()))
            }
            #[cfg(not(feature = "geodesy"))]
            ProjectionType::Geodesy(_) => Err(GeoconvTypesError::UnsupportedCrs(self.to_string())),
        }
    }

    /// Projection converting coordinates of this system into `target` coordinates.
    pub fn transform_to(&self, target: &Crs) -> Result<ChainProjection, GeoconvTypesError> {
        Ok(ChainProjection::new(
            self.get_projection()?,
            target.get_projection()?,
        ))
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.code)
    }
}

impl FromStr for Crs {
    type Err = GeoconvTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_srs_name(s)?.ok_or_else(|| GeoconvTypesError::UnsupportedCrs(s.to_string()))
    }
}

impl serde::Serialize for Crs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Crs {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
