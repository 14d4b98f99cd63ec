//! WKT reader and writer backed by [`geozero`].
//!
//! WKT is handled as a planar format: elevation is not read and not written.

use geoconv_types::Geometry;
use geozero::wkt::Wkt;
use geozero::{ToGeo, ToWkt};

use crate::error::GeoconvError;

/// Reads a WKT geometry.
pub fn read(text: &str) -> Result<Geometry, GeoconvError> {
    let geometry = Wkt(text.trim()).to_geo()?;
    Ok(Geometry::try_from(geometry)?)
}

/// Writes the geometry as WKT.
pub fn write(geometry: &Geometry) -> Result<String, GeoconvError> {
    Ok(geo_types::Geometry::from(geometry).to_wkt()?)
}
