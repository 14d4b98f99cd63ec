//! Geometry model, ring orientation and coordinate reference systems used by `geoconv`.
//!
//! * [`Geometry`] is the single in-memory representation every format is read into and written from.
//! * [`orient`] detects and fixes ring winding, as required by GeoJSON.
//! * [`geo`] contains the fixed table of supported coordinate systems ([`geo::Crs`]) and the projections between them.

pub mod contour;
pub mod coord;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod orient;

#[cfg(feature = "geo-types")]
mod geo_types;
#[cfg(feature = "geojson")]
mod geojson;

pub use contour::{CartesianClosedContour, Winding};
pub use coord::{Coord, GeoPoint};
pub use error::GeoconvTypesError;
pub use geometry::{Geometry, Line, PolygonRings, Ring};
pub use orient::{LogReporter, OrientationReporter, OrientationStrategy};
