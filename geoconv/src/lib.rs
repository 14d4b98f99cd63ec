//! Geoconv converts geometries between GeoJSON, GML 3.2 and WKT, optionally reprojecting them into another
//! coordinate system or reducing them to their bounding box or centroid.
//!
//! # Quick start
//!
//! ```no_run
//! use geoconv::convert::{convert, ConversionMode, ConversionSettings};
//! use geoconv::format::GeoFormat;
//!
//! let settings = ConversionSettings::new(GeoFormat::GeoJson).with_mode(ConversionMode::Bbox);
//! let geojson = convert("POLYGON((10 10,45 10,45 45,10 45,10 10))", &settings).unwrap();
//! assert_eq!(
//!     geojson,
//!     r#"{"type":"Polygon","coordinates":[[[10,10],[45,10],[45,45],[10,45],[10,10]]]}"#
//! );
//! ```
//!
//! # Main components
//!
//! * [`format`] contains a reader and a writer for every supported [`GeoFormat`](format::GeoFormat). All of them
//!   work with the [`Geometry`](geoconv_types::Geometry) model of the `geoconv-types` crate. GeoJSON documents may
//!   also carry features, which are represented by [`GeoData`](data::GeoData).
//! * [`projector`] moves geometries between the reference systems of the
//!   [`Crs`](geoconv_types::geo::Crs) table.
//! * [`reduce`] computes bounding boxes and centroids.
//! * [`convert`] ties everything together according to [`ConversionSettings`].
//!
//! Everything is synchronous and keeps no state between calls, so conversions can run concurrently from any number
//! of threads.

pub mod convert;
pub mod data;
pub mod error;
pub mod format;
pub mod projector;
pub mod reduce;

pub use convert::{convert, ConversionMode, ConversionSettings};
pub use error::GeoconvError;
pub use format::GeoFormat;
pub use geoconv_types;
