//! Error types used by the crate.

use geoconv_types::GeoconvTypesError;
use thiserror::Error;

/// Geoconv error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoconvError {
    /// The GML document violates the structure expected for the geometry element.
    #[error("could not parse GML: {0}")]
    MalformedGml(String),
    /// Number of values in a coordinate list is not a multiple of the coordinate dimension.
    #[error("invalid coordinates list (stride {stride}, {count} values)")]
    InvalidCoordinateList {
        /// Active coordinate dimension.
        stride: usize,
        /// Number of values in the list.
        count: usize,
    },
    /// The request parameters cannot be fulfilled together.
    #[error("{0}")]
    InvalidRequest(String),
    /// Invalid GeoJSON document. `from..to` is the character range the problem was found at.
    #[error("invalid GeoJSON at {from}..{to}: {message}")]
    GeoJson {
        /// Description of the problem.
        message: String,
        /// Start of the offending range in characters.
        from: usize,
        /// End of the offending range in characters.
        to: usize,
    },
    /// Invalid WKT text.
    #[error("could not parse WKT: {0}")]
    Wkt(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
    /// Error of the geometry model, orientation or projection.
    #[error(transparent)]
    Types(#[from] GeoconvTypesError),
}

impl GeoconvError {
    /// Whether the error was caused by the request content rather than by the converter itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GeoconvError::Generic(_))
    }
}

impl From<quick_xml::Error> for GeoconvError {
    fn from(value: quick_xml::Error) -> Self {
        Self::MalformedGml(value.to_string())
    }
}

impl From<geozero::error::GeozeroError> for GeoconvError {
    fn from(value: geozero::error::GeozeroError) -> Self {
        Self::Wkt(value.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for GeoconvError {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedGml(value.to_string())
    }
}
