//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoconvTypesError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// The reference system is neither WGS84 nor one of the named projections.
    #[error("CRS \"{0}\" is not supported")]
    UnsupportedCrs(String),
    /// Ring winding does not follow the required convention.
    #[error("{0}")]
    InconsistentRingOrientation(String),
    /// A coordinate could not be transformed into the target reference system.
    #[error("failed to project coordinate: {0}")]
    Projection(String),
    /// Unknown configuration token.
    #[error("unknown token \"{0}\"")]
    InvalidToken(String),
}
