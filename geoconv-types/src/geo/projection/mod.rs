//! Projections between the supported coordinate systems.
//!
//! Every projection converts geographic coordinates (WGS84 degrees) into the coordinates of some reference system
//! (`project`) and back (`unproject`). Two projections can be chained with [`ChainProjection`] to go from one
//! reference system to another through WGS84.

mod chain;
mod identity;
mod web_mercator;

pub use chain::{BoxedProjection, ChainProjection};
pub use identity::IdentityProjection;
pub use web_mercator::WebMercator;

#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;

/// Conversion of points between two coordinate systems.
pub trait Projection {
    /// Input point type.
    type InPoint;
    /// Output point type.
    type OutPoint;

    /// Converts the input point into the output coordinate system. Returns `None` if the point cannot be represented
    /// there.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
