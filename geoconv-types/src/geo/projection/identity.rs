use crate::coord::Coord;
use crate::geo::projection::Projection;

/// Projection that returns its input. Used for geographic systems that share the WGS84 axes.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    type InPoint = Coord;
    type OutPoint = Coord;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(*input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(*input)
    }
}
