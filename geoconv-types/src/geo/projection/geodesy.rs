use geodesy::prelude::*;

use crate::coord::{Coord, GeoPoint};
use crate::geo::projection::Projection;

/// Projection evaluated by the `geodesy` crate from an operator definition, e.g.
/// `utm zone=32 ellps=GRS80`.
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
}

impl GeodesyProjection {
    /// Compiles the operator definition. Returns `None` if `geodesy` does not understand it.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).ok()?;
        Some(Self { context, op })
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection").finish_non_exhaustive()
    }
}

impl Projection for GeodesyProjection {
    type InPoint = Coord;
    type OutPoint = Coord;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        // Operators report failed points through the count, leaving them untouched or NaN.
        if self.context.apply(self.op, Fwd, &mut data).ok()? != data.len() {
            return None;
        }

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(input.with_xy(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x, input.y])];
        if self.context.apply(self.op, Inv, &mut data).ok()? != data.len() {
            return None;
        }

        let (lon, lat) = (data[0].0[0].to_degrees(), data[0].0[1].to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }

        Some(input.with_xy(lon, lat))
    }
}
