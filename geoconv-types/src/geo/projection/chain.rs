use crate::coord::Coord;
use crate::geo::projection::Projection;

/// Boxed projection between WGS84 and some reference system.
pub type BoxedProjection = Box<dyn Projection<InPoint = Coord, OutPoint = Coord>>;

/// Conversion from one reference system to another through WGS84.
///
/// `project` takes a point in the `source` system, unprojects it to WGS84 and projects the result into the `target`
/// system. `unproject` goes the opposite way.
pub struct ChainProjection {
    source: BoxedProjection,
    target: BoxedProjection,
}

impl ChainProjection {
    /// Creates a new chain.
    pub fn new(source: BoxedProjection, target: BoxedProjection) -> Self {
        Self { source, target }
    }
}

impl Projection for ChainProjection {
    type InPoint = Coord;
    type OutPoint = Coord;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let geographic = self.source.unproject(input)?;
        self.target.project(&geographic)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let geographic = self.target.unproject(input)?;
        self.source.project(&geographic)
    }
}
