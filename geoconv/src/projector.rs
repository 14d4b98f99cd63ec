//! Reprojection of geometries between reference systems.
//!
//! Lines (including polygon rings) are not projected point by point. [`project`] walks their segments, optionally
//! densifies them in the source system, and keeps a projected point only where the slope of the projected line
//! changes. Runs of collinear points collapse to their end points. Slopes are compared with exact equality.

use geoconv_types::geo::projection::ChainProjection;
use geoconv_types::geo::{Crs, Projection};
use geoconv_types::{Coord, GeoconvTypesError, Geometry, Line, PolygonRings};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::GeoData;
use crate::error::GeoconvError;

/// Which projected points of a line are kept.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplifyStrategy {
    /// Keep a point only where the slope of the projected line changes.
    #[default]
    Auto,
    /// Keep every point.
    Always,
}

/// Options of [`project`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Number of points interpolated into every line segment before projection.
    pub densify: usize,
    /// Point retention strategy for lines.
    pub strategy: SimplifyStrategy,
}

impl ProjectOptions {
    /// Sets the number of interpolated points per segment.
    pub fn with_densify(mut self, densify: usize) -> Self {
        self.densify = densify;
        self
    }

    /// Sets the point retention strategy.
    pub fn with_strategy(mut self, strategy: SimplifyStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Projects the geometry from `source` into `target`.
///
/// If both systems are the same, the geometry is returned as is, without touching any coordinate.
pub fn project(
    geometry: Geometry,
    source: Crs,
    target: Crs,
    options: ProjectOptions,
) -> Result<Geometry, GeoconvError> {
    if is_noop(source, target) {
        return Ok(geometry);
    }

    debug!("Projecting {} from {source} to {target}", geometry.type_name());
    Projector::new(source, target, options)?.geometry(geometry)
}

/// Projects every geometry of the data from `source` into `target`. Feature ids and properties are kept.
pub fn project_data(
    data: GeoData,
    source: Crs,
    target: Crs,
    options: ProjectOptions,
) -> Result<GeoData, GeoconvError> {
    if is_noop(source, target) {
        return Ok(data);
    }

    debug!("Projecting data from {source} to {target}");
    let projector = Projector::new(source, target, options)?;
    data.map_geometries(|geometry| projector.geometry(geometry))
}

fn is_noop(source: Crs, target: Crs) -> bool {
    source == target || (source.is_wgs84() && target.is_wgs84())
}

struct Projector<P> {
    projection: P,
    source: Crs,
    target: Crs,
    options: ProjectOptions,
}

impl Projector<ChainProjection> {
    fn new(source: Crs, target: Crs, options: ProjectOptions) -> Result<Self, GeoconvError> {
        Ok(Self {
            projection: source.transform_to(&target)?,
            source,
            target,
            options,
        })
    }
}

impl<P> Projector<P>
where
    P: Projection<InPoint = Coord, OutPoint = Coord>,
{
    fn geometry(&self, geometry: Geometry) -> Result<Geometry, GeoconvError> {
        Ok(match geometry {
            Geometry::Point(point) => Geometry::Point(self.point(&point)?),
            Geometry::MultiPoint(points) => Geometry::MultiPoint(
                points
                    .iter()
                    .map(|point| self.point(point))
                    .collect::<Result<_, _>>()?,
            ),
            Geometry::LineString(line) => Geometry::LineString(self.line(&line)?),
            Geometry::MultiLineString(lines) => Geometry::MultiLineString(self.lines(&lines)?),
            Geometry::Polygon(rings) => Geometry::Polygon(self.lines(&rings)?),
            Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| self.lines(rings))
                    .collect::<Result<_, _>>()?,
            ),
            Geometry::GeometryCollection(geometries) => Geometry::GeometryCollection(
                geometries
                    .into_iter()
                    .map(|geometry| self.geometry(geometry))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn point(&self, point: &Coord) -> Result<Coord, GeoconvError> {
        let projected = self.projection.project(point).ok_or_else(|| {
            GeoconvTypesError::Projection(format!(
                "{} {} from {} to {}",
                point.x, point.y, self.source, self.target
            ))
        })?;

        Ok(point.with_xy(projected.x, projected.y))
    }

    fn lines(&self, lines: &PolygonRings) -> Result<Vec<Line>, GeoconvError> {
        lines.iter().map(|line| self.line(line)).collect()
    }

    fn line(&self, line: &[Coord]) -> Result<Line, GeoconvError> {
        let Some(first) = line.first() else {
            return Ok(Vec::new());
        };

        let always = self.options.strategy == SimplifyStrategy::Always;
        let steps = self.options.densify + 1;

        let mut out = Vec::with_capacity(line.len());
        let mut prev = self.point(first)?;
        let mut prev_slope: Option<f64> = None;

        for segment in line.windows(2) {
            let (start, end) = (segment[0], segment[1]);
            for i in 1..=steps {
                let candidate = if i == steps {
                    self.point(&end)?
                } else {
                    self.point(&interpolate(&start, &end, i, steps))?
                };

                let slope = (candidate.y - prev.y) / (candidate.x - prev.x);
                if always || prev_slope != Some(slope) {
                    out.push(prev);
                    prev_slope = Some(slope);
                }
                prev = candidate;
            }
        }

        out.push(prev);
        Ok(out)
    }
}

/// `i`-th of `steps - 1` points evenly spaced between `start` and `end`.
fn interpolate(start: &Coord, end: &Coord, i: usize, steps: usize) -> Coord {
    let t = i as f64;
    let n = steps as f64;
    let z = match (start.z, end.z) {
        (Some(z1), Some(z2)) => Some(z1 + t * ((z2 - z1) / n)),
        _ => None,
    };

    Coord {
        x: start.x + t * ((end.x - start.x) / n),
        y: start.y + t * ((end.y - start.y) / n),
        z,
    }
}
