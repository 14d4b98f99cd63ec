//! The geometry model shared by all readers, writers and transformation passes.
//!
//! [`Geometry`] is a closed sum type with one variant per OGC simple feature kind. Rings are stored as they come
//! from the source formats: closed, with the first point repeated at the end.

use crate::coord::Coord;

/// Ordered sequence of coordinates of a line.
pub type Line = Vec<Coord>;

/// Closed sequence of coordinates (first == last) bounding an area.
pub type Ring = Vec<Coord>;

/// Rings of a polygon. The first one is the exterior ring, the rest are holes.
pub type PolygonRings = Vec<Ring>;

/// Geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Single position.
    Point(Coord),
    /// Connected line.
    LineString(Line),
    /// Area bounded by an exterior ring with optional holes.
    Polygon(PolygonRings),
    /// Set of positions.
    MultiPoint(Vec<Coord>),
    /// Set of lines.
    MultiLineString(Vec<Line>),
    /// Set of polygons.
    MultiPolygon(Vec<PolygonRings>),
    /// Heterogeneous, possibly nested, set of geometries.
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Name of the geometry kind as used by GeoJSON and WKT (in upper case there).
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Returns true if the geometry has no coordinates at all.
    pub fn is_empty(&self) -> bool {
        self.coords().next().is_none()
    }

    /// Iterates over every coordinate of the geometry, including nested collection members.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(c) => Box::new(std::iter::once(c)),
            Geometry::LineString(line) | Geometry::MultiPoint(line) => Box::new(line.iter()),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                Box::new(rings.iter().flatten())
            }
            Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten().flatten()),
            Geometry::GeometryCollection(geometries) => {
                Box::new(geometries.iter().flat_map(Geometry::coords))
            }
        }
    }

    /// Largest number of ordinates used by any coordinate of the geometry.
    pub fn dimensions(&self) -> usize {
        self.coords().map(Coord::dimensions).max().unwrap_or(2)
    }
}

/// Whether the ring is closed, i.e. has at least one point and the first point equals the last one.
pub fn is_closed(ring: &[Coord]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

impl From<Coord> for Geometry {
    fn from(value: Coord) -> Self {
        Self::Point(value)
    }
}
