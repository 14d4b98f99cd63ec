//! Conversions between [`Geometry`] and [`geo_types`] geometries.
//!
//! `geo_types` geometries are planar, so the elevation of coordinates is dropped when converting into them.

use crate::coord::Coord;
use crate::error::GeoconvTypesError;
use crate::geometry::{Geometry, Line, PolygonRings};

impl From<Coord> for geo_types::Coord<f64> {
    fn from(value: Coord) -> Self {
        geo_types::Coord {
            x: value.x,
            y: value.y,
        }
    }
}

impl From<geo_types::Coord<f64>> for Coord {
    fn from(value: geo_types::Coord<f64>) -> Self {
        Coord::new(value.x, value.y)
    }
}

fn to_line_string(line: &[Coord]) -> geo_types::LineString<f64> {
    line.iter().copied().map(geo_types::Coord::from).collect()
}

fn to_polygon(rings: &PolygonRings) -> geo_types::Polygon<f64> {
    let mut iter = rings.iter();
    let exterior = iter
        .next()
        .map(|r| to_line_string(r))
        .unwrap_or_else(|| geo_types::LineString::new(vec![]));
    geo_types::Polygon::new(exterior, iter.map(|r| to_line_string(r)).collect())
}

fn from_line_string(line: &geo_types::LineString<f64>) -> Line {
    line.0.iter().copied().map(Coord::from).collect()
}

fn from_polygon(polygon: &geo_types::Polygon<f64>) -> PolygonRings {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(from_line_string)
        .collect()
}

impl From<&Geometry> for geo_types::Geometry<f64> {
    fn from(value: &Geometry) -> Self {
        match value {
            Geometry::Point(p) => geo_types::Point::from(geo_types::Coord::from(*p)).into(),
            Geometry::LineString(line) => to_line_string(line).into(),
            Geometry::Polygon(rings) => to_polygon(rings).into(),
            Geometry::MultiPoint(points) => geo_types::MultiPoint::new(
                points
                    .iter()
                    .map(|p| geo_types::Point::from(geo_types::Coord::from(*p)))
                    .collect(),
            )
            .into(),
            Geometry::MultiLineString(lines) => {
                geo_types::MultiLineString::new(lines.iter().map(|l| to_line_string(l)).collect())
                    .into()
            }
            Geometry::MultiPolygon(polygons) => {
                geo_types::MultiPolygon::new(polygons.iter().map(to_polygon).collect()).into()
            }
            Geometry::GeometryCollection(geometries) => {
                geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection(
                    geometries.iter().map(geo_types::Geometry::from).collect(),
                ))
            }
        }
    }
}

impl TryFrom<geo_types::Geometry<f64>> for Geometry {
    type Error = GeoconvTypesError;

    fn try_from(value: geo_types::Geometry<f64>) -> Result<Self, Self::Error> {
        Ok(match value {
            geo_types::Geometry::Point(p) => Geometry::Point(p.0.into()),
            geo_types::Geometry::Line(line) => {
                Geometry::LineString(vec![line.start.into(), line.end.into()])
            }
            geo_types::Geometry::LineString(line) => Geometry::LineString(from_line_string(&line)),
            geo_types::Geometry::Polygon(polygon) => Geometry::Polygon(from_polygon(&polygon)),
            geo_types::Geometry::MultiPoint(points) => {
                Geometry::MultiPoint(points.0.into_iter().map(|p| p.0.into()).collect())
            }
            geo_types::Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(lines.0.iter().map(from_line_string).collect())
            }
            geo_types::Geometry::MultiPolygon(polygons) => {
                Geometry::MultiPolygon(polygons.0.iter().map(from_polygon).collect())
            }
            geo_types::Geometry::GeometryCollection(geometries) => Geometry::GeometryCollection(
                geometries
                    .0
                    .into_iter()
                    .map(Geometry::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            geo_types::Geometry::Rect(rect) => Geometry::Polygon(from_polygon(&rect.to_polygon())),
            geo_types::Geometry::Triangle(triangle) => {
                Geometry::Polygon(from_polygon(&triangle.to_polygon()))
            }
        })
    }
}
