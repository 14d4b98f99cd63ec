//! Reduction of a geometry to its bounding box or its centroid.

use geo::{BoundingRect, Centroid};
use geoconv_types::{Coord, Geometry};

/// Bounding box of the geometry as a polygon.
///
/// Points are returned as they are. The ring of the box starts at the south-west corner and runs counterclockwise.
/// Returns `None` for geometries without coordinates.
pub fn bbox(geometry: &Geometry) -> Option<Geometry> {
    if let Geometry::Point(_) = geometry {
        return Some(geometry.clone());
    }

    let rect = geo_types::Geometry::from(geometry).bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());

    Some(Geometry::Polygon(vec![vec![
        Coord::new(min.x, min.y),
        Coord::new(max.x, min.y),
        Coord::new(max.x, max.y),
        Coord::new(min.x, max.y),
        Coord::new(min.x, min.y),
    ]]))
}

/// Centroid of the geometry vertices.
///
/// This is the mean of all vertices, with the closing point of polygon rings counted once, not the centroid of the
/// area. Returns `None` for geometries without coordinates.
pub fn centroid(geometry: &Geometry) -> Option<Geometry> {
    let mut vertices = Vec::new();
    collect_vertices(geometry, &mut vertices);

    let center = geo_types::MultiPoint::from(vertices).centroid()?;
    Some(Geometry::Point(Coord::new(center.x(), center.y())))
}

fn collect_vertices(geometry: &Geometry, out: &mut Vec<geo_types::Point<f64>>) {
    if let Geometry::GeometryCollection(geometries) = geometry {
        for member in geometries {
            collect_vertices(member, out);
        }
        return;
    }

    let push = |coord: &Coord| out.push(geo_types::Point::new(coord.x, coord.y));
    match geometry {
        Geometry::Point(coord) => std::iter::once(coord).for_each(push),
        Geometry::LineString(line) | Geometry::MultiPoint(line) => line.iter().for_each(push),
        Geometry::MultiLineString(lines) => lines.iter().flatten().for_each(push),
        Geometry::Polygon(rings) => rings.iter().flat_map(|r| ring_vertices(r)).for_each(push),
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flat_map(|r| ring_vertices(r))
            .for_each(push),
        Geometry::GeometryCollection(_) => {}
    }
}

fn ring_vertices(ring: &[Coord]) -> &[Coord] {
    match ring.split_last() {
        Some((_, open)) => open,
        None => ring,
    }
}
