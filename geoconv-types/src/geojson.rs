//! Conversion from [`geojson`] geometry values.

use geojson::{PolygonType, Position, Value};

use crate::coord::Coord;
use crate::error::GeoconvTypesError;
use crate::geometry::{is_closed, Geometry, Line, PolygonRings, Ring};

impl TryFrom<&Value> for Geometry {
    type Error = GeoconvTypesError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Point(p) => Geometry::Point(convert_position(p)?),
            Value::MultiPoint(points) => Geometry::MultiPoint(convert_line(points)?),
            Value::LineString(line) => Geometry::LineString(convert_line(line)?),
            Value::MultiLineString(lines) => Geometry::MultiLineString(
                lines
                    .iter()
                    .map(|l| convert_line(l))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Polygon(polygon) => Geometry::Polygon(convert_polygon(polygon)?),
            Value::MultiPolygon(mp) => Geometry::MultiPolygon(
                mp.iter()
                    .map(convert_polygon)
                    .collect::<Result<_, _>>()?,
            ),
            Value::GeometryCollection(geometries) => Geometry::GeometryCollection(
                geometries
                    .iter()
                    .map(|g| Geometry::try_from(&g.value))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

fn convert_position(position: &Position) -> Result<Coord, GeoconvTypesError> {
    let coord = Coord::from_ordinates(position).ok_or_else(|| {
        GeoconvTypesError::Conversion(format!(
            "position must have at least 2 elements, got {}",
            position.len()
        ))
    })?;

    if !coord.is_finite() {
        return Err(GeoconvTypesError::Conversion(
            "position elements must be finite numbers".into(),
        ));
    }

    Ok(coord)
}

fn convert_line(positions: &[Position]) -> Result<Line, GeoconvTypesError> {
    positions.iter().map(convert_position).collect()
}

fn convert_ring(positions: &[Position]) -> Result<Ring, GeoconvTypesError> {
    let ring = convert_line(positions)?;
    if ring.len() < 4 || !is_closed(&ring) {
        return Err(GeoconvTypesError::Conversion(
            "polygon ring must be closed and have at least 4 positions".into(),
        ));
    }

    Ok(ring)
}

fn convert_polygon(polygon: &PolygonType) -> Result<PolygonRings, GeoconvTypesError> {
    polygon.iter().map(|ring| convert_ring(ring)).collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn polygon_with_elevation() {
        let value = Value::Polygon(vec![vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0],
        ]]);

        let geometry = Geometry::try_from(&value).expect("valid polygon");
        assert_eq!(geometry.dimensions(), 3);
        assert_matches!(geometry, Geometry::Polygon(rings) if rings[0].len() == 4);
    }

    #[test]
    fn short_position() {
        let value = Value::LineString(vec![vec![0.0, 0.0], vec![1.0]]);
        assert_matches!(Geometry::try_from(&value), Err(GeoconvTypesError::Conversion(_)));
    }

    #[test]
    fn open_ring() {
        let value = Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]]);
        assert_matches!(Geometry::try_from(&value), Err(GeoconvTypesError::Conversion(_)));
    }

    #[test]
    fn nested_collection() {
        let value = Value::GeometryCollection(vec![geojson::Geometry::new(Value::Point(vec![1.0, 2.0]))]);
        assert_eq!(
            Geometry::try_from(&value),
            Ok(Geometry::GeometryCollection(vec![Geometry::Point(Coord::new(1.0, 2.0))]))
        );
    }
}
