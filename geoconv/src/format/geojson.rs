//! GeoJSON reader and writer.
//!
//! Reading goes through the [`geojson`] crate. Writing uses serde mirror types so that integral numbers are written
//! without a fractional part and `type` is always the first member of an object.

use geoconv_types::geo::Crs;
use geoconv_types::{Coord, Geometry};
use geojson::GeoJson;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::data::{Feature, GeoData};
use crate::error::GeoconvError;

/// Largest magnitude written as an integer. Beyond it `f64` values can no longer be told apart from their neighbours.
const MAX_INTEGRAL: f64 = 1e15;

/// Reads a GeoJSON geometry, feature or feature collection.
pub fn read(text: &str) -> Result<GeoData, GeoconvError> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        let offset = char_offset(text, err.line(), err.column());
        GeoconvError::GeoJson {
            message: err.to_string(),
            from: offset,
            to: (offset + 1).min(text.chars().count()),
        }
    })?;

    check_legacy_crs(&value)?;

    let geojson = GeoJson::from_json_value(value).map_err(|err| GeoconvError::GeoJson {
        message: err.to_string(),
        from: 0,
        to: text.chars().count(),
    })?;

    Ok(match geojson {
        GeoJson::Geometry(geometry) => GeoData::Geometry(Geometry::try_from(&geometry.value)?),
        GeoJson::Feature(feature) => GeoData::Feature(convert_feature(feature)?),
        GeoJson::FeatureCollection(collection) => GeoData::FeatureCollection(
            collection
                .features
                .into_iter()
                .map(convert_feature)
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Writes the document as compact GeoJSON.
pub fn write(data: &GeoData) -> Result<String, GeoconvError> {
    let entity = match data {
        GeoData::Geometry(geometry) => JsonEntity::Geometry(JsonGeometry::from(geometry)),
        GeoData::Feature(feature) => JsonEntity::Feature(JsonFeature::from(feature)),
        GeoData::FeatureCollection(features) => {
            JsonEntity::FeatureCollection(JsonFeatureCollection {
                features: features.iter().map(JsonFeature::from).collect(),
            })
        }
    };

    serde_json::to_string(&entity).map_err(|err| GeoconvError::Generic(err.to_string()))
}

fn convert_feature(feature: geojson::Feature) -> Result<Feature, GeoconvError> {
    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => Value::String(s),
        geojson::feature::Id::Number(n) => Value::Number(n),
    });
    let geometry = feature
        .geometry
        .map(|g| Geometry::try_from(&g.value))
        .transpose()?;

    Ok(Feature {
        id,
        properties: feature.properties,
        geometry,
    })
}

/// GeoJSON coordinates are always WGS84. The legacy `crs` member is accepted only if it says so.
fn check_legacy_crs(value: &Value) -> Result<(), GeoconvError> {
    let Some(crs) = value.get("crs") else {
        return Ok(());
    };

    let name = crs
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str);
    let is_wgs84 = match name {
        Some(name) => matches!(Crs::from_srs_name(name), Ok(Some(crs)) if crs == Crs::WGS84),
        None => crs.is_null(),
    };

    if is_wgs84 {
        Ok(())
    } else {
        Err(GeoconvError::InvalidRequest(format!(
            "GeoJSON coordinates must be WGS84, but the document declares CRS {crs}"
        )))
    }
}

fn char_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, content) in text.split('\n').enumerate() {
        if index + 1 == line {
            return offset + column.saturating_sub(1).min(content.chars().count());
        }
        offset += content.chars().count() + 1;
    }

    text.chars().count()
}

struct JsonNumber(f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() < MAX_INTEGRAL {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

struct Position<'a>(&'a Coord);

impl Serialize for Position<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordinates = self.0.ordinates();
        let mut seq = serializer.serialize_seq(Some(ordinates.len()))?;
        for value in ordinates {
            seq.serialize_element(&JsonNumber(value))?;
        }
        seq.end()
    }
}

struct Positions<'a>(&'a [Coord]);

impl Serialize for Positions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(Position))
    }
}

fn positions<'a>(lines: &'a [Vec<Coord>]) -> Vec<Positions<'a>> {
    lines.iter().map(|line| Positions(line)).collect()
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonGeometry<'a> {
    Point { coordinates: Position<'a> },
    MultiPoint { coordinates: Positions<'a> },
    LineString { coordinates: Positions<'a> },
    MultiLineString { coordinates: Vec<Positions<'a>> },
    Polygon { coordinates: Vec<Positions<'a>> },
    MultiPolygon { coordinates: Vec<Vec<Positions<'a>>> },
    GeometryCollection { geometries: Vec<JsonGeometry<'a>> },
}

impl<'a> From<&'a Geometry> for JsonGeometry<'a> {
    fn from(value: &'a Geometry) -> Self {
        match value {
            Geometry::Point(p) => JsonGeometry::Point {
                coordinates: Position(p),
            },
            Geometry::MultiPoint(points) => JsonGeometry::MultiPoint {
                coordinates: Positions(points),
            },
            Geometry::LineString(line) => JsonGeometry::LineString {
                coordinates: Positions(line),
            },
            Geometry::MultiLineString(lines) => JsonGeometry::MultiLineString {
                coordinates: positions(lines),
            },
            Geometry::Polygon(rings) => JsonGeometry::Polygon {
                coordinates: positions(rings),
            },
            Geometry::MultiPolygon(polygons) => JsonGeometry::MultiPolygon {
                coordinates: polygons.iter().map(|p| positions(p)).collect(),
            },
            Geometry::GeometryCollection(geometries) => JsonGeometry::GeometryCollection {
                geometries: geometries.iter().map(JsonGeometry::from).collect(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "Feature")]
struct JsonFeature<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a Value>,
    geometry: Option<JsonGeometry<'a>>,
    properties: Option<&'a Map<String, Value>>,
}

impl<'a> From<&'a Feature> for JsonFeature<'a> {
    fn from(value: &'a Feature) -> Self {
        Self {
            id: value.id.as_ref(),
            geometry: value.geometry.as_ref().map(JsonGeometry::from),
            properties: value.properties.as_ref(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
struct JsonFeatureCollection<'a> {
    features: Vec<JsonFeature<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntity<'a> {
    Geometry(JsonGeometry<'a>),
    Feature(JsonFeature<'a>),
    FeatureCollection(JsonFeatureCollection<'a>),
}
