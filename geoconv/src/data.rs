//! Content of a converted document: a bare geometry or features wrapping geometries.

use geoconv_types::Geometry;
use serde_json::{Map, Value};

/// A feature with optional identifier and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature identifier (string or number).
    pub id: Option<Value>,
    /// Feature properties.
    pub properties: Option<Map<String, Value>>,
    /// Geometry of the feature. Features without geometry are allowed by GeoJSON.
    pub geometry: Option<Geometry>,
}

impl Feature {
    fn map_geometry<E>(
        self,
        f: &mut impl FnMut(Geometry) -> Result<Geometry, E>,
    ) -> Result<Self, E> {
        Ok(Feature {
            geometry: self.geometry.map(f).transpose()?,
            ..self
        })
    }
}

/// Parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoData {
    /// A single geometry.
    Geometry(Geometry),
    /// A single feature.
    Feature(Feature),
    /// A list of features.
    FeatureCollection(Vec<Feature>),
}

impl GeoData {
    /// Applies `f` to every geometry of the document, keeping the feature structure.
    pub fn map_geometries<E>(
        self,
        mut f: impl FnMut(Geometry) -> Result<Geometry, E>,
    ) -> Result<Self, E> {
        Ok(match self {
            GeoData::Geometry(geometry) => GeoData::Geometry(f(geometry)?),
            GeoData::Feature(feature) => GeoData::Feature(feature.map_geometry(&mut f)?),
            GeoData::FeatureCollection(features) => GeoData::FeatureCollection(
                features
                    .into_iter()
                    .map(|feature| feature.map_geometry(&mut f))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Collapses the document into a single geometry.
    ///
    /// A feature collection becomes a geometry collection of its feature geometries. Returns `None` if the document
    /// contains no geometry at all.
    pub fn into_geometry(self) -> Option<Geometry> {
        match self {
            GeoData::Geometry(geometry) => Some(geometry),
            GeoData::Feature(feature) => feature.geometry,
            GeoData::FeatureCollection(features) => {
                let geometries: Vec<Geometry> =
                    features.into_iter().filter_map(|f| f.geometry).collect();
                if geometries.is_empty() {
                    None
                } else {
                    Some(Geometry::GeometryCollection(geometries))
                }
            }
        }
    }
}

impl From<Geometry> for GeoData {
    fn from(value: Geometry) -> Self {
        Self::Geometry(value)
    }
}
