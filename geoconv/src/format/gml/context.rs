use geoconv_types::geo::Crs;

use crate::error::GeoconvError;
use crate::format::gml::xml::XmlElement;

/// State inherited down the GML element tree.
///
/// A context is cheap to copy. Elements that declare `srsDimension` or `srsName` get a child context with the
/// override applied, which is then used for their subtree only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseContext<'a> {
    /// Namespace URI of the GML elements.
    pub namespace: &'a str,
    /// Reference system of the coordinates, once resolved.
    pub crs: Option<Crs>,
    /// Coordinate dimension declared by the nearest `srsDimension` attribute.
    pub srs_dimension: Option<usize>,
    /// Coordinate dimension used when no `srsDimension` is declared.
    pub default_stride: usize,
}

impl<'a> ParseContext<'a> {
    /// Root context for GML elements in `namespace`, 2D coordinates and no reference system.
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            crs: None,
            srs_dimension: None,
            default_stride: 2,
        }
    }

    /// Sets the coordinate dimension used when none is declared.
    pub fn with_default_stride(self, default_stride: usize) -> Self {
        Self {
            default_stride,
            ..self
        }
    }

    /// Number of values per coordinate.
    pub fn stride(&self) -> usize {
        self.srs_dimension.unwrap_or(self.default_stride)
    }

    /// Context for the subtree of `element`.
    pub fn child(&self, element: &XmlElement) -> Result<Self, GeoconvError> {
        let mut child = *self;

        if let Some(value) = element.attribute("srsDimension") {
            let dimension = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|dimension| *dimension > 0)
                .ok_or_else(|| {
                    GeoconvError::MalformedGml(format!(
                        "invalid srsDimension attribute value \"{value}\", expected a positive integer"
                    ))
                })?;
            child.srs_dimension = Some(dimension);
        }

        if child.crs.is_none() {
            if let Some(srs_name) = element.attribute("srsName") {
                child.crs = Crs::from_srs_name(srs_name)?;
            }
        }

        Ok(child)
    }
}
