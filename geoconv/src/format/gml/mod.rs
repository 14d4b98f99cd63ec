//! GML 3.2 geometry reader and writer.
//!
//! Reading is done in two steps: the text is read into an [`XmlElement`] tree, and then [`GmlParser`] walks the tree
//! starting from the root element.

mod context;
mod reader;
mod writer;
mod xml;

pub use context::ParseContext;
use geoconv_types::geo::Crs;
use geoconv_types::{Geometry, OrientationReporter};
pub use reader::GmlParser;
pub use writer::write;
pub use xml::{XmlElement, XmlNode};

use crate::error::GeoconvError;

/// GML 3.2 namespace URI.
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";

/// Reads a GML geometry document into WGS84 coordinates.
///
/// `default_crs` is the reference system of documents without an `srsName`. Returns `Ok(None)` if the root element
/// is not a known GML geometry.
pub fn read(
    text: &str,
    default_crs: Option<Crs>,
    reporter: &dyn OrientationReporter,
) -> Result<Option<Geometry>, GeoconvError> {
    let root = XmlElement::parse(text)?;
    GmlParser::new(reporter)
        .with_default_crs(default_crs)
        .parse(&root, ParseContext::new(GML_NAMESPACE))
}
