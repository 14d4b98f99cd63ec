//! Readers and writers of the supported text formats.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoconvError;

pub mod geojson;
pub mod gml;
pub mod wkt;

/// Text encoding of a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoFormat {
    /// GeoJSON (RFC 7946).
    GeoJson,
    /// GML 3.2 geometry element.
    Gml,
    /// Well-known text.
    Wkt,
}

impl GeoFormat {
    /// All supported formats.
    pub const ALL: [GeoFormat; 3] = [GeoFormat::GeoJson, GeoFormat::Gml, GeoFormat::Wkt];

    /// Token used in requests for the format.
    pub fn token(&self) -> &'static str {
        match self {
            GeoFormat::GeoJson => "geojson",
            GeoFormat::Gml => "gml",
            GeoFormat::Wkt => "wkt",
        }
    }

    /// Media type of documents in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            GeoFormat::GeoJson => "text/json",
            GeoFormat::Gml => "application/gml+xml",
            GeoFormat::Wkt => "text/plain",
        }
    }

    /// Format declared by a `Content-Type` value. Parameters such as `charset` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type.split(';').next()?.trim().to_ascii_lowercase();
        match media_type.as_str() {
            "text/json" | "application/json" | "application/geo+json" => Some(GeoFormat::GeoJson),
            "application/gml+xml" | "application/xml" | "text/xml" => Some(GeoFormat::Gml),
            "text/plain" => Some(GeoFormat::Wkt),
            _ => None,
        }
    }

    /// Guesses the format from the first non-whitespace character: `[` or `{` is GeoJSON, `<` is GML, anything else
    /// is WKT.
    pub fn detect(text: &str) -> Self {
        match text.trim_start().chars().next() {
            Some('[' | '{') => GeoFormat::GeoJson,
            Some('<') => GeoFormat::Gml,
            _ => GeoFormat::Wkt,
        }
    }
}

impl FromStr for GeoFormat {
    type Err = GeoconvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GeoconvError::InvalidRequest(format!(
                    "unknown format \"{s}\", expected one of geojson, gml, wkt"
                ))
            })
    }
}

impl Display for GeoFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
