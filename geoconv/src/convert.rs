//! Conversion of a document from one format and reference system into another.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geoconv_types::geo::Crs;
use geoconv_types::orient::{self, LogReporter, OrientationReporter, OrientationStrategy};
use geoconv_types::Geometry;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::GeoData;
use crate::error::GeoconvError;
use crate::format::{geojson, gml, wkt, GeoFormat};
use crate::projector::{self, ProjectOptions};
use crate::reduce;

/// What part of the input geometry is converted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// The whole geometry.
    #[default]
    Full,
    /// Bounding box polygon of the geometry. Points stay points.
    Bbox,
    /// Centroid point of the geometry.
    Centroid,
}

impl FromStr for ConversionMode {
    type Err = GeoconvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "bbox" => Ok(Self::Bbox),
            "centroid" => Ok(Self::Centroid),
            _ => Err(GeoconvError::InvalidRequest(format!(
                "unknown mode \"{s}\", expected one of full, bbox, centroid"
            ))),
        }
    }
}

impl Display for ConversionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Bbox => "bbox",
            Self::Centroid => "centroid",
        })
    }
}

/// Parameters of a conversion.
///
/// Deserializes from the request parameters `importFormat`, `importCRS`, `exportFormat` (required), `exportCRS`,
/// `mode`, `densify` and `orientation`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Format of the input. Detected from the content when not set.
    #[serde(default)]
    pub import_format: Option<GeoFormat>,
    /// Reference system of the input coordinates. For GML this is only used when the document has no `srsName`.
    #[serde(default, rename = "importCRS")]
    pub import_crs: Crs,
    /// Format of the output.
    pub export_format: GeoFormat,
    /// Reference system of the output coordinates.
    #[serde(default, rename = "exportCRS")]
    pub export_crs: Crs,
    /// Conversion mode.
    #[serde(default)]
    pub mode: ConversionMode,
    /// Number of points interpolated into every line segment when reprojecting.
    #[serde(default)]
    pub densify: usize,
    /// Ring orientation handling of GeoJSON and GML output.
    #[serde(default)]
    pub orientation: OrientationStrategy,
}

impl ConversionSettings {
    /// Settings converting WGS84 input of any format into `export_format`.
    pub fn new(export_format: GeoFormat) -> Self {
        Self {
            import_format: None,
            import_crs: Crs::WGS84,
            export_format,
            export_crs: Crs::WGS84,
            mode: ConversionMode::Full,
            densify: 0,
            orientation: OrientationStrategy::Fix,
        }
    }

    /// Declares the input format instead of detecting it.
    pub fn with_import_format(mut self, format: GeoFormat) -> Self {
        self.import_format = Some(format);
        self
    }

    /// Sets the input reference system.
    pub fn with_import_crs(mut self, crs: Crs) -> Self {
        self.import_crs = crs;
        self
    }

    /// Sets the output reference system.
    pub fn with_export_crs(mut self, crs: Crs) -> Self {
        self.export_crs = crs;
        self
    }

    /// Sets the conversion mode.
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the number of interpolated points per segment.
    pub fn with_densify(mut self, densify: usize) -> Self {
        self.densify = densify;
        self
    }

    /// Sets the ring orientation strategy.
    pub fn with_orientation(mut self, orientation: OrientationStrategy) -> Self {
        self.orientation = orientation;
        self
    }

    fn validate(&self, import_format: GeoFormat) -> Result<(), GeoconvError> {
        if import_format == GeoFormat::GeoJson && !self.import_crs.is_wgs84() {
            return Err(GeoconvError::InvalidRequest(format!(
                "GeoJSON input must be in WGS84, got importCRS {}",
                self.import_crs
            )));
        }
        if self.export_format == GeoFormat::GeoJson && !self.export_crs.is_wgs84() {
            return Err(GeoconvError::InvalidRequest(format!(
                "GeoJSON output must be in WGS84, got exportCRS {}",
                self.export_crs
            )));
        }

        Ok(())
    }
}

/// Converts `text` according to `settings`. Orientation diagnostics go to the [`log`] facade.
pub fn convert(text: &str, settings: &ConversionSettings) -> Result<String, GeoconvError> {
    convert_with_reporter(text, settings, &LogReporter)
}

/// Converts `text` according to `settings`, sending orientation diagnostics to `reporter`.
pub fn convert_with_reporter(
    text: &str,
    settings: &ConversionSettings,
    reporter: &dyn OrientationReporter,
) -> Result<String, GeoconvError> {
    if text.trim().is_empty() {
        return Err(GeoconvError::InvalidRequest(
            "request body cannot be empty".into(),
        ));
    }

    let import_format = settings
        .import_format
        .unwrap_or_else(|| GeoFormat::detect(text));
    settings.validate(import_format)?;

    debug!(
        "Converting {import_format} ({}) to {} ({}), mode {}",
        settings.import_crs, settings.export_format, settings.export_crs, settings.mode
    );

    let (data, source_crs) = read(text, import_format, settings.import_crs, reporter)?;
    let data = reduce_data(data, settings.mode)?;
    let data = projector::project_data(
        data,
        source_crs,
        settings.export_crs,
        ProjectOptions::default().with_densify(settings.densify),
    )?;

    write(data, settings, reporter)
}

/// Reads the document. Returns the data with the reference system its coordinates are in.
fn read(
    text: &str,
    format: GeoFormat,
    import_crs: Crs,
    reporter: &dyn OrientationReporter,
) -> Result<(GeoData, Crs), GeoconvError> {
    match format {
        GeoFormat::GeoJson => Ok((geojson::read(text)?, Crs::WGS84)),
        GeoFormat::Wkt => Ok((GeoData::Geometry(wkt::read(text)?), import_crs)),
        GeoFormat::Gml => {
            let geometry = gml::read(text, Some(import_crs), reporter)?.ok_or_else(|| {
                GeoconvError::MalformedGml("unsupported root element".into())
            })?;
            Ok((GeoData::Geometry(geometry), Crs::WGS84))
        }
    }
}

fn reduce_data(data: GeoData, mode: ConversionMode) -> Result<GeoData, GeoconvError> {
    let reducer: fn(&Geometry) -> Option<Geometry> = match mode {
        ConversionMode::Full => return Ok(data),
        ConversionMode::Bbox => reduce::bbox,
        ConversionMode::Centroid => reduce::centroid,
    };

    let geometry = single_geometry(data)?;
    let reduced = reducer(&geometry).ok_or_else(|| {
        GeoconvError::InvalidRequest(format!("cannot compute {mode} of an empty geometry"))
    })?;

    Ok(GeoData::Geometry(reduced))
}

fn single_geometry(data: GeoData) -> Result<Geometry, GeoconvError> {
    data.into_geometry()
        .ok_or_else(|| GeoconvError::InvalidRequest("document contains no geometry".into()))
}

fn write(
    data: GeoData,
    settings: &ConversionSettings,
    reporter: &dyn OrientationReporter,
) -> Result<String, GeoconvError> {
    match settings.export_format {
        GeoFormat::GeoJson => {
            let data = data.map_geometries(|geometry| {
                orient::enforce(geometry, settings.orientation, reporter)
            })?;
            geojson::write(&data)
        }
        GeoFormat::Wkt => wkt::write(&single_geometry(data)?),
        GeoFormat::Gml => {
            let geometry = orient::enforce(single_geometry(data)?, settings.orientation, reporter)?;
            let srs_name =
                (!settings.export_crs.is_wgs84()).then(|| settings.export_crs.to_string());
            gml::write(&geometry, srs_name.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geoconv_types::GeoconvTypesError;

    use super::*;

    #[test]
    fn settings_from_request_parameters() {
        let settings: ConversionSettings = serde_json::from_str(
            r#"{"exportFormat": "gml", "importCRS": "EPSG:25832", "mode": "bbox", "densify": 2}"#,
        )
        .expect("valid settings");

        assert_eq!(
            settings,
            ConversionSettings::new(GeoFormat::Gml)
                .with_import_crs(Crs::from_code(25832).expect("supported code"))
                .with_mode(ConversionMode::Bbox)
                .with_densify(2)
        );
    }

    #[test]
    fn settings_require_export_format() {
        assert!(serde_json::from_str::<ConversionSettings>(r#"{"mode": "full"}"#).is_err());
        assert!(
            serde_json::from_str::<ConversionSettings>(r#"{"exportFormat": "kml"}"#).is_err()
        );
    }

    #[test]
    fn mode_tokens() {
        assert_eq!("Centroid".parse(), Ok(ConversionMode::Centroid));
        assert_eq!(ConversionMode::Bbox.to_string(), "bbox");
        assert_matches!(
            "extent".parse::<ConversionMode>(),
            Err(GeoconvError::InvalidRequest(_))
        );
    }

    #[test]
    fn empty_body() {
        for format in GeoFormat::ALL {
            let settings = ConversionSettings::new(GeoFormat::GeoJson).with_import_format(format);
            assert_matches!(
                convert(" \n\t", &settings),
                Err(GeoconvError::InvalidRequest(_))
            );
        }
    }

    #[test]
    fn geojson_is_wgs84_only() {
        let settings = ConversionSettings::new(GeoFormat::GeoJson).with_export_crs(Crs::EPSG3857);
        assert_matches!(
            convert("POINT (1 2)", &settings),
            Err(GeoconvError::InvalidRequest(_))
        );

        let settings = ConversionSettings::new(GeoFormat::Wkt).with_import_crs(Crs::EPSG3857);
        assert_matches!(
            convert(r#"{"type": "Point", "coordinates": [1, 2]}"#, &settings),
            Err(GeoconvError::InvalidRequest(_))
        );
    }

    #[test]
    fn unknown_gml_root() {
        let settings = ConversionSettings::new(GeoFormat::Wkt);
        assert_matches!(
            convert("<gml:Solid/>", &settings),
            Err(GeoconvError::MalformedGml(_))
        );
    }

    #[test]
    fn clockwise_geojson_output() {
        let text = "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))";

        let fixed = convert(text, &ConversionSettings::new(GeoFormat::GeoJson))
            .expect("conversion failed");
        assert_eq!(
            fixed,
            r#"{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#
        );

        let settings = ConversionSettings::new(GeoFormat::GeoJson)
            .with_orientation(OrientationStrategy::Error);
        assert_matches!(
            convert(text, &settings),
            Err(GeoconvError::Types(
                GeoconvTypesError::InconsistentRingOrientation(_)
            ))
        );

        let settings = ConversionSettings::new(GeoFormat::Wkt)
            .with_orientation(OrientationStrategy::Error);
        assert!(convert(text, &settings).is_ok());
    }

    #[test]
    fn clockwise_gml_output() {
        let text = "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))";

        let fixed =
            convert(text, &ConversionSettings::new(GeoFormat::Gml)).expect("conversion failed");
        assert!(fixed.contains("<gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList>"));

        let settings = ConversionSettings::new(GeoFormat::Gml)
            .with_orientation(OrientationStrategy::Error);
        assert_matches!(
            convert(text, &settings),
            Err(GeoconvError::Types(
                GeoconvTypesError::InconsistentRingOrientation(_)
            ))
        );
    }

    #[test]
    fn pole_to_web_mercator() {
        let settings = ConversionSettings::new(GeoFormat::Gml).with_export_crs(Crs::EPSG3857);
        assert_matches!(
            convert(r#"{"type": "Point", "coordinates": [0, 90]}"#, &settings),
            Err(GeoconvError::Types(GeoconvTypesError::Projection(_)))
        );
    }
}
