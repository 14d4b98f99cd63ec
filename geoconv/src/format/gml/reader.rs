//! Recursive descent over GML geometry elements.
//!
//! Every element kind has its own method. Methods take the context of the parent element and derive their own
//! with [`ParseContext::child`], so `srsDimension` and `srsName` declared anywhere in the tree apply to exactly the
//! subtree they are declared on.

use std::cell::RefCell;
use std::collections::HashMap;

use geoconv_types::geo::projection::BoxedProjection;
use geoconv_types::geo::Crs;
use geoconv_types::orient::{self, OrientationReporter, OrientationStrategy};
use geoconv_types::{Coord, GeoconvTypesError, Geometry, PolygonRings, Ring};
use log::debug;

use crate::error::GeoconvError;
use crate::format::gml::context::ParseContext;
use crate::format::gml::xml::XmlElement;

/// Geometry elements that can be the root of a parsed document.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum GeometryTag {
    Point,
    LineString,
    Curve,
    MultiCurve,
    Polygon,
    Rectangle,
    Surface,
    CompositeSurface,
    MultiSurface,
    MultiPoint,
    MultiGeometry,
    Envelope,
}

impl GeometryTag {
    fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "Point" => Self::Point,
            "LineString" => Self::LineString,
            "Curve" => Self::Curve,
            "MultiCurve" => Self::MultiCurve,
            "Polygon" => Self::Polygon,
            "Rectangle" => Self::Rectangle,
            "Surface" => Self::Surface,
            "CompositeSurface" => Self::CompositeSurface,
            "MultiSurface" => Self::MultiSurface,
            "MultiPoint" => Self::MultiPoint,
            "MultiGeometry" => Self::MultiGeometry,
            "Envelope" => Self::Envelope,
            _ => return None,
        })
    }
}

/// Converts GML geometry elements into [`Geometry`] values in WGS84.
///
/// Coordinates are transformed from the reference system named by the nearest `srsName` attribute. If the document
/// names none, the default reference system is used, and without one coordinates are taken as WGS84.
///
/// Line strings, polygons and surfaces are normalized to counterclockwise orientation with
/// [`OrientationStrategy::Fix`]. Diagnostics of that step go to the reporter.
pub struct GmlParser<'a> {
    reporter: &'a dyn OrientationReporter,
    default_crs: Option<Crs>,
    projections: RefCell<HashMap<Crs, BoxedProjection>>,
}

impl<'a> GmlParser<'a> {
    /// Creates a new parser.
    pub fn new(reporter: &'a dyn OrientationReporter) -> Self {
        Self {
            reporter,
            default_crs: None,
            projections: RefCell::new(HashMap::new()),
        }
    }

    /// Sets the reference system of documents that do not declare one.
    pub fn with_default_crs(mut self, crs: Option<Crs>) -> Self {
        self.default_crs = crs;
        self
    }

    /// Parses the geometry rooted at `element`.
    ///
    /// Returns `Ok(None)` if the element is not a known GML geometry element.
    pub fn parse(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Option<Geometry>, GeoconvError> {
        if element.namespace.as_deref() != Some(ctx.namespace) {
            return Ok(None);
        }
        let Some(tag) = GeometryTag::from_local_name(&element.name) else {
            return Ok(None);
        };

        debug!("Parsing {} as {tag:?}", element.qualified_name);

        let geometry = match tag {
            GeometryTag::Point => Geometry::Point(self.point(element, ctx)?),
            GeometryTag::LineString => {
                self.oriented(Geometry::LineString(self.line_string(element, ctx)?))?
            }
            GeometryTag::Curve => self.oriented(Geometry::LineString(self.curve(element, ctx)?))?,
            GeometryTag::MultiCurve => Geometry::MultiLineString(vec![self.ring(element, ctx)?]),
            GeometryTag::Polygon | GeometryTag::Rectangle => {
                self.oriented(Geometry::Polygon(self.polygon(element, ctx)?))?
            }
            GeometryTag::Surface => {
                self.oriented(Geometry::MultiPolygon(self.surface(element, ctx)?))?
            }
            GeometryTag::CompositeSurface => {
                self.oriented(Geometry::MultiPolygon(self.composite_surface(element, ctx)?))?
            }
            GeometryTag::MultiSurface => {
                self.oriented(Geometry::MultiPolygon(self.multi_surface(element, ctx)?))?
            }
            GeometryTag::MultiPoint => Geometry::MultiPoint(self.multi_point(element, ctx)?),
            GeometryTag::MultiGeometry => {
                Geometry::GeometryCollection(self.multi_geometry(element, ctx)?)
            }
            GeometryTag::Envelope => Geometry::LineString(self.envelope(element, ctx)?),
        };

        Ok(Some(geometry))
    }

    fn oriented(&self, geometry: Geometry) -> Result<Geometry, GeoconvError> {
        Ok(orient::enforce(
            geometry,
            OrientationStrategy::Fix,
            self.reporter,
        )?)
    }

    fn coordinates(&self, text: &str, ctx: ParseContext) -> Result<Vec<Coord>, GeoconvError> {
        let stride = ctx.stride();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if stride < 2 || tokens.is_empty() || tokens.len() % stride != 0 {
            return Err(GeoconvError::InvalidCoordinateList {
                stride,
                count: tokens.len(),
            });
        }

        let values = tokens
            .iter()
            .map(|token| {
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| {
                        GeoconvError::MalformedGml(format!(
                            "invalid number \"{token}\" in coordinates list"
                        ))
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let crs = ctx.crs.or(self.default_crs).filter(|crs| !crs.is_wgs84());
        values
            .chunks(stride)
            .filter_map(Coord::from_ordinates)
            .map(|coord| match crs {
                Some(crs) => self.to_wgs84(crs, coord),
                None => Ok(coord),
            })
            .collect()
    }

    fn to_wgs84(&self, crs: Crs, coord: Coord) -> Result<Coord, GeoconvError> {
        let mut projections = self.projections.borrow_mut();
        let projection = match projections.entry(crs) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(crs.get_projection()?)
            }
        };

        projection.unproject(&coord).ok_or_else(|| {
            GeoconvTypesError::Projection(format!("{} {} from {crs}", coord.x, coord.y)).into()
        })
    }

    fn pos(&self, element: &XmlElement, ctx: ParseContext) -> Result<Coord, GeoconvError> {
        let ctx = ctx.child(element)?;
        let coords = self.coordinates(&element.text_content(), ctx)?;
        match coords.as_slice() {
            [coord] => Ok(*coord),
            _ => Err(GeoconvError::MalformedGml(format!(
                "{} must have 1 point",
                element.qualified_name
            ))),
        }
    }

    fn pos_list(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;
        self.coordinates(&element.text_content(), ctx)
    }

    fn point(&self, element: &XmlElement, ctx: ParseContext) -> Result<Coord, GeoconvError> {
        let ctx = ctx.child(element)?;
        let pos = element
            .find(ctx.namespace, &["pos"])
            .ok_or_else(|| invalid(element, "expected a pos subelement"))?;
        self.pos(pos, ctx)
    }

    /// `LineString`, `LineStringSegment`, `LinearRing` or `Arc`.
    fn line_string(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let points = match element.find(ctx.namespace, &["posList"]) {
            Some(pos_list) => self.pos_list(pos_list, ctx)?,
            None => element
                .find_all(ctx.namespace, &["Point", "pos"])
                .into_iter()
                .map(|member| {
                    if member.name == "Point" {
                        self.point(member, ctx)
                    } else {
                        self.pos(member, ctx)
                    }
                })
                .collect::<Result<_, _>>()?,
        };

        if points.is_empty() {
            return Err(GeoconvError::MalformedGml(format!(
                "{} must have > 0 points",
                element.qualified_name
            )));
        }

        Ok(points)
    }

    fn curve(&self, element: &XmlElement, ctx: ParseContext) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;
        let segments = element
            .find(ctx.namespace, &["segments"])
            .ok_or_else(|| invalid(element, "expected a segments subelement"))?;
        self.curve_segments(segments, ctx)
    }

    fn curve_segments(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Coord>, GeoconvError> {
        let mut points = Vec::new();
        let segments =
            element.find_all(ctx.namespace, &["LineStringSegment", "LineString", "Arc"]);
        for segment in segments {
            append_deduplicated(&mut points, self.line_string(segment, ctx)?);
        }

        if points.is_empty() {
            return Err(GeoconvError::MalformedGml(format!(
                "{} must have > 0 points",
                element.qualified_name
            )));
        }

        Ok(points)
    }

    /// `Ring` built from `curveMember`s. `MultiCurve` is read the same way.
    fn ring(&self, element: &XmlElement, ctx: ParseContext) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let mut points = Vec::new();
        for member in element.find_all(ctx.namespace, &["curveMember"]) {
            let member_points = if let Some(line) = member.find(ctx.namespace, &["LineString"]) {
                self.line_string(line, ctx)?
            } else if let Some(segments) = member.find(ctx.namespace, &["Curve", "segments"]) {
                self.curve_segments(segments, ctx)?
            } else {
                return Err(invalid(member, "expected a LineString or Curve"));
            };
            append_deduplicated(&mut points, member_points);
        }

        if points.len() < 4 {
            return Err(GeoconvError::MalformedGml(format!(
                "{} must have >= 4 points",
                element.qualified_name
            )));
        }

        Ok(points)
    }

    fn exterior_or_interior(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Ring, GeoconvError> {
        let ring = if let Some(linear_ring) = element.find(ctx.namespace, &["LinearRing"]) {
            let points = self.line_string(linear_ring, ctx)?;
            if points.len() < 4 {
                return Err(GeoconvError::MalformedGml(format!(
                    "{} must have >= 4 points",
                    linear_ring.qualified_name
                )));
            }
            points
        } else if let Some(ring) = element.find(ctx.namespace, &["Ring"]) {
            self.ring(ring, ctx)?
        } else {
            return Err(invalid(element, "expected a LinearRing or Ring"));
        };

        if !geoconv_types::geometry::is_closed(&ring) {
            return Err(GeoconvError::MalformedGml(format!(
                "{} ring is not closed",
                element.qualified_name
            )));
        }

        Ok(ring)
    }

    /// `Polygon`, `Rectangle` or `PolygonPatch`.
    fn polygon(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<PolygonRings, GeoconvError> {
        let ctx = ctx.child(element)?;

        let exterior = element
            .find(ctx.namespace, &["exterior"])
            .ok_or_else(|| invalid(element, "expected an exterior subelement"))?;

        let mut rings = vec![self.exterior_or_interior(exterior, ctx)?];
        for interior in element.find_all(ctx.namespace, &["interior"]) {
            rings.push(self.exterior_or_interior(interior, ctx)?);
        }

        Ok(rings)
    }

    fn surface(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<PolygonRings>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let patches = element
            .find(ctx.namespace, &["patches"])
            .ok_or_else(|| invalid(element, "expected a patches subelement"))?;
        let polygons = patches
            .find_all(ctx.namespace, &["PolygonPatch", "Rectangle"])
            .into_iter()
            .map(|patch| self.polygon(patch, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        non_empty_polygons(element, polygons)
    }

    fn composite_surface(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<PolygonRings>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let mut polygons = Vec::new();
        for member in element.find_all(ctx.namespace, &["surfaceMember"]) {
            self.surface_member(member, ctx, &mut polygons)?;
        }

        non_empty_polygons(element, polygons)
    }

    fn multi_surface(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<PolygonRings>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let mut polygons = Vec::new();
        let members =
            element.find_all(ctx.namespace, &["Surface", "surfaceMember", "surfaceMembers"]);
        for member in members {
            match member.name.as_str() {
                "Surface" => polygons.extend(self.surface(member, ctx)?),
                "surfaceMember" => self.surface_member(member, ctx, &mut polygons)?,
                _ => {
                    for surface in member.child_elements() {
                        self.surface_element(surface, ctx, &mut polygons)?;
                    }
                }
            }
        }

        non_empty_polygons(element, polygons)
    }

    fn surface_member(
        &self,
        member: &XmlElement,
        ctx: ParseContext,
        polygons: &mut Vec<PolygonRings>,
    ) -> Result<(), GeoconvError> {
        let surface = member
            .child_elements()
            .next()
            .ok_or_else(|| invalid(member, "expected a surface subelement"))?;
        self.surface_element(surface, ctx, polygons)
    }

    fn surface_element(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
        polygons: &mut Vec<PolygonRings>,
    ) -> Result<(), GeoconvError> {
        if element.namespace.as_deref() != Some(ctx.namespace) {
            return Err(invalid(element, "unsupported surface member"));
        }

        match element.name.as_str() {
            "Surface" => polygons.extend(self.surface(element, ctx)?),
            "CompositeSurface" => polygons.extend(self.composite_surface(element, ctx)?),
            "Polygon" => polygons.push(self.polygon(element, ctx)?),
            _ => return Err(invalid(element, "unsupported surface member")),
        }

        Ok(())
    }

    fn multi_point(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let points = element
            .find_all(ctx.namespace, &["Point"])
            .into_iter()
            .map(|point| self.point(point, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if points.is_empty() {
            return Err(GeoconvError::MalformedGml(format!(
                "{} must have > 0 points",
                element.qualified_name
            )));
        }

        Ok(points)
    }

    fn multi_geometry(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Geometry>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let mut geometries = Vec::new();
        for member in element.find_all(ctx.namespace, &["geometryMember", "geometryMembers"]) {
            for child in member.child_elements() {
                let geometry = self
                    .parse(child, ctx)?
                    .ok_or_else(|| invalid(child, "unsupported geometry member"))?;
                geometries.push(geometry);
            }
        }

        if geometries.is_empty() {
            return Err(GeoconvError::MalformedGml(format!(
                "{} must have > 0 geometries",
                element.qualified_name
            )));
        }

        Ok(geometries)
    }

    /// Envelope as a line from the lower to the upper corner.
    fn envelope(
        &self,
        element: &XmlElement,
        ctx: ParseContext,
    ) -> Result<Vec<Coord>, GeoconvError> {
        let ctx = ctx.child(element)?;

        let lower = element
            .find(ctx.namespace, &["lowerCorner"])
            .ok_or_else(|| invalid(element, "expected a lowerCorner subelement"))?;
        let upper = element
            .find(ctx.namespace, &["upperCorner"])
            .ok_or_else(|| invalid(element, "expected an upperCorner subelement"))?;

        Ok(vec![self.pos(lower, ctx)?, self.pos(upper, ctx)?])
    }
}

fn invalid(element: &XmlElement, reason: &str) -> GeoconvError {
    GeoconvError::MalformedGml(format!("invalid {} element, {reason}", element.qualified_name))
}

fn non_empty_polygons(
    element: &XmlElement,
    polygons: Vec<PolygonRings>,
) -> Result<Vec<PolygonRings>, GeoconvError> {
    if polygons.is_empty() {
        return Err(GeoconvError::MalformedGml(format!(
            "{} must have > 0 polygons",
            element.qualified_name
        )));
    }

    Ok(polygons)
}

/// Appends `next` to `points`, skipping its first point if it repeats the last one.
fn append_deduplicated(points: &mut Vec<Coord>, next: Vec<Coord>) {
    let skip = match (points.last(), next.first()) {
        (Some(end), Some(start)) => usize::from(end == start),
        _ => 0,
    };
    points.extend(next.into_iter().skip(skip));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use geoconv_types::contour::{CartesianClosedContour, Winding};
    use log::Level;

    use super::*;
    use crate::format::gml::read;

    #[derive(Default)]
    struct TestReporter {
        levels: RefCell<Vec<Level>>,
    }

    impl OrientationReporter for TestReporter {
        fn report(&self, level: Level, _message: &str) {
            self.levels.borrow_mut().push(level);
        }
    }

    fn parse(text: &str) -> Result<Option<Geometry>, GeoconvError> {
        read(text, None, &TestReporter::default())
    }

    fn parse_geometry(text: &str) -> Geometry {
        parse(text)
            .expect("valid GML")
            .expect("known geometry element")
    }

    fn coords(values: &[(f64, f64)]) -> Vec<Coord> {
        values.iter().map(|(x, y)| Coord::new(*x, *y)).collect()
    }

    #[test]
    fn point() {
        let geometry = parse_geometry("<gml:Point><gml:pos>40 10</gml:pos></gml:Point>");
        assert_eq!(geometry, Geometry::Point(Coord::new(40.0, 10.0)));
    }

    #[test]
    fn point_with_elevation() {
        let geometry = parse_geometry(
            r#"<gml:Point srsDimension="3"><gml:pos>1 2 3</gml:pos></gml:Point>"#,
        );
        assert_eq!(geometry, Geometry::Point(Coord::xyz(1.0, 2.0, 3.0)));
    }

    #[test]
    fn ordinates_after_elevation_are_dropped() {
        let geometry = parse_geometry(
            r#"<gml:LineString srsDimension="4"><gml:posList>0 0 1 7 10 0 2 8</gml:posList></gml:LineString>"#,
        );
        assert_eq!(
            geometry,
            Geometry::LineString(vec![Coord::xyz(0.0, 0.0, 1.0), Coord::xyz(10.0, 0.0, 2.0)])
        );
    }

    #[test]
    fn line_string_from_pos_list() {
        let geometry = parse_geometry(
            r#"<gml:LineString xmlns:gml="http://www.opengis.net/gml/3.2">
                <gml:posList srsDimension="3">0 0 1
                    10 0 2   10 10 3</gml:posList>
            </gml:LineString>"#,
        );
        assert_eq!(
            geometry,
            Geometry::LineString(vec![
                Coord::xyz(0.0, 0.0, 1.0),
                Coord::xyz(10.0, 0.0, 2.0),
                Coord::xyz(10.0, 10.0, 3.0),
            ])
        );
    }

    #[test]
    fn line_string_from_points_and_positions() {
        let geometry = parse_geometry(
            r#"<gml:LineString>
                <gml:pointProperty><gml:Point><gml:pos>0 0</gml:pos></gml:Point></gml:pointProperty>
                <gml:pos>5 0</gml:pos>
                <gml:pointProperty><gml:Point><gml:pos>5 5</gml:pos></gml:Point></gml:pointProperty>
            </gml:LineString>"#,
        );
        assert_eq!(
            geometry,
            Geometry::LineString(coords(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]))
        );
    }

    #[test]
    fn stride_mismatch() {
        assert_matches!(
            parse("<gml:LineString><gml:posList>0 0 1</gml:posList></gml:LineString>"),
            Err(GeoconvError::InvalidCoordinateList { stride: 2, count: 3 })
        );
        assert_matches!(
            parse(r#"<gml:LineString srsDimension="3"><gml:posList>0 0 1 1</gml:posList></gml:LineString>"#),
            Err(GeoconvError::InvalidCoordinateList { stride: 3, count: 4 })
        );
        assert_matches!(
            parse(r#"<gml:Point srsDimension="1"><gml:pos>0</gml:pos></gml:Point>"#),
            Err(GeoconvError::InvalidCoordinateList { stride: 1, count: 1 })
        );
        assert_matches!(
            parse("<gml:Point><gml:pos> </gml:pos></gml:Point>"),
            Err(GeoconvError::InvalidCoordinateList { count: 0, .. })
        );
    }

    #[test]
    fn invalid_numbers() {
        assert_matches!(
            parse("<gml:Point><gml:pos>1 north</gml:pos></gml:Point>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("north")
        );
        assert_matches!(
            parse("<gml:Point><gml:pos>1 NaN</gml:pos></gml:Point>"),
            Err(GeoconvError::MalformedGml(_))
        );
    }

    #[test]
    fn missing_children() {
        assert_matches!(
            parse("<gml:Point><gml:coordinates>1,2</gml:coordinates></gml:Point>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("gml:Point")
        );
        assert_matches!(
            parse("<gml:Polygon><gml:interior/></gml:Polygon>"),
            Err(GeoconvError::MalformedGml(_))
        );
        assert_matches!(
            parse("<gml:LineString></gml:LineString>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("> 0 points")
        );
        assert_matches!(
            parse("<gml:Point><gml:pos>1 2 3 4</gml:pos></gml:Point>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("1 point")
        );
    }

    #[test]
    fn unknown_root() {
        assert_eq!(parse("<gml:Solid/>"), Ok(None));
        assert_eq!(parse("<Point><pos>1 2</pos></Point>"), Ok(None));
        assert_eq!(
            parse(r#"<x:Point xmlns:x="urn:example"><x:pos>1 2</x:pos></x:Point>"#),
            Ok(None)
        );
    }

    #[test]
    fn clockwise_polygon_is_fixed() {
        let clockwise = r#"<gml:Polygon>
            <gml:exterior><gml:LinearRing><gml:posList>0 0 0 10 10 10 10 0 0 0</gml:posList></gml:LinearRing></gml:exterior>
            <gml:interior><gml:LinearRing><gml:posList>2 2 4 2 4 4 2 4 2 2</gml:posList></gml:LinearRing></gml:interior>
        </gml:Polygon>"#;
        let counterclockwise = r#"<gml:Polygon>
            <gml:exterior><gml:LinearRing><gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList></gml:LinearRing></gml:exterior>
            <gml:interior><gml:LinearRing><gml:posList>2 2 2 4 4 4 4 2 2 2</gml:posList></gml:LinearRing></gml:interior>
        </gml:Polygon>"#;

        let reporter = TestReporter::default();
        let fixed = read(clockwise, None, &reporter)
            .expect("valid GML")
            .expect("polygon");
        assert_eq!(reporter.levels.borrow().as_slice(), &[Level::Info]);
        assert_eq!(fixed, parse_geometry(counterclockwise));

        let Geometry::Polygon(rings) = fixed else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].winding(), Winding::CounterClockwise);
        assert_eq!(rings[1].winding(), Winding::Clockwise);
    }

    #[test]
    fn inconsistent_polygon_is_kept() {
        let text = r#"<gml:Polygon>
            <gml:exterior><gml:LinearRing><gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList></gml:LinearRing></gml:exterior>
            <gml:interior><gml:LinearRing><gml:posList>2 2 4 2 4 4 2 4 2 2</gml:posList></gml:LinearRing></gml:interior>
        </gml:Polygon>"#;

        let reporter = TestReporter::default();
        let geometry = read(text, None, &reporter).expect("valid GML");
        assert_matches!(geometry, Some(Geometry::Polygon(rings)) if rings[1][1] == Coord::new(4.0, 2.0));
        assert_eq!(reporter.levels.borrow().as_slice(), &[Level::Error, Level::Warn]);
    }

    #[test]
    fn open_or_short_ring() {
        assert_matches!(
            parse("<gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>0 0 1 0 1 1 0 1</gml:posList></gml:LinearRing></gml:exterior></gml:Polygon>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("not closed")
        );
        assert_matches!(
            parse("<gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>0 0 1 0 0 0</gml:posList></gml:LinearRing></gml:exterior></gml:Polygon>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains(">= 4")
        );
    }

    #[test]
    fn ring_of_curve_members() {
        let text = r#"<gml:Polygon>
            <gml:exterior><gml:Ring>
                <gml:curveMember><gml:LineString><gml:posList>0 0 10 0 10 10</gml:posList></gml:LineString></gml:curveMember>
                <gml:curveMember><gml:Curve><gml:segments>
                    <gml:LineStringSegment><gml:posList>10 10 5 15</gml:posList></gml:LineStringSegment>
                    <gml:LineStringSegment><gml:posList>5 15 0 10 0 0</gml:posList></gml:LineStringSegment>
                </gml:segments></gml:Curve></gml:curveMember>
            </gml:Ring></gml:exterior>
        </gml:Polygon>"#;

        assert_eq!(
            parse_geometry(text),
            Geometry::Polygon(vec![coords(&[
                (0.0, 0.0),
                (10.0, 0.0),
                (10.0, 10.0),
                (5.0, 15.0),
                (0.0, 10.0),
                (0.0, 0.0),
            ])])
        );
    }

    #[test]
    fn curve_drops_shared_boundary_points() {
        let text = r#"<gml:Curve><gml:segments>
            <gml:LineStringSegment><gml:posList>0 0 1 1</gml:posList></gml:LineStringSegment>
            <gml:Arc><gml:posList>1 1 2 0 3 1</gml:posList></gml:Arc>
        </gml:segments></gml:Curve>"#;

        assert_eq!(
            parse_geometry(text),
            Geometry::LineString(coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]))
        );
    }

    #[test]
    fn multi_curve_is_single_component() {
        let text = r#"<gml:MultiCurve>
            <gml:curveMember><gml:LineString><gml:posList>0 0 1 0</gml:posList></gml:LineString></gml:curveMember>
            <gml:curveMember><gml:LineString><gml:posList>1 0 1 1 0 1</gml:posList></gml:LineString></gml:curveMember>
        </gml:MultiCurve>"#;

        assert_eq!(
            parse_geometry(text),
            Geometry::MultiLineString(vec![coords(&[
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
            ])])
        );
    }

    #[test]
    fn surfaces() {
        let polygon = |offset: f64| {
            format!(
                "<gml:exterior><gml:LinearRing><gml:posList>{o} 0 {p} 0 {p} 1 {o} 0</gml:posList></gml:LinearRing></gml:exterior>",
                o = offset,
                p = offset + 1.0
            )
        };
        let text = format!(
            r#"<gml:MultiSurface>
                <gml:surfaceMember><gml:Polygon>{}</gml:Polygon></gml:surfaceMember>
                <gml:surfaceMember><gml:Surface><gml:patches>
                    <gml:PolygonPatch>{}</gml:PolygonPatch>
                    <gml:PolygonPatch>{}</gml:PolygonPatch>
                </gml:patches></gml:Surface></gml:surfaceMember>
                <gml:surfaceMember><gml:CompositeSurface>
                    <gml:surfaceMember><gml:Polygon>{}</gml:Polygon></gml:surfaceMember>
                </gml:CompositeSurface></gml:surfaceMember>
            </gml:MultiSurface>"#,
            polygon(0.0),
            polygon(2.0),
            polygon(4.0),
            polygon(6.0)
        );

        let geometry = parse_geometry(&text);
        let Geometry::MultiPolygon(polygons) = geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(
            polygons.iter().map(|p| p[0][0].x).collect::<Vec<_>>(),
            vec![0.0, 2.0, 4.0, 6.0]
        );
    }

    #[test]
    fn empty_surfaces() {
        assert_matches!(
            parse("<gml:MultiSurface></gml:MultiSurface>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("> 0 polygons")
        );
        assert_matches!(
            parse("<gml:Surface><gml:patches/></gml:Surface>"),
            Err(GeoconvError::MalformedGml(_))
        );
        assert_matches!(
            parse("<gml:MultiSurface><gml:surfaceMember><gml:Point><gml:pos>0 0</gml:pos></gml:Point></gml:surfaceMember></gml:MultiSurface>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("unsupported surface member")
        );
    }

    #[test]
    fn multi_point() {
        let text = r#"<gml:MultiPoint>
            <gml:pointMember><gml:Point><gml:pos>1 2</gml:pos></gml:Point></gml:pointMember>
            <gml:pointMembers><gml:Point><gml:pos>3 4</gml:pos></gml:Point><gml:Point><gml:pos>5 6</gml:pos></gml:Point></gml:pointMembers>
        </gml:MultiPoint>"#;

        assert_eq!(
            parse_geometry(text),
            Geometry::MultiPoint(coords(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]))
        );
    }

    #[test]
    fn multi_geometry() {
        let text = r#"<gml:MultiGeometry srsDimension="3">
            <gml:geometryMember><gml:Point><gml:pos>1 2 3</gml:pos></gml:Point></gml:geometryMember>
            <gml:geometryMember><gml:MultiGeometry>
                <gml:geometryMembers>
                    <gml:Envelope><gml:lowerCorner>0 0 0</gml:lowerCorner><gml:upperCorner>5 5 5</gml:upperCorner></gml:Envelope>
                </gml:geometryMembers>
            </gml:MultiGeometry></gml:geometryMember>
        </gml:MultiGeometry>"#;

        assert_eq!(
            parse_geometry(text),
            Geometry::GeometryCollection(vec![
                Geometry::Point(Coord::xyz(1.0, 2.0, 3.0)),
                Geometry::GeometryCollection(vec![Geometry::LineString(vec![
                    Coord::xyz(0.0, 0.0, 0.0),
                    Coord::xyz(5.0, 5.0, 5.0),
                ])]),
            ])
        );
    }

    #[test]
    fn unsupported_member() {
        assert_matches!(
            parse("<gml:MultiGeometry><gml:geometryMember><gml:Solid/></gml:geometryMember></gml:MultiGeometry>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("gml:Solid")
        );
        assert_matches!(
            parse("<gml:MultiGeometry/>"),
            Err(GeoconvError::MalformedGml(message)) if message.contains("> 0 geometries")
        );
    }

    #[test]
    fn projected_coordinates() {
        let text = r#"<gml:Point srsName="http://www.opengis.net/def/crs/EPSG/0/3857">
            <gml:pos>4452779.631730943 1118889.9748579597</gml:pos>
        </gml:Point>"#;

        let Geometry::Point(point) = parse_geometry(text) else {
            panic!("expected point");
        };
        assert_relative_eq!(point.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn default_crs() {
        let text = "<gml:Point><gml:pos>1113194.9079327357 4865942.279503176</gml:pos></gml:Point>";
        let reporter = TestReporter::default();

        let Some(Geometry::Point(point)) =
            read(text, Some(Crs::EPSG3857), &reporter).expect("valid GML")
        else {
            panic!("expected point");
        };
        assert_relative_eq!(point.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 40.0, epsilon = 1e-9);

        let declared = r#"<gml:Point srsName="urn:ogc:def:crs:EPSG::4326"><gml:pos>1 2</gml:pos></gml:Point>"#;
        assert_eq!(
            read(declared, Some(Crs::EPSG3857), &reporter),
            Ok(Some(Geometry::Point(Coord::new(1.0, 2.0))))
        );
    }

    #[test]
    fn unsupported_crs() {
        assert_matches!(
            parse(r#"<gml:Point srsName="EPSG:2154"><gml:pos>1 2</gml:pos></gml:Point>"#),
            Err(GeoconvError::Types(GeoconvTypesError::UnsupportedCrs(_)))
        );
    }
}
