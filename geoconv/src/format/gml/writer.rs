//! GML 3.2 writer.
//!
//! Output uses the `gml` prefix without declaring it, the same shape the reader accepts. `srsName` is written on the
//! root element only.

use std::io::Cursor;

use geoconv_types::{Coord, Geometry, PolygonRings};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::GeoconvError;

/// Writes the geometry as a GML element, with `srsName` set on the root element if given.
pub fn write(geometry: &Geometry, srs_name: Option<&str>) -> Result<String, GeoconvError> {
    let mut writer = GmlWriter {
        writer: Writer::new(Cursor::new(Vec::new())),
    };
    writer.geometry(geometry, srs_name)?;

    let bytes = writer.writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|err| GeoconvError::Generic(format!("UTF-8 conversion error: {err}")))
}

struct GmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl GmlWriter {
    fn event(&mut self, event: Event) -> Result<(), GeoconvError> {
        self.writer
            .write_event(event)
            .map_err(|err| GeoconvError::Generic(format!("XML write error: {err}")))
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), GeoconvError> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.event(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<(), GeoconvError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn coordinates(&mut self, name: &str, coords: &[Coord]) -> Result<(), GeoconvError> {
        let dimensions = coords.iter().map(Coord::dimensions).max().unwrap_or(2);
        let text = coords
            .iter()
            .map(|coord| match dimensions {
                3 => format!("{} {} {}", coord.x, coord.y, coord.z.unwrap_or(0.0)),
                _ => format!("{} {}", coord.x, coord.y),
            })
            .collect::<Vec<_>>()
            .join(" ");

        if dimensions == 3 {
            self.start(name, &[("srsDimension", "3")])?;
        } else {
            self.start(name, &[])?;
        }
        self.event(Event::Text(BytesText::new(&text)))?;
        self.end(name)
    }

    fn geometry(
        &mut self,
        geometry: &Geometry,
        srs_name: Option<&str>,
    ) -> Result<(), GeoconvError> {
        let srs: Vec<(&str, &str)> = srs_name
            .map(|name| ("srsName", name))
            .into_iter()
            .collect();

        match geometry {
            Geometry::Point(point) => {
                self.start("gml:Point", &srs)?;
                self.coordinates("gml:pos", std::slice::from_ref(point))?;
                self.end("gml:Point")
            }
            Geometry::LineString(line) => {
                self.start("gml:LineString", &srs)?;
                self.coordinates("gml:posList", line)?;
                self.end("gml:LineString")
            }
            Geometry::Polygon(rings) => self.polygon(rings, &srs),
            Geometry::MultiPoint(points) => {
                self.start("gml:MultiPoint", &srs)?;
                for point in points {
                    self.start("gml:pointMember", &[])?;
                    self.geometry(&Geometry::Point(*point), None)?;
                    self.end("gml:pointMember")?;
                }
                self.end("gml:MultiPoint")
            }
            Geometry::MultiLineString(lines) => {
                self.start("gml:MultiCurve", &srs)?;
                for line in lines {
                    self.start("gml:curveMember", &[])?;
                    self.start("gml:LineString", &[])?;
                    self.coordinates("gml:posList", line)?;
                    self.end("gml:LineString")?;
                    self.end("gml:curveMember")?;
                }
                self.end("gml:MultiCurve")
            }
            Geometry::MultiPolygon(polygons) => {
                self.start("gml:MultiSurface", &srs)?;
                for rings in polygons {
                    self.start("gml:surfaceMember", &[])?;
                    self.polygon(rings, &[])?;
                    self.end("gml:surfaceMember")?;
                }
                self.end("gml:MultiSurface")
            }
            Geometry::GeometryCollection(geometries) => {
                self.start("gml:MultiGeometry", &srs)?;
                for member in geometries {
                    self.start("gml:geometryMember", &[])?;
                    self.geometry(member, None)?;
                    self.end("gml:geometryMember")?;
                }
                self.end("gml:MultiGeometry")
            }
        }
    }

    fn polygon(
        &mut self,
        rings: &PolygonRings,
        attributes: &[(&str, &str)],
    ) -> Result<(), GeoconvError> {
        self.start("gml:Polygon", attributes)?;
        for (index, ring) in rings.iter().enumerate() {
            let boundary = if index == 0 { "gml:exterior" } else { "gml:interior" };
            self.start(boundary, &[])?;
            self.start("gml:LinearRing", &[])?;
            self.coordinates("gml:posList", ring)?;
            self.end("gml:LinearRing")?;
            self.end(boundary)?;
        }
        self.end("gml:Polygon")
    }
}
