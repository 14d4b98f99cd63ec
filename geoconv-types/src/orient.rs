//! Ring orientation enforcement.
//!
//! GeoJSON (RFC 7946) requires exterior rings to be counterclockwise and holes to be clockwise. Other formats do not
//! care, so geometries read from them may come in either direction. [`enforce`] detects the orientation of a geometry
//! and, depending on [`OrientationStrategy`], fixes it, reports it or fails.
//!
//! Only line strings, polygons and multipolygons are checked. Points, multipoints, multilines and geometry
//! collections (including their members) are returned as is.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::Level;
use serde::{Deserialize, Serialize};

use crate::contour::{CartesianClosedContour, Winding};
use crate::error::GeoconvTypesError;
use crate::geometry::{Geometry, PolygonRings};

/// What to do when a geometry has clockwise or inconsistent ring orientation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationStrategy {
    /// Reverse clockwise geometries. Inconsistent ones are reported and returned unchanged.
    #[default]
    Fix,
    /// Report wrong orientation and return the geometry unchanged.
    Warn,
    /// Fail on wrong or inconsistent orientation.
    Error,
}

impl FromStr for OrientationStrategy {
    type Err = GeoconvTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fix" => Ok(Self::Fix),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(GeoconvTypesError::InvalidToken(other.to_string())),
        }
    }
}

impl Display for OrientationStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Fix => "fix",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(token)
    }
}

/// Side channel for orientation diagnostics.
pub trait OrientationReporter {
    /// Reports a message with the given severity.
    fn report(&self, level: Level, message: &str);
}

/// Reporter that forwards all messages to the [`log`] facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl OrientationReporter for LogReporter {
    fn report(&self, level: Level, message: &str) {
        log::log!(level, "{message}");
    }
}

/// Orientation of the geometry as a whole. Inconsistent orientation is reported as an error.
///
/// For polygons the exterior ring defines the orientation, and every hole must wind the opposite way. All polygons
/// of a multipolygon must have the same orientation as the first one. A line string is treated as a single ring.
///
/// Returns `None` for geometries that have no orientation.
pub fn detect(geometry: &Geometry) -> Result<Option<Winding>, GeoconvTypesError> {
    match geometry {
        Geometry::LineString(line) => Ok(Some(line.winding())),
        Geometry::Polygon(rings) => polygon_winding(rings),
        Geometry::MultiPolygon(polygons) => {
            let mut iter = polygons.iter();
            let Some(first) = iter.next() else {
                return Ok(None);
            };
            let winding = polygon_winding(first)?;
            for polygon in iter {
                if polygon_winding(polygon)? != winding {
                    return Err(GeoconvTypesError::InconsistentRingOrientation(
                        "polygons in a multipolygon must all have the same orientation".into(),
                    ));
                }
            }

            Ok(winding)
        }
        _ => Ok(None),
    }
}

fn polygon_winding(rings: &PolygonRings) -> Result<Option<Winding>, GeoconvTypesError> {
    let Some(exterior) = rings.first() else {
        return Ok(None);
    };

    let winding = exterior.winding();
    if rings[1..].iter().any(|ring| ring.winding() == winding) {
        return Err(GeoconvTypesError::InconsistentRingOrientation(
            "interior rings must run in the opposite direction of the exterior ring".into(),
        ));
    }

    Ok(Some(winding))
}

/// Makes sure the geometry is oriented counterclockwise, following the given `strategy`.
pub fn enforce(
    geometry: Geometry,
    strategy: OrientationStrategy,
    reporter: &dyn OrientationReporter,
) -> Result<Geometry, GeoconvTypesError> {
    match detect(&geometry) {
        Ok(Some(Winding::Clockwise)) => match strategy {
            OrientationStrategy::Fix => {
                reporter.report(
                    Level::Info,
                    "fixing ring orientation to be counterclockwise",
                );
                Ok(reverse(geometry))
            }
            OrientationStrategy::Warn => {
                reporter.report(
                    Level::Warn,
                    "ring orientation is clockwise, ignoring incorrect orientation",
                );
                Ok(geometry)
            }
            OrientationStrategy::Error => Err(GeoconvTypesError::InconsistentRingOrientation(
                "ring orientation is clockwise".into(),
            )),
        },
        Ok(_) => Ok(geometry),
        Err(err) => match strategy {
            OrientationStrategy::Fix => {
                reporter.report(Level::Error, &err.to_string());
                // Consistent rewinding of mixed orientations is not implemented.
                reporter.report(
                    Level::Warn,
                    "ring orientation is inconsistent and cannot be fixed, ignoring incorrect orientation",
                );
                Ok(geometry)
            }
            OrientationStrategy::Warn => {
                reporter.report(Level::Error, &err.to_string());
                reporter.report(
                    Level::Warn,
                    "ring orientation is inconsistent, ignoring incorrect orientation",
                );
                Ok(geometry)
            }
            OrientationStrategy::Error => Err(err),
        },
    }
}

/// Reverses every ring (or the line) of an oriented geometry. Other geometries are returned unchanged.
fn reverse(geometry: Geometry) -> Geometry {
    fn reverse_rings(rings: PolygonRings) -> PolygonRings {
        rings
            .into_iter()
            .map(|mut ring| {
                ring.reverse();
                ring
            })
            .collect()
    }

    match geometry {
        Geometry::LineString(mut line) => {
            line.reverse();
            Geometry::LineString(line)
        }
        Geometry::Polygon(rings) => Geometry::Polygon(reverse_rings(rings)),
        Geometry::MultiPolygon(polygons) => {
            Geometry::MultiPolygon(polygons.into_iter().map(reverse_rings).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use assert_matches::assert_matches;

    use super::*;
    use crate::coord::Coord;

    #[derive(Default)]
    struct CollectingReporter {
        messages: RefCell<Vec<(Level, String)>>,
    }

    impl OrientationReporter for CollectingReporter {
        fn report(&self, level: Level, message: &str) {
            self.messages.borrow_mut().push((level, message.to_string()));
        }
    }

    impl CollectingReporter {
        fn levels(&self) -> Vec<Level> {
            self.messages.borrow().iter().map(|(l, _)| *l).collect()
        }
    }

    fn ring(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|(x, y)| Coord::new(*x, *y)).collect()
    }

    fn ccw_exterior() -> Vec<Coord> {
        ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    fn cw_hole() -> Vec<Coord> {
        ring(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)])
    }

    fn reversed(mut ring: Vec<Coord>) -> Vec<Coord> {
        ring.reverse();
        ring
    }

    #[test]
    fn correct_polygon_is_unchanged() {
        let polygon = Geometry::Polygon(vec![ccw_exterior(), cw_hole()]);
        let reporter = CollectingReporter::default();

        for strategy in [
            OrientationStrategy::Fix,
            OrientationStrategy::Warn,
            OrientationStrategy::Error,
        ] {
            let result = enforce(polygon.clone(), strategy, &reporter).expect("enforce failed");
            assert_eq!(result, polygon);
        }
        assert!(reporter.messages.borrow().is_empty());
    }

    #[test]
    fn fix_reverses_clockwise_polygon() {
        let polygon = Geometry::Polygon(vec![reversed(ccw_exterior()), reversed(cw_hole())]);
        let reporter = CollectingReporter::default();

        let fixed = enforce(polygon, OrientationStrategy::Fix, &reporter).expect("enforce failed");
        assert_eq!(fixed, Geometry::Polygon(vec![ccw_exterior(), cw_hole()]));
        assert_eq!(reporter.levels(), vec![Level::Info]);
    }

    #[test]
    fn fix_is_idempotent() {
        let polygon = Geometry::MultiPolygon(vec![
            vec![reversed(ccw_exterior())],
            vec![reversed(ring(&[(20.0, 0.0), (30.0, 0.0), (30.0, 5.0), (20.0, 0.0)]))],
        ]);
        let reporter = CollectingReporter::default();

        let once = enforce(polygon, OrientationStrategy::Fix, &reporter).expect("enforce failed");
        let twice =
            enforce(once.clone(), OrientationStrategy::Fix, &reporter).expect("enforce failed");
        assert_eq!(once, twice);
        assert_eq!(detect(&once), Ok(Some(Winding::CounterClockwise)));
    }

    #[test]
    fn fix_leaves_inconsistent_polygon_unchanged() {
        let polygon = Geometry::Polygon(vec![ccw_exterior(), reversed(cw_hole())]);
        let reporter = CollectingReporter::default();

        let result =
            enforce(polygon.clone(), OrientationStrategy::Fix, &reporter).expect("enforce failed");
        assert_eq!(result, polygon);
        assert_eq!(reporter.levels(), vec![Level::Error, Level::Warn]);
    }

    #[test]
    fn warn_only_reports() {
        let polygon = Geometry::Polygon(vec![reversed(ccw_exterior())]);
        let reporter = CollectingReporter::default();

        let result =
            enforce(polygon.clone(), OrientationStrategy::Warn, &reporter).expect("enforce failed");
        assert_eq!(result, polygon);
        assert_eq!(reporter.levels(), vec![Level::Warn]);
    }

    #[test]
    fn error_strategy_fails() {
        let reporter = CollectingReporter::default();

        let clockwise = Geometry::Polygon(vec![reversed(ccw_exterior())]);
        assert_matches!(
            enforce(clockwise, OrientationStrategy::Error, &reporter),
            Err(GeoconvTypesError::InconsistentRingOrientation(_))
        );

        let mixed = Geometry::MultiPolygon(vec![
            vec![ccw_exterior()],
            vec![reversed(ring(&[(20.0, 0.0), (30.0, 0.0), (30.0, 5.0), (20.0, 0.0)]))],
        ]);
        assert_matches!(
            enforce(mixed, OrientationStrategy::Error, &reporter),
            Err(GeoconvTypesError::InconsistentRingOrientation(message)) if message.contains("multipolygon")
        );
    }

    #[test]
    fn collections_are_not_checked() {
        let collection =
            Geometry::GeometryCollection(vec![Geometry::Polygon(vec![reversed(ccw_exterior())])]);
        let reporter = CollectingReporter::default();

        let result = enforce(collection.clone(), OrientationStrategy::Error, &reporter)
            .expect("enforce failed");
        assert_eq!(result, collection);
    }

    #[test]
    fn strategy_tokens() {
        assert_eq!("warn".parse(), Ok(OrientationStrategy::Warn));
        assert_eq!(OrientationStrategy::Error.to_string(), "error");
        assert_matches!(
            "rewind".parse::<OrientationStrategy>(),
            Err(GeoconvTypesError::InvalidToken(_))
        );
    }
}
