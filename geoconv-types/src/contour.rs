//! Winding of closed contours.
//!
//! A contour here is any sequence of points. For the purpose of winding calculation the contour is always considered
//! closed: the segment between the last and the first points is included even if the sequence does not repeat the
//! first point at the end. A repeated closing point adds a zero-length segment and does not change the result.

use crate::coord::Coord;

/// Traversal direction of a closed contour.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Winding {
    /// Clockwise.
    Clockwise,
    /// Counterclockwise.
    CounterClockwise,
}

impl Winding {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// Area and winding of closed point sequences in cartesian space.
pub trait CartesianClosedContour {
    /// Signed area of the contour (shoelace formula). Positive for counterclockwise contours.
    fn area_signed(&self) -> f64;

    /// Winding of the contour. Degenerate contours with zero area are reported as counterclockwise.
    fn winding(&self) -> Winding {
        if self.area_signed() < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

impl CartesianClosedContour for [Coord] {
    fn area_signed(&self) -> f64 {
        let mut iter = self.iter().chain(self.first());
        let Some(mut prev) = iter.next() else {
            return 0.0;
        };

        let mut aggr = 0.0;
        for p in iter {
            aggr += prev.x * p.y - p.x * prev.y;
            prev = p;
        }

        aggr / 2.0
    }
}

impl CartesianClosedContour for Vec<Coord> {
    fn area_signed(&self) -> f64 {
        self.as_slice().area_signed()
    }
}
