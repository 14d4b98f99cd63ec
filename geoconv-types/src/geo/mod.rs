//! Coordinate reference systems (see [`Crs`]) and conversion between them (see [`Projection`]).

mod crs;
mod datum;
pub mod projection;

pub use crs::{Crs, CrsDefinition, ProjectionType};
pub use datum::Datum;
pub use projection::Projection;
