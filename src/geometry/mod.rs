//! Box geometry: coordinate conversion and square normalization.
//!
//! Everything here is pure arithmetic on `f64` pixel coordinates. Nothing in
//! this module touches pixel data.

mod bbox;
mod square;

pub use bbox::{to_cartesian, Axis, BoundingBox, CartesianBox};
pub use square::{square_normalize, SquareOutcome};
