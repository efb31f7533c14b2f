//! Square normalization of bounding boxes.
//!
//! The shorter side of a box is grown until it matches the longer side,
//! spreading the growth evenly on both sides of the existing span where the
//! image bounds allow it and pushing it to the free side where they don't.

use serde::Serialize;

use super::bbox::{Axis, BoundingBox};
use crate::error::BirdcropError;

/// Result of [`square_normalize`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SquareOutcome {
    /// The box was grown into a square that fits inside the image.
    Squared(BoundingBox),
    /// There is not enough room past the far edge on `axis` to grow the box.
    ///
    /// `shortfall` is the distance from the box origin to the image bound on
    /// that axis.
    Infeasible { axis: Axis, shortfall: f64 },
    /// The input box already reaches past the image on `axis` by `overhang`.
    OutOfBounds { axis: Axis, overhang: f64 },
}

impl SquareOutcome {
    /// Returns the squared box, if normalization succeeded.
    pub fn squared(&self) -> Option<&BoundingBox> {
        match self {
            SquareOutcome::Squared(bbox) => Some(bbox),
            SquareOutcome::Infeasible { .. } | SquareOutcome::OutOfBounds { .. } => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SquareOutcome::Infeasible { .. })
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, SquareOutcome::OutOfBounds { .. })
    }

    /// Renders the outcome as the legacy 4-tuple encoding.
    ///
    /// A squared box becomes `[x, y, width, height]`. An infeasible outcome
    /// becomes `-1` in every slot except the one indexed by the short axis,
    /// which carries the shortfall. A box outside the image has no legacy
    /// encoding and renders as `-1` everywhere.
    pub fn to_sentinel(&self) -> [f64; 4] {
        match *self {
            SquareOutcome::Squared(b) => [b.x, b.y, b.width, b.height],
            SquareOutcome::Infeasible { axis, shortfall } => {
                let mut out = [-1.0; 4];
                out[axis.index()] = shortfall;
                out
            }
            SquareOutcome::OutOfBounds { .. } => [-1.0; 4],
        }
    }
}

/// Grows the shorter side of `bbox` to match the longer one while keeping
/// the box inside `[0, image_width) x [0, image_height)`.
///
/// The input is never modified; a new box is returned. A box that already
/// overhangs the image is reported as [`SquareOutcome::OutOfBounds`]. An error
/// is only returned for non-finite input or when the debt bookkeeping would
/// still produce a box outside the image.
pub fn square_normalize(
    image_width: u32,
    image_height: u32,
    bbox: &BoundingBox,
) -> Result<SquareOutcome, BirdcropError> {
    if !bbox.is_finite() {
        return Err(invariant(
            image_width,
            image_height,
            bbox,
            "box has non-finite coordinates",
        ));
    }

    let image_dims = [f64::from(image_width), f64::from(image_height)];

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let overhang = (-bbox.origin(axis)).max(bbox.end(axis) - image_dims[axis.index()]);
        if overhang > 0.0 {
            return Ok(SquareOutcome::OutOfBounds { axis, overhang });
        }
    }

    // Ties grow vertically.
    let dim = if bbox.width < bbox.height {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let bound = image_dims[dim.index()];
    let origin = bbox.origin(dim);
    let difference = (bbox.width - bbox.height).abs();
    let free_space = bound - bbox.end(dim);

    if difference > free_space {
        return Ok(SquareOutcome::Infeasible {
            axis: dim,
            shortfall: bound - origin,
        });
    }

    let growth = (difference / 2.0).ceil();
    let negative_debt = (growth - origin).max(0.0);
    let positive_debt = (bbox.end(dim) + growth - bound).max(0.0);

    let new_origin = match (negative_debt > 0.0, positive_debt > 0.0) {
        (false, false) => origin - growth,
        // The far side has room for the whole difference.
        (true, false) => 0.0,
        (false, true) => origin - (growth + positive_debt),
        (true, true) => {
            return Err(invariant(
                image_width,
                image_height,
                bbox,
                &format!(
                    "growth of {growth} on the {dim} axis is short {negative_debt} before 0 and {positive_debt} past {bound}"
                ),
            ));
        }
    };

    let mut squared = *bbox;
    squared.set_origin(dim, new_origin);
    squared.set_extent(dim, bbox.extent(dim.other()));

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let limit = image_dims[axis.index()];
        if squared.origin(axis) < 0.0 || squared.end(axis) > limit {
            return Err(invariant(
                image_width,
                image_height,
                bbox,
                &format!("squared box {squared} leaves the image on the {axis} axis"),
            ));
        }
    }

    Ok(SquareOutcome::Squared(squared))
}

fn invariant(
    image_width: u32,
    image_height: u32,
    bbox: &BoundingBox,
    message: &str,
) -> BirdcropError {
    BirdcropError::GeometryInvariant {
        context: format!("box {bbox} in {image_width}x{image_height} image"),
        message: message.to_string(),
    }
}
