//! Bounding box types in XYWH and cartesian (left, top, right, bottom) form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two image axes.
///
/// The discriminants match the index used by the manifest layout:
/// horizontal quantities come first, vertical second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal = 0,
    Vertical = 1,
}

impl Axis {
    /// Returns the axis perpendicular to this one.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Returns the positional index of the axis (0 = horizontal, 1 = vertical).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// An axis-aligned bounding box in XYWH format, pixel units.
///
/// `(x, y)` is the top-left corner. Like the rest of the crate, the
/// constructor accepts any values; geometry routines decide what is usable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Creates a new box from its top-left corner and extents.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the top-left coordinate on `axis`.
    #[inline]
    pub fn origin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns the extent (width or height) on `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Returns the far edge (`origin + extent`) on `axis`.
    #[inline]
    pub fn end(&self, axis: Axis) -> f64 {
        self.origin(axis) + self.extent(axis)
    }

    #[inline]
    pub(crate) fn set_origin(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    #[inline]
    pub(crate) fn set_extent(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Returns true if all four fields are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Returns true if width equals height.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Converts to cartesian corners. See [`to_cartesian`].
    #[inline]
    pub fn to_cartesian(&self) -> CartesianBox {
        to_cartesian(self)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x={}, y={}, w={}, h={})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// The same rectangle expressed as `(left, top, right, bottom)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CartesianBox {
    /// Creates a new cartesian box from explicit corners.
    #[inline]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Converts a width/height-style box to cartesian corners.
///
/// `left = x`, `top = y`, `right = x + width`, `bottom = y + height`.
#[inline]
pub fn to_cartesian(bbox: &BoundingBox) -> CartesianBox {
    CartesianBox::new(bbox.x, bbox.y, bbox.x + bbox.width, bbox.y + bbox.height)
}
