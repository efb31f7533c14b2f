//! Image acquisition: decoding, color checks, cropping and downsizing.
//!
//! The assembler only needs four capabilities from an image backend, so they
//! are kept behind [`ImageSource`] plus a handful of free functions over
//! [`DynamicImage`].

use std::fmt;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, GenericImageView, RgbImage};
use serde::Serialize;

use crate::error::BirdcropError;
use crate::geometry::CartesianBox;

/// Something that can hand out decoded images by manifest name.
pub trait ImageSource {
    /// Open and decode the image called `name`.
    ///
    /// The returned image is owned by the caller and dropped as soon as it
    /// has been cropped.
    fn open(&self, name: &str) -> Result<DynamicImage, BirdcropError>;
}

/// Reads images from files below a root directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the image file called `name`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ImageSource for DirectorySource {
    fn open(&self, name: &str) -> Result<DynamicImage, BirdcropError> {
        let path = self.resolve(name);
        image::open(&path).map_err(|source| BirdcropError::ImageDecode { path, source })
    }
}

/// Pixel layout of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    /// 8-bit, 3-channel color; the only mode the pipeline keeps.
    Rgb,
    Rgba,
    Luma,
    LumaAlpha,
    /// Anything else (16-bit or floating-point layouts).
    Other,
}

impl ColorMode {
    pub fn is_rgb(self) -> bool {
        self == ColorMode::Rgb
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Other => "other",
        };
        f.write_str(tag)
    }
}

/// Width and height of `image` in pixels.
pub fn dimensions(image: &DynamicImage) -> (u32, u32) {
    image.dimensions()
}

/// Color mode of `image`.
pub fn color_mode(image: &DynamicImage) -> ColorMode {
    match image.color() {
        ColorType::Rgb8 => ColorMode::Rgb,
        ColorType::Rgba8 => ColorMode::Rgba,
        ColorType::L8 => ColorMode::Luma,
        ColorType::La8 => ColorMode::LumaAlpha,
        _ => ColorMode::Other,
    }
}

/// Crop `image` to `region`.
///
/// Corners are rounded to whole pixels and the region is clamped to the
/// image, so the result may be smaller than requested but never panics.
pub fn crop(image: &DynamicImage, region: CartesianBox) -> RgbImage {
    let (img_w, img_h) = image.dimensions();
    let (x, w) = pixel_span(region.left, region.width(), img_w);
    let (y, h) = pixel_span(region.top, region.height(), img_h);
    image.crop_imm(x, y, w, h).into_rgb8()
}

/// Start and length of a rounded span clamped to `[0, limit]`.
fn pixel_span(start: f64, extent: f64, limit: u32) -> (u32, u32) {
    let limit_f = f64::from(limit);
    let length = extent.round().clamp(0.0, limit_f);
    let begin = start.round().clamp(0.0, limit_f - length);
    (begin as u32, length as u32)
}

/// Downsize a square buffer to `side x side`.
///
/// Buffers that are already no larger than `side` are returned unchanged.
pub fn thumbnail(pixels: &RgbImage, side: u32) -> RgbImage {
    let (w, h) = pixels.dimensions();
    if w <= side && h <= side {
        return pixels.clone();
    }
    imageops::resize(pixels, side, side, FilterType::Lanczos3)
}
