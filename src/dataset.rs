//! In-memory dataset model: cropped samples and their derived categories.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BirdcropError;

/// Number of leading filename characters that encode the category.
const CATEGORY_PREFIX_LEN: usize = 3;

/// A 1-based class identifier derived from an image filename.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl CategoryId {
    /// Creates a new CategoryId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CategoryId({})", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Derive the category of an image from the first three characters of its
/// filename, e.g. `"017.Cardinal/Cardinal_0001.jpg"` is category 17.
pub fn category_of(name: &str) -> Result<CategoryId, BirdcropError> {
    let prefix = name
        .get(..CATEGORY_PREFIX_LEN)
        .ok_or_else(|| BirdcropError::InvalidCategory {
            name: name.to_string(),
            message: format!("name has no {CATEGORY_PREFIX_LEN}-character prefix"),
        })?;

    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BirdcropError::InvalidCategory {
            name: name.to_string(),
            message: format!("prefix '{prefix}' is not a number"),
        });
    }

    match prefix.parse::<u32>() {
        Ok(0) | Err(_) => Err(BirdcropError::InvalidCategory {
            name: name.to_string(),
            message: format!("prefix '{prefix}' is not a 1-based class id"),
        }),
        Ok(id) => Ok(CategoryId(id)),
    }
}

/// A cropped, uniformly sized image and the manifest name it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub pixels: RgbImage,
    pub name: String,
}

impl Sample {
    pub fn new(pixels: RgbImage, name: impl Into<String>) -> Self {
        Self {
            pixels,
            name: name.into(),
        }
    }

    /// The category derived from this sample's name.
    pub fn category(&self) -> Result<CategoryId, BirdcropError> {
        category_of(&self.name)
    }
}

/// An ordered collection of samples produced by one assembler run or
/// rehydrated from an archive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Side length shared by every sample, or `None` for an empty dataset.
    ///
    /// Returns an error message if samples disagree on their size or are not
    /// square.
    pub fn uniform_side(&self) -> Result<Option<u32>, String> {
        let mut side = None;
        for sample in &self.samples {
            let (w, h) = sample.pixels.dimensions();
            if w != h {
                return Err(format!("sample '{}' is {w}x{h}, not square", sample.name));
            }
            match side {
                None => side = Some(w),
                Some(s) if s != w => {
                    return Err(format!(
                        "sample '{}' is {w}x{w}, expected {s}x{s}",
                        sample.name
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(side)
    }
}

/// A sample tagged with its category, as handed to the classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample {
    pub pixels: RgbImage,
    pub name: String,
    pub category: CategoryId,
}
