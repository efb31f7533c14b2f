//! Dataset assembly: square every box, crop, and bring all crops to one size.
//!
//! Runs in two passes. The first pass walks the manifests in order and keeps
//! one square crop per usable record; each full image is dropped right after
//! it is cropped. The uniform output size is the smallest crop side, which is
//! only known once every record has been seen, so the second pass downsizes
//! the crops afterwards.

pub mod report;

use image::RgbImage;

use crate::dataset::{Dataset, Sample};
use crate::error::BirdcropError;
use crate::geometry::{square_normalize, BoundingBox, SquareOutcome};
use crate::source::{self, ImageSource};

pub use report::{AssemblyReport, SkipReason, SkippedImage};

/// A record that survived the first pass.
#[derive(Clone, Debug)]
pub struct Crop {
    pub name: String,
    pub squared: BoundingBox,
    pub pixels: RgbImage,
}

/// Output of the first pass.
#[derive(Clone, Debug, Default)]
pub struct CropPass {
    pub crops: Vec<Crop>,
    pub skipped: Vec<SkippedImage>,
}

impl CropPass {
    /// Smallest crop side, or `None` if nothing was kept.
    pub fn min_side(&self) -> Option<u32> {
        self.crops.iter().map(|crop| crop.pixels.width()).min()
    }
}

/// Build a dataset from parallel name and box lists.
pub fn assemble_dataset<S: ImageSource + ?Sized>(
    images: &S,
    names: &[String],
    boxes: &[BoundingBox],
) -> Result<(Dataset, AssemblyReport), BirdcropError> {
    let pass = crop_records(images, names, boxes)?;
    let side = pass.min_side();

    let mut report = AssemblyReport::new(names.len());
    report.skipped = pass.skipped;
    report.uniform_side = side;

    let dataset = match side {
        Some(side) => resize_crops(pass.crops, side),
        None => Dataset::default(),
    };
    report.valid = dataset.len();

    log::info!(
        "assembled {} of {} image(s); {} could not be squared",
        report.valid,
        report.total,
        report.unresizable_count()
    );
    Ok((dataset, report))
}

/// First pass: square and crop every usable record in manifest order.
pub fn crop_records<S: ImageSource + ?Sized>(
    images: &S,
    names: &[String],
    boxes: &[BoundingBox],
) -> Result<CropPass, BirdcropError> {
    if names.len() != boxes.len() {
        return Err(BirdcropError::ManifestMismatch {
            images: names.len(),
            boxes: boxes.len(),
        });
    }

    let mut pass = CropPass::default();

    for (index, (name, bbox)) in names.iter().zip(boxes).enumerate() {
        let position = index + 1;
        let image = images.open(name)?;

        let mode = source::color_mode(&image);
        if !mode.is_rgb() {
            log::warn!("image {position} ({name}) is not RGB (mode {mode}), skipping");
            pass.skipped.push(SkippedImage {
                position,
                name: name.clone(),
                reason: SkipReason::NotRgb { mode },
            });
            continue;
        }

        let (width, height) = source::dimensions(&image);
        let squared = match square_normalize(width, height, bbox)? {
            SquareOutcome::Squared(squared) => squared,
            SquareOutcome::Infeasible { axis, shortfall } => {
                log::warn!(
                    "bounding box of image {position} ({name}) could not be squared: {shortfall} px to the {axis} bound"
                );
                pass.skipped.push(SkippedImage {
                    position,
                    name: name.clone(),
                    reason: SkipReason::Unresizable { axis, shortfall },
                });
                continue;
            }
            SquareOutcome::OutOfBounds { axis, overhang } => {
                log::warn!(
                    "bounding box of image {position} ({name}) overhangs the {axis} bound by {overhang} px, skipping"
                );
                pass.skipped.push(SkippedImage {
                    position,
                    name: name.clone(),
                    reason: SkipReason::OutOfBounds { axis, overhang },
                });
                continue;
            }
        };
        log::debug!("image {position} ({name}): {bbox} -> {squared}");

        let pixels = source::crop(&image, squared.to_cartesian());
        drop(image);

        if pixels.width() == 0 || pixels.height() == 0 {
            log::warn!("bounding box of image {position} ({name}) crops to nothing, skipping");
            pass.skipped.push(SkippedImage {
                position,
                name: name.clone(),
                reason: SkipReason::EmptyCrop,
            });
            continue;
        }

        pass.crops.push(Crop {
            name: name.clone(),
            squared,
            pixels,
        });
    }

    Ok(pass)
}

/// Second pass: downsize every crop to `side x side`.
pub fn resize_crops(crops: Vec<Crop>, side: u32) -> Dataset {
    let samples = crops
        .into_iter()
        .map(|crop| Sample::new(source::thumbnail(&crop.pixels, side), crop.name))
        .collect();
    Dataset::new(samples)
}
