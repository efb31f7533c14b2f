#![allow(dead_code)]

use birdcrop::geometry::BoundingBox;
use birdcrop::{Dataset, Sample};
use image::RgbImage;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An image size together with a box on the half-pixel grid lying inside it.
///
/// Half-pixel values make the growth rounding overshoot the difference, which
/// is what drives the debt branches of normalization.
pub fn arb_image_and_box() -> BoxedStrategy<((u32, u32), BoundingBox)> {
    (1u32..=400, 1u32..=400)
        .prop_flat_map(|(w, h)| (Just((w, h)), 0..2 * w, 0..2 * h))
        .prop_flat_map(|((w, h), x, y)| {
            (Just((w, h)), Just((x, y)), 0..=(2 * w - x), 0..=(2 * h - y))
        })
        .prop_map(|((w, h), (x, y), bw, bh)| {
            (
                (w, h),
                BoundingBox::new(
                    f64::from(x) / 2.0,
                    f64::from(y) / 2.0,
                    f64::from(bw) / 2.0,
                    f64::from(bh) / 2.0,
                ),
            )
        })
        .boxed()
}

/// An image size together with an integer-valued box lying inside it.
pub fn arb_image_and_integer_box() -> BoxedStrategy<((u32, u32), BoundingBox)> {
    (1u32..=400, 1u32..=400)
        .prop_flat_map(|(w, h)| (Just((w, h)), 0..w, 0..h))
        .prop_flat_map(|((w, h), x, y)| (Just((w, h)), Just((x, y)), 0..=(w - x), 0..=(h - y)))
        .prop_map(|((w, h), (x, y), bw, bh)| {
            (
                (w, h),
                BoundingBox::new(x as f64, y as f64, bw as f64, bh as f64),
            )
        })
        .boxed()
}

/// An image size together with a box that may reach past any image edge.
pub fn arb_image_and_loose_box() -> BoxedStrategy<((u32, u32), BoundingBox)> {
    (1u32..=200, 1u32..=200, -50i32..250, -50i32..250, 0u32..=300, 0u32..=300)
        .prop_map(|(w, h, x, y, bw, bh)| {
            (
                (w, h),
                BoundingBox::new(f64::from(x), f64::from(y), f64::from(bw), f64::from(bh)),
            )
        })
        .boxed()
}

/// An image size together with a square integer box lying inside it.
pub fn arb_image_and_square_box() -> BoxedStrategy<((u32, u32), BoundingBox)> {
    (1u32..=400, 1u32..=400)
        .prop_flat_map(|(w, h)| (Just((w, h)), 0..w, 0..h))
        .prop_flat_map(|((w, h), x, y)| (Just((w, h)), Just((x, y)), 0..=(w - x).min(h - y)))
        .prop_map(|((w, h), (x, y), side)| {
            (
                (w, h),
                BoundingBox::new(x as f64, y as f64, side as f64, side as f64),
            )
        })
        .boxed()
}

/// A dataset of 1x1 samples whose names encode categories 1..=max_category.
///
/// Category ids are drawn in arbitrary order, so buckets are not contiguous.
pub fn arb_dataset(max_samples: usize, max_category: u32) -> BoxedStrategy<Dataset> {
    proptest::collection::vec(1u32..=max_category, 0..=max_samples)
        .prop_map(|categories| {
            let samples = categories
                .into_iter()
                .enumerate()
                .map(|(i, category)| {
                    Sample::new(RgbImage::new(1, 1), format!("{category:03}.Bird/{i}.jpg"))
                })
                .collect();
            Dataset::new(samples)
        })
        .boxed()
}

/// Train/test shares that are exact binary fractions with `train + test <= 1`.
pub fn arb_shares() -> BoxedStrategy<(f64, f64)> {
    (0u32..=16)
        .prop_flat_map(|train| (Just(train), 0u32..=(16 - train)))
        .prop_map(|(train, test)| (train as f64 / 16.0, test as f64 / 16.0))
        .boxed()
}
