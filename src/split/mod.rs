//! Category-stratified train/test/validation splitting.
//!
//! Every category is split on its own, so the requested proportions hold per
//! category (up to rounding) rather than only across the pooled dataset.

pub mod report;

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashMap;

use crate::dataset::{CategoryId, Dataset, LabeledSample};
use crate::error::BirdcropError;

pub use report::{CategoryCounts, SplitReport, SubsetRow};

/// Share of each category that goes to training by default.
pub const DEFAULT_PERCENT_TRAIN: f64 = 0.8;
/// Share of each category that goes to testing by default.
pub const DEFAULT_PERCENT_TEST: f64 = 0.1;

/// Absorbs products like `0.29 * 100 = 28.999999999999996` before flooring.
const COUNT_EPSILON: f64 = 1e-9;

/// Splitting options.
///
/// The validation share is whatever `percent_train` and `percent_test`
/// leave over.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOptions {
    pub percent_train: f64,
    pub percent_test: f64,
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            percent_train: DEFAULT_PERCENT_TRAIN,
            percent_test: DEFAULT_PERCENT_TEST,
            seed: None,
        }
    }
}

impl SplitOptions {
    /// Share of each category left for validation.
    pub fn percent_valid(&self) -> f64 {
        (1.0 - self.percent_train - self.percent_test).max(0.0)
    }
}

/// The three disjoint partitions of a dataset.
#[derive(Clone, Debug, Default)]
pub struct Split {
    pub train: Vec<LabeledSample>,
    pub test: Vec<LabeledSample>,
    pub valid: Vec<LabeledSample>,
}

impl Split {
    pub fn total(&self) -> usize {
        self.train.len() + self.test.len() + self.valid.len()
    }
}

/// Validate split options before running.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), BirdcropError> {
    let (train, test) = (opts.percent_train, opts.percent_test);

    if !train.is_finite() || !test.is_finite() {
        return Err(BirdcropError::InvalidSplitConfig {
            message: "percentages must be finite numbers".to_string(),
        });
    }

    if train < 0.0 || test < 0.0 {
        return Err(BirdcropError::InvalidSplitConfig {
            message: format!("percentages must be >= 0 (train {train}, test {test})"),
        });
    }

    if train + test > 1.0 {
        return Err(BirdcropError::InvalidSplitConfig {
            message: format!("train + test must not exceed 1.0 (got {})", train + test),
        });
    }

    Ok(())
}

/// Split `dataset` into train, test and validation sets, stratified by the
/// category derived from each sample name.
///
/// Categories appear in the output in the order they are first seen. With a
/// seed the result is fully reproducible; the same seed is used for every
/// category.
pub fn split_dataset(dataset: Dataset, opts: &SplitOptions) -> Result<Split, BirdcropError> {
    validate_split_options(opts)?;

    let buckets = bucket_by_category(dataset)?;

    // Test share of what is left once training has taken its part.
    let remainder = 1.0 - opts.percent_train;
    let test_of_remainder = if remainder > 0.0 {
        (opts.percent_test / remainder).min(1.0)
    } else {
        0.0
    };

    let mut split = Split::default();
    for (category, samples) in buckets {
        let count = samples.len();
        let (train, rest) = partition(samples, opts.percent_train, opts.seed);
        let (test, valid) = partition(rest, test_of_remainder, opts.seed);

        log::debug!(
            "category {category}: {count} -> train {}, test {}, valid {}",
            train.len(),
            test.len(),
            valid.len()
        );

        split.train.extend(train);
        split.test.extend(test);
        split.valid.extend(valid);
    }

    Ok(split)
}

/// Group samples by category, keeping first-seen category order and
/// manifest order within each category.
pub fn bucket_by_category(
    dataset: Dataset,
) -> Result<Vec<(CategoryId, Vec<LabeledSample>)>, BirdcropError> {
    let mut index_of: HashMap<CategoryId, usize> = HashMap::new();
    let mut buckets: Vec<(CategoryId, Vec<LabeledSample>)> = Vec::new();

    for sample in dataset.samples {
        let category = sample.category()?;
        let slot = *index_of.entry(category).or_insert_with(|| {
            buckets.push((category, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(LabeledSample {
            pixels: sample.pixels,
            name: sample.name,
            category,
        });
    }

    Ok(buckets)
}

/// Number of items `fraction` of `total` amounts to, rounded down.
pub fn share_count(total: usize, fraction: f64) -> usize {
    let raw = (total as f64 * fraction + COUNT_EPSILON).floor();
    (raw.max(0.0) as usize).min(total)
}

/// Shuffle `items` and cut off the first `fraction` of them.
fn partition<T>(mut items: Vec<T>, fraction: f64, seed: Option<u64>) -> (Vec<T>, Vec<T>) {
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        items.shuffle(&mut rng);
    }

    let rest = items.split_off(share_count(items.len(), fraction));
    (items, rest)
}
