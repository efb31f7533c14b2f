//! Split report: requested versus actual subset sizes.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::{Split, SplitOptions};
use crate::dataset::CategoryId;

/// Summary of a split, overall and per category.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SplitReport {
    pub total: usize,
    pub seed: Option<u64>,
    pub subsets: Vec<SubsetRow>,
    pub categories: Vec<CategoryCounts>,
}

/// One line of the target/actual table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubsetRow {
    pub name: &'static str,
    /// Requested share of the whole dataset.
    pub target_share: f64,
    /// `target_share * total`; fractional because it is never rounded.
    pub target_count: f64,
    pub actual_count: usize,
    pub actual_share: f64,
}

/// Per-category subset sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub category: CategoryId,
    pub train: usize,
    pub test: usize,
    pub valid: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.train + self.test + self.valid
    }
}

impl SplitReport {
    /// Build a report for `split`, produced with `opts`.
    pub fn new(split: &Split, opts: &SplitOptions) -> Self {
        let total = split.total();
        let row = |name: &'static str, target_share: f64, actual: usize| SubsetRow {
            name,
            target_share,
            target_count: target_share * total as f64,
            actual_count: actual,
            actual_share: if total == 0 {
                0.0
            } else {
                actual as f64 / total as f64
            },
        };

        let subsets = vec![
            row("train", opts.percent_train, split.train.len()),
            row("test", opts.percent_test, split.test.len()),
            row("valid", opts.percent_valid(), split.valid.len()),
        ];

        let mut index_of: HashMap<CategoryId, usize> = HashMap::new();
        let mut categories: Vec<CategoryCounts> = Vec::new();
        for (subset, samples) in [&split.train, &split.test, &split.valid]
            .into_iter()
            .enumerate()
        {
            for sample in samples {
                let pos = *index_of.entry(sample.category).or_insert_with(|| {
                    categories.push(CategoryCounts {
                        category: sample.category,
                        train: 0,
                        test: 0,
                        valid: 0,
                    });
                    categories.len() - 1
                });
                let counts = &mut categories[pos];
                match subset {
                    0 => counts.train += 1,
                    1 => counts.test += 1,
                    _ => counts.valid += 1,
                }
            }
        }

        Self {
            total,
            seed: opts.seed,
            subsets,
            categories,
        }
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8}{:>12}{:>12}{:>12}",
            "Type", "Target #", "Actual #", "Actual %"
        )?;
        for row in &self.subsets {
            writeln!(
                f,
                "{:<8}{:>12.1}{:>12}{:>12.4}",
                row.name, row.target_count, row.actual_count, row.actual_share
            )?;
        }
        writeln!(
            f,
            "{} image(s) across {} categor{}",
            self.total,
            self.categories.len(),
            if self.categories.len() == 1 { "y" } else { "ies" }
        )
    }
}
