//! Assembly report types.
//!
//! Tracks which records made it into the dataset and why the others were
//! left out, so the end-of-run summary can be printed or serialized.

use serde::Serialize;
use std::fmt;

use crate::geometry::Axis;
use crate::source::ColorMode;

/// Summary of one assembler run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AssemblyReport {
    /// Number of records listed in the manifests.
    pub total: usize,
    /// Number of records that ended up in the dataset.
    pub valid: usize,
    /// Side length every kept image was downsized to.
    pub uniform_side: Option<u32>,
    /// Records left out of the dataset, in manifest order.
    pub skipped: Vec<SkippedImage>,
}

impl AssemblyReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Count of records whose box could not be squared inside the image.
    pub fn unresizable_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Unresizable { .. }))
            .count()
    }

    /// Count of records whose box reaches outside its image.
    pub fn out_of_bounds_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::OutOfBounds { .. }))
            .count()
    }

    /// Count of records dropped for not being 3-channel color.
    pub fn color_skipped_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::NotRgb { .. }))
            .count()
    }

    /// Share of all manifest records that could not be squared, in percent.
    pub fn unresizable_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.unresizable_count() as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of valid images: {}", self.valid)?;
        writeln!(
            f,
            "Could not resize {} images ({:.2}%).",
            self.unresizable_count(),
            self.unresizable_percent()
        )?;
        if self.out_of_bounds_count() > 0 {
            writeln!(
                f,
                "Skipped {} box(es) outside their image.",
                self.out_of_bounds_count()
            )?;
        }
        if self.color_skipped_count() > 0 {
            writeln!(f, "Skipped {} non-RGB image(s).", self.color_skipped_count())?;
        }
        if let Some(side) = self.uniform_side {
            writeln!(f, "Uniform size: {side}x{side}")?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            for skipped in &self.skipped {
                writeln!(f, "  {}", skipped)?;
            }
        }

        Ok(())
    }
}

/// A record that was left out of the dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedImage {
    /// 1-based manifest line position.
    pub position: usize,
    pub name: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.position, self.name, self.reason)
    }
}

/// Why a record was left out.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NotRgb { mode: ColorMode },
    Unresizable { axis: Axis, shortfall: f64 },
    OutOfBounds { axis: Axis, overhang: f64 },
    EmptyCrop,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotRgb { mode } => write!(f, "not RGB (mode {mode})"),
            SkipReason::Unresizable { axis, shortfall } => write!(
                f,
                "bounding box could not be squared ({shortfall} px to the {axis} bound)"
            ),
            SkipReason::OutOfBounds { axis, overhang } => write!(
                f,
                "bounding box overhangs the {axis} bound by {overhang} px"
            ),
            SkipReason::EmptyCrop => write!(f, "bounding box crops to an empty image"),
        }
    }
}
