//! Readers for the two flat text manifests that describe the dataset.
//!
//! - the id list: `<index> <filename>` per line
//! - the bounding-box table: `<index> <x> <y> <width> <height>` per line
//!
//! Line `i` of one file describes the same image as line `i` of the other.
//! Nothing here checks that correspondence; the assembler does.

use std::fs;
use std::path::Path;

use crate::error::BirdcropError;
use crate::geometry::BoundingBox;

/// Read the id list manifest, returning filenames in file order.
pub fn load_id_list(path: &Path) -> Result<Vec<String>, BirdcropError> {
    let content = fs::read_to_string(path)?;
    parse_id_list(&content, path)
}

/// Parse id list manifest content held in memory.
pub fn id_list_from_str(content: &str) -> Result<Vec<String>, BirdcropError> {
    parse_id_list(content, Path::new("<string>"))
}

/// Read the bounding-box manifest, returning boxes in file order.
pub fn load_bounding_boxes(path: &Path) -> Result<Vec<BoundingBox>, BirdcropError> {
    let content = fs::read_to_string(path)?;
    parse_bounding_boxes(&content, path)
}

/// Parse bounding-box manifest content held in memory.
pub fn bounding_boxes_from_str(content: &str) -> Result<Vec<BoundingBox>, BirdcropError> {
    parse_bounding_boxes(content, Path::new("<string>"))
}

fn parse_id_list(content: &str, path: &Path) -> Result<Vec<String>, BirdcropError> {
    let mut names = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if let Some(name) = parse_id_line(line, path, index + 1)? {
            names.push(name);
        }
    }
    log::debug!("read {} image name(s) from {}", names.len(), path.display());
    Ok(names)
}

fn parse_bounding_boxes(content: &str, path: &Path) -> Result<Vec<BoundingBox>, BirdcropError> {
    let mut boxes = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if let Some(bbox) = parse_box_line(line, path, index + 1)? {
            boxes.push(bbox);
        }
    }
    log::debug!("read {} bounding box(es) from {}", boxes.len(), path.display());
    Ok(boxes)
}

fn parse_id_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<String>, BirdcropError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut tokens = trimmed.split_whitespace();
    let _index = tokens.next();
    match tokens.next() {
        Some(name) => Ok(Some(name.to_string())),
        None => Err(BirdcropError::ManifestFormat {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "expected '<index> <filename>', found 1 token".to_string(),
        }),
    }
}

fn parse_box_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<BoundingBox>, BirdcropError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        let found = if tokens.len() == 6 {
            "more than 5".to_string()
        } else {
            tokens.len().to_string()
        };
        return Err(BirdcropError::ManifestFormat {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected 5 tokens '<index> <x> <y> <width> <height>', found {found}"),
        });
    }

    let x = parse_f64_token(tokens[1], "x", file_path, line_num)?;
    let y = parse_f64_token(tokens[2], "y", file_path, line_num)?;
    let width = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let height = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    if width < 0.0 || height < 0.0 {
        return Err(BirdcropError::ManifestFormat {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("negative extent {width}x{height}"),
        });
    }

    Ok(Some(BoundingBox::new(x, y, width, height)))
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, BirdcropError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| BirdcropError::ManifestFormat {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected finite floating-point number"),
        })
}

/// Fuzz-only entrypoint for id list line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_id_line(input: &str) -> Result<(), BirdcropError> {
    let _ = parse_id_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

/// Fuzz-only entrypoint for bounding-box line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_box_line(input: &str) -> Result<(), BirdcropError> {
    let _ = parse_box_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}
