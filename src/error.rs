use std::path::PathBuf;
use thiserror::Error;

/// The main error type for birdcrop operations.
#[derive(Debug, Error)]
pub enum BirdcropError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed manifest {path} at line {line}: {message}")]
    ManifestFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(
        "Manifest length mismatch: {images} image(s) listed but {boxes} bounding box(es) found"
    )]
    ManifestMismatch { images: usize, boxes: usize },

    #[error("Cannot derive a category from '{name}': {message}")]
    InvalidCategory { name: String, message: String },

    #[error("Invalid split configuration: {message}")]
    InvalidSplitConfig { message: String },

    #[error("Box geometry invariant violated for {context}: {message}")]
    GeometryInvariant { context: String, message: String },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to read archive {path}: {source}")]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive {path} is missing required array '{key}'")]
    ArchiveMissingKey { path: PathBuf, key: String },

    #[error("Archive {path} has a malformed '{key}' array: {message}")]
    ArchiveFormat {
        path: PathBuf,
        key: String,
        message: String,
    },

    #[error("Failed to render JSON report: {0}")]
    ReportWrite(#[from] serde_json::Error),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
