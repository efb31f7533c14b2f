//! Compressed dataset archive.
//!
//! A Deflate-compressed zip holding two NumPy arrays, the same layout
//! `numpy.savez_compressed` produces:
//!
//! - `image_data`: `uint8` array of shape `(N, side, side, 3)`
//! - `image_names`: fixed-width unicode array of shape `(N,)`
//!
//! Entry `i` of one array pairs with entry `i` of the other.

mod npy;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use image::RgbImage;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::dataset::{Dataset, Sample};
use crate::error::BirdcropError;

pub use npy::NpyHeader;

/// Key of the pixel array.
pub const IMAGE_DATA_KEY: &str = "image_data";
/// Key of the filename array.
pub const IMAGE_NAMES_KEY: &str = "image_names";

const PIXEL_DESCR: &str = "|u1";
const CHANNELS: usize = 3;

/// Write `dataset` to a compressed archive at `path`.
///
/// Every sample must have the same square size.
pub fn save_archive(path: &Path, dataset: &Dataset) -> Result<(), BirdcropError> {
    let side = dataset
        .uniform_side()
        .map_err(|message| BirdcropError::ArchiveFormat {
            path: path.to_path_buf(),
            key: IMAGE_DATA_KEY.to_string(),
            message,
        })?
        .unwrap_or(0) as usize;

    let zip_err = |source: ZipError| BirdcropError::ArchiveWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let pixel_bytes = dataset.len() * side * side * CHANNELS;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(pixel_bytes as u64 >= u64::from(u32::MAX));
    zip.start_file(npy_entry(IMAGE_DATA_KEY), options)
        .map_err(zip_err)?;
    let header = NpyHeader::new(PIXEL_DESCR, vec![dataset.len(), side, side, CHANNELS]);
    zip.write_all(&header.encode())?;
    for sample in &dataset.samples {
        zip.write_all(sample.pixels.as_raw())?;
    }

    let names: Vec<String> = dataset.samples.iter().map(|s| s.name.clone()).collect();
    let width = npy::unicode_width(&names);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(npy_entry(IMAGE_NAMES_KEY), options)
        .map_err(zip_err)?;
    let header = NpyHeader::new(format!("<U{width}"), vec![names.len()]);
    zip.write_all(&header.encode())?;
    zip.write_all(&npy::encode_unicode(&names, width))?;

    let mut inner = zip.finish().map_err(zip_err)?;
    inner.flush()?;

    log::info!(
        "saved {} image(s) of {side}x{side} to {}",
        dataset.len(),
        path.display()
    );
    Ok(())
}

/// Read a dataset previously written by [`save_archive`] (or by numpy).
pub fn load_archive(path: &Path) -> Result<Dataset, BirdcropError> {
    let file = File::open(path)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|source| {
        BirdcropError::ArchiveRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let names_raw = read_entry(&mut zip, path, IMAGE_NAMES_KEY)?;
    let names = decode_names(&names_raw, path)?;

    let data_raw = read_entry(&mut zip, path, IMAGE_DATA_KEY)?;
    let images = decode_images(&data_raw, path)?;

    if images.len() != names.len() {
        return Err(format_error(
            path,
            IMAGE_NAMES_KEY,
            format!(
                "{} name(s) for {} image(s); the arrays must pair up",
                names.len(),
                images.len()
            ),
        ));
    }

    let samples = images
        .into_iter()
        .zip(names)
        .map(|(pixels, name)| Sample::new(pixels, name))
        .collect::<Vec<_>>();

    log::info!("loaded {} image(s) from {}", samples.len(), path.display());
    Ok(Dataset::new(samples))
}

fn npy_entry(key: &str) -> String {
    format!("{key}.npy")
}

fn read_entry<R: Read + std::io::Seek>(
    zip: &mut ZipArchive<R>,
    path: &Path,
    key: &str,
) -> Result<Vec<u8>, BirdcropError> {
    let mut entry = match zip.by_name(&npy_entry(key)) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(BirdcropError::ArchiveMissingKey {
                path: path.to_path_buf(),
                key: key.to_string(),
            });
        }
        Err(source) => {
            return Err(BirdcropError::ArchiveRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn decode_names(raw: &[u8], path: &Path) -> Result<Vec<String>, BirdcropError> {
    let (header, data) =
        npy::decode(raw).map_err(|message| format_error(path, IMAGE_NAMES_KEY, message))?;

    let width = header
        .descr
        .strip_prefix("<U")
        .and_then(|w| w.parse::<usize>().ok())
        .ok_or_else(|| {
            format_error(
                path,
                IMAGE_NAMES_KEY,
                format!("expected a '<U' string dtype, found '{}'", header.descr),
            )
        })?;

    let [count] = header.shape[..] else {
        return Err(format_error(
            path,
            IMAGE_NAMES_KEY,
            format!("expected a 1-d array, found shape {:?}", header.shape),
        ));
    };

    npy::decode_unicode(data, count, width)
        .map_err(|message| format_error(path, IMAGE_NAMES_KEY, message))
}

fn decode_images(raw: &[u8], path: &Path) -> Result<Vec<RgbImage>, BirdcropError> {
    let (header, data) =
        npy::decode(raw).map_err(|message| format_error(path, IMAGE_DATA_KEY, message))?;

    if !matches!(header.descr.as_str(), "|u1" | "u1" | "<u1") {
        return Err(format_error(
            path,
            IMAGE_DATA_KEY,
            format!("expected uint8 pixels, found dtype '{}'", header.descr),
        ));
    }
    if header.fortran_order {
        return Err(format_error(
            path,
            IMAGE_DATA_KEY,
            "fortran-ordered arrays are not supported".to_string(),
        ));
    }

    let (count, height, width) = match header.shape[..] {
        [count, height, width, CHANNELS] => (count, height, width),
        [0] => (0, 0, 0),
        _ => {
            return Err(format_error(
                path,
                IMAGE_DATA_KEY,
                format!("expected shape (N, H, W, 3), found {:?}", header.shape),
            ));
        }
    };

    let sizes = height
        .checked_mul(width)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .and_then(|stride| Some((stride, stride.checked_mul(count)?)));
    let Some((stride, expected)) = sizes else {
        return Err(format_error(
            path,
            IMAGE_DATA_KEY,
            format!("shape {:?} is too large to address", header.shape),
        ));
    };
    let (Ok(image_width), Ok(image_height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(format_error(
            path,
            IMAGE_DATA_KEY,
            format!("image size {width}x{height} is out of range"),
        ));
    };
    if data.len() < expected {
        return Err(format_error(
            path,
            IMAGE_DATA_KEY,
            format!(
                "expected {} bytes of pixel data, found {}",
                expected,
                data.len()
            ),
        ));
    }

    (0..count)
        .map(|i| {
            let chunk = data[i * stride..(i + 1) * stride].to_vec();
            RgbImage::from_raw(image_width, image_height, chunk).ok_or_else(|| {
                format_error(
                    path,
                    IMAGE_DATA_KEY,
                    format!("image {i} does not fit {width}x{height}"),
                )
            })
        })
        .collect()
}

fn format_error(path: &Path, key: &str, message: String) -> BirdcropError {
    BirdcropError::ArchiveFormat {
        path: path.to_path_buf(),
        key: key.to_string(),
        message,
    }
}
