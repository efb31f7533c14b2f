#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{DynamicImage, GrayImage, Rgb, RgbImage};

/// One image of a generated fixture tree.
pub struct FixtureImage {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub rgb: bool,
    /// `(x, y, width, height)` written to the bounding-box manifest.
    pub bbox: (f64, f64, f64, f64),
}

/// Images covering two categories, one box that cannot be squared and one
/// grayscale image.
pub fn bird_fixtures() -> Vec<FixtureImage> {
    vec![
        FixtureImage {
            name: "001.Black_footed_Albatross/Black_Footed_Albatross_0001.png",
            width: 200,
            height: 200,
            rgb: true,
            bbox: (50.0, 50.0, 20.0, 40.0),
        },
        FixtureImage {
            name: "001.Black_footed_Albatross/Black_Footed_Albatross_0002.png",
            width: 100,
            height: 100,
            rgb: true,
            bbox: (80.0, 10.0, 10.0, 30.0),
        },
        FixtureImage {
            name: "001.Black_footed_Albatross/Black_Footed_Albatross_0003.png",
            width: 120,
            height: 90,
            rgb: true,
            bbox: (10.0, 10.0, 60.0, 50.0),
        },
        FixtureImage {
            name: "002.Laysan_Albatross/Laysan_Albatross_0001.png",
            width: 80,
            height: 80,
            rgb: false,
            bbox: (0.0, 0.0, 10.0, 10.0),
        },
        FixtureImage {
            name: "002.Laysan_Albatross/Laysan_Albatross_0002.png",
            width: 150,
            height: 100,
            rgb: true,
            bbox: (20.0, 20.0, 50.0, 70.0),
        },
        FixtureImage {
            name: "002.Laysan_Albatross/Laysan_Albatross_0003.png",
            width: 64,
            height: 64,
            rgb: true,
            bbox: (4.0, 4.0, 48.0, 48.0),
        },
    ]
}

pub fn write_rgb(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    image.save(path).expect("write rgb image");
}

pub fn write_gray(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    DynamicImage::ImageLuma8(GrayImage::new(width, height))
        .save(path)
        .expect("write gray image");
}

/// Write images under `root/images` and the two manifests under `root`.
pub fn write_fixture_tree(root: &Path, fixtures: &[FixtureImage]) {
    let images_dir = root.join("images");
    let mut ids = String::new();
    let mut boxes = String::new();

    for (i, fixture) in fixtures.iter().enumerate() {
        let path = images_dir.join(fixture.name);
        if fixture.rgb {
            write_rgb(&path, fixture.width, fixture.height);
        } else {
            write_gray(&path, fixture.width, fixture.height);
        }
        let (x, y, w, h) = fixture.bbox;
        ids.push_str(&format!("{} {}\n", i + 1, fixture.name));
        boxes.push_str(&format!("{} {x:.1} {y:.1} {w:.1} {h:.1}\n", i + 1));
    }

    fs::write(root.join("images.txt"), ids).expect("write id list");
    fs::write(root.join("bounding_boxes.txt"), boxes).expect("write box list");
}
