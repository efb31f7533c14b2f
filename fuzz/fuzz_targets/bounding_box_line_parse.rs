//! Fuzz target for bounding-box line parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the
//! `<index> <x> <y> <width> <height>` parser and squares every box that
//! parses, checking for panics, crashes, or hangs.

#![no_main]

use birdcrop::geometry::square_normalize;
use birdcrop::manifest::{bounding_boxes_from_str, fuzz_parse_box_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_box_line(line);

    if let Ok(boxes) = bounding_boxes_from_str(line) {
        for bbox in &boxes {
            let _ = square_normalize(640, 480, bbox);
        }
    }
});
