//! Fuzz target for id list line parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the `<index> <filename>`
//! parser, checking for panics, crashes, or hangs.

#![no_main]

use birdcrop::manifest::fuzz_parse_id_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_id_line(line);
});
