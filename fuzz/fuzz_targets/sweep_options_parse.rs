//! Fuzz target for the sweep options header line.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sweepnorm::sweep::io_text::fuzz_parse_sweep_options;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = fuzz_parse_sweep_options(line);
    }
});
