//! Fuzz target for text sweep parsing.
//!
//! Feeds arbitrary bytes to the text reader, including its 2D reshaping and
//! header metadata parsing, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sweepnorm::sweep::io_text::from_sweep_txt_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(dataset) = from_sweep_txt_slice(data) {
        for title in dataset.channel_titles() {
            let _ = dataset.get_channel(title, true, false);
        }
        let _ = dataset.get_extent(false);
    }
});
