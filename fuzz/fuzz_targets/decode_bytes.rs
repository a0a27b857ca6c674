#![no_main]

use libfuzzer_sys::fuzz_target;
use snapstyle::engine::{apply_style, decode_bytes_with, PipelineConfig};
use snapstyle::ops::Style;
use std::borrow::Cow;

fuzz_target!(|data: &[u8]| {
    // Keep decodes small so the fuzzer spends its time in header parsing.
    let config = PipelineConfig::default().with_limits(1024, 1024 * 1024);
    if let Ok(img) = decode_bytes_with(data, &config) {
        let _ = apply_style(Cow::Owned(img), Style::Dither);
    }
});
