#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use image::RgbaImage;
use libfuzzer_sys::fuzz_target;
use snapstyle::engine::{apply_style_with_config, PipelineConfig};
use snapstyle::ops::Style;
use std::borrow::Cow;

#[derive(Arbitrary, Debug)]
struct StyleSeed {
    style: u8,
    width: u8,
    height: u8,
    parallel: bool,
}

fn build_bitmap(seed: &StyleSeed, data: &[u8]) -> RgbaImage {
    let width = seed.width as u32 % 64;
    let height = seed.height as u32 % 64;
    let mut buffer = vec![0u8; (width * height * 4) as usize];
    for (i, byte) in buffer.iter_mut().enumerate() {
        *byte = data.get(i % data.len().max(1)).copied().unwrap_or(0);
    }
    RgbaImage::from_raw(width, height, buffer).unwrap_or_default()
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let seed = match StyleSeed::arbitrary(&mut unstructured) {
        Ok(seed) => seed,
        Err(_) => return,
    };

    let style = Style::ALL[seed.style as usize % Style::ALL.len()];
    let config = if seed.parallel {
        PipelineConfig::default().with_parallel_threshold(Some(0))
    } else {
        PipelineConfig::sequential()
    };

    let img = build_bitmap(&seed, data);
    let out = apply_style_with_config(Cow::Borrowed(&img), style, &config);
    assert_eq!(out.dimensions(), img.dimensions());
    for (a, b) in img.pixels().zip(out.pixels()) {
        assert_eq!(a[3], b[3]);
    }
});
