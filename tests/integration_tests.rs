// tests/integration_tests.rs
//
// End-to-end tests for the public API: capture bytes in, styled capture out.

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use snapstyle::engine::{
    apply_style_batch, decode_bytes, encode_png, Source, StyleCatalog, StyledPhoto,
};
use snapstyle::ops::{OutputFormat, Style};
use snapstyle::PipelineConfig;
use std::io::Write;

// Helper to create a PNG capture buffer
fn create_capture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    encode_png(&img).unwrap()
}

#[test]
fn test_capture_style_download() {
    let config = PipelineConfig::default();
    let mut photo = StyledPhoto::from_bytes(&create_capture(64, 48), &config).unwrap();
    assert_eq!(photo.dimensions(), (64, 48));

    photo.set_style(Style::BlackAndWhite, &config);
    let jpeg = photo.encode_capture(&config).unwrap();
    assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);

    let decoded = decode_bytes(&jpeg).unwrap();
    assert_eq!(decoded.dimensions(), (64, 48));
    // JPEG is lossy; a grayscale capture stays near-gray after the roundtrip.
    for px in decoded.pixels() {
        assert!(px[0].abs_diff(px[1]) <= 6 && px[1].abs_diff(px[2]) <= 6);
    }
}

#[test]
fn test_every_style_encodes_in_every_format() {
    let config = PipelineConfig::default();
    let mut photo = StyledPhoto::from_bytes(&create_capture(20, 10), &config).unwrap();
    for style in Style::ALL {
        photo.set_style(style, &config);
        for format in [
            OutputFormat::default(),
            OutputFormat::Png,
            OutputFormat::WebP,
        ] {
            let bytes = photo.encode(format).unwrap();
            assert!(!bytes.is_empty(), "{style} as {}", format.extension());
        }
    }
}

#[test]
fn test_try_another_style_walk() {
    let config = PipelineConfig::default();
    let catalog = StyleCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut photo = StyledPhoto::from_bytes(&create_capture(16, 16), &config).unwrap();
    let original = photo.original().clone();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        let previous = photo.style();
        let next = photo.restyle_random_with(&catalog, &mut rng, &config);
        assert_ne!(previous, next);
        seen.insert(next);
    }
    assert_eq!(seen.len(), Style::ALL.len());
    assert_eq!(photo.original(), &original);
}

#[test]
fn test_save_from_mapped_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&create_capture(12, 9)).unwrap();
    file.flush().unwrap();

    let config = PipelineConfig::default();
    let source = Source::open_mapped(file.path()).unwrap();
    let mut photo = StyledPhoto::from_source(&source, &config).unwrap();
    photo.set_style(Style::Sepia, &config);

    let dir = tempfile::tempdir().unwrap();
    let path = photo.save(dir.path(), 0, &config).unwrap();
    assert!(path.ends_with("selfie-1970-01-01T00-00-00.jpg"));
    assert_eq!(decode_bytes(&std::fs::read(path).unwrap()).unwrap().dimensions(), (12, 9));
}

#[test]
fn test_batch_styling() {
    let frames: Vec<RgbaImage> = (1..=4)
        .map(|n| decode_bytes(&create_capture(n * 8, n * 4)).unwrap())
        .collect();
    let out = apply_style_batch(&frames, Style::Posterize, &PipelineConfig::default());
    assert_eq!(out.len(), 4);
    for (input, output) in frames.iter().zip(&out) {
        assert_eq!(input.dimensions(), output.dimensions());
    }
}
