// src/engine/encoder.rs
//
// Encoder operations: JPEG (capture/download), PNG, lossless WebP.

use crate::engine::common::{run_with_panic_policy, EngineResult};
use crate::engine::MAX_DIMENSION;
use crate::error::SnapStyleError;
use crate::ops::OutputFormat;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

fn validate_for_encode(img: &RgbaImage, format: &'static str) -> EngineResult<()> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(SnapStyleError::encode_failed(
            format,
            "width or height is zero",
        ));
    }
    if w > MAX_DIMENSION || h > MAX_DIMENSION {
        return Err(SnapStyleError::dimension_exceeds_limit(w.max(h), MAX_DIMENSION));
    }
    Ok(())
}

/// Encode to JPEG. Alpha is dropped; quality is clamped to 1-100.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> EngineResult<Vec<u8>> {
    validate_for_encode(img, "jpeg")?;
    run_with_panic_policy("encode:jpeg", || {
        let quality = quality.clamp(1, 100);
        let rgb: RgbImage = img.convert();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| SnapStyleError::encode_failed("jpeg", e.to_string()))?;
        Ok(buf)
    })
}

pub fn encode_png(img: &RgbaImage) -> EngineResult<Vec<u8>> {
    validate_for_encode(img, "png")?;
    run_with_panic_policy("encode:png", || {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
            .map_err(|e| SnapStyleError::encode_failed("png", e.to_string()))?;
        Ok(buf)
    })
}

pub fn encode_webp(img: &RgbaImage) -> EngineResult<Vec<u8>> {
    validate_for_encode(img, "webp")?;
    run_with_panic_policy("encode:webp", || {
        let mut buf = Vec::new();
        WebPEncoder::new_lossless(&mut buf)
            .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
            .map_err(|e| SnapStyleError::encode_failed("webp", e.to_string()))?;
        Ok(buf)
    })
}

pub fn encode(img: &RgbaImage, format: OutputFormat) -> EngineResult<Vec<u8>> {
    match format {
        OutputFormat::Jpeg { quality } => encode_jpeg(img, quality),
        OutputFormat::Png => encode_png(img),
        OutputFormat::WebP => encode_webp(img),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
    }

    #[test]
    fn jpeg_magic_bytes() {
        let encoded = encode_jpeg(&test_image(16, 16), 90).unwrap();
        assert_eq!(&encoded[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn png_magic_bytes_and_lossless() {
        let img = test_image(5, 7);
        let encoded = encode_png(&img).unwrap();
        assert_eq!(
            &encoded[0..8],
            &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
        let decoded = image::load_from_memory(&encoded).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn webp_magic_bytes() {
        let encoded = encode_webp(&test_image(4, 4)).unwrap();
        assert_eq!(&encoded[0..4], b"RIFF");
        assert_eq!(&encoded[8..12], b"WEBP");
    }

    #[test]
    fn lower_quality_is_smaller() {
        let img = test_image(64, 64);
        let high = encode_jpeg(&img, 95).unwrap();
        let low = encode_jpeg(&img, 10).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn zero_quality_is_clamped() {
        assert!(encode_jpeg(&test_image(2, 2), 0).is_ok());
    }

    #[test]
    fn zero_area_is_rejected() {
        let img = RgbaImage::new(0, 3);
        for format in [
            OutputFormat::Jpeg { quality: 90 },
            OutputFormat::Png,
            OutputFormat::WebP,
        ] {
            assert!(matches!(
                encode(&img, format),
                Err(SnapStyleError::EncodeFailed { .. })
            ));
        }
    }
}
