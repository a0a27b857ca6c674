// src/engine/decoder.rs
//
// Decoder operations: captured frames (JPEG, PNG, WebP) to RGBA8 bitmaps.

use crate::engine::common::{run_with_panic_policy, EngineResult};
use crate::engine::config::PipelineConfig;
use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::SnapStyleError;
use image::{ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Check dimensions against the global limits.
pub fn check_dimensions(width: u32, height: u32) -> EngineResult<()> {
    check_dimensions_with(width, height, MAX_DIMENSION, MAX_PIXELS)
}

pub fn check_dimensions_with(
    width: u32,
    height: u32,
    max_dimension: u32,
    max_pixels: u64,
) -> EngineResult<()> {
    if width > max_dimension || height > max_dimension {
        return Err(SnapStyleError::dimension_exceeds_limit(
            width.max(height),
            max_dimension,
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > max_pixels {
        return Err(SnapStyleError::pixel_count_exceeds_limit(pixels, max_pixels));
    }
    Ok(())
}

/// Sniff the container format from magic bytes.
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    image::guess_format(data).ok()
}

fn ensure_supported(format: ImageFormat) -> EngineResult<()> {
    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP => Ok(()),
        other => Err(SnapStyleError::unsupported_format(
            format!("{other:?}").to_lowercase(),
        )),
    }
}

/// Decode with the default limits.
pub fn decode_bytes(data: &[u8]) -> EngineResult<RgbaImage> {
    decode_bytes_with(data, &PipelineConfig::default())
}

/// Decode `data` to RGBA8, rejecting oversized images before pixels are decoded.
pub fn decode_bytes_with(data: &[u8], config: &PipelineConfig) -> EngineResult<RgbaImage> {
    if data.is_empty() {
        return Err(SnapStyleError::decode_failed("empty input"));
    }

    let format = detect_format(data)
        .ok_or_else(|| SnapStyleError::unsupported_format("unknown"))?;
    ensure_supported(format)?;

    run_with_panic_policy("decode:image", || {
        // Header-only pass first so a decompression bomb never allocates.
        let (width, height) = ImageReader::with_format(Cursor::new(data), format)
            .into_dimensions()
            .map_err(|e| SnapStyleError::decode_failed(format!("failed to read dimensions: {e}")))?;
        check_dimensions_with(width, height, config.max_dimension, config.max_pixels)?;

        let img = image::load_from_memory_with_format(data, format)
            .map_err(|e| SnapStyleError::decode_failed(format!("decode failed: {e}")))?;
        debug!(
            target: "snapstyle::decoder",
            format = ?format,
            width,
            height,
            "decoded frame"
        );
        Ok(img.into_rgba8())
    })
}
