// src/engine/pipeline.rs
//
// Style dispatch and the per-pixel color transforms.
// Dither lives in dither.rs because it is the only style with
// dependencies between pixels.

use crate::engine::config::{PipelineConfig, UnknownStylePolicy};
use crate::engine::dither;
use crate::error::SnapStyleError;
use crate::ops::Style;
use image::RgbaImage;
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::{debug, warn};

// Type alias for Result - always use SnapStyleError to preserve error taxonomy
type PipelineResult<T> = std::result::Result<T, SnapStyleError>;

/// 255 / 4: four posterize bands.
pub const POSTERIZE_STEP: f32 = 255.0 / 4.0;
const HIGH_CONTRAST_FACTOR: f32 = 1.6;
const SATURATION_FACTOR: f32 = 1.8;

/// Perceptual luma (BT.601 weights).
///
/// Computed as an integer weighted sum over 1000 so gray inputs map back to
/// themselves exactly (128 gray has luma 128.0, not 127.99999).
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> f32 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f32 / 1000.0
}

/// Round half away from zero, then clamp to a channel value.
#[inline]
pub(crate) fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Wrap a raw RGBA8 buffer, rejecting a length other than `width * height * 4`.
pub fn bitmap_from_raw(width: u32, height: u32, data: Vec<u8>) -> PipelineResult<RgbaImage> {
    let expected = width as u64 * height as u64 * 4;
    let actual = data.len() as u64;
    if expected != actual {
        return Err(SnapStyleError::invalid_bitmap(width, height, expected, actual));
    }
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| SnapStyleError::invalid_bitmap(width, height, expected, actual))
}

/// Apply `style` with the default configuration.
///
/// `Original` (and any zero-area bitmap) hands the input straight back
/// without copying. Every other style returns a new bitmap of the same
/// dimensions; the input is never mutated, so styles never compose as long
/// as callers always restyle from the untouched original.
pub fn apply_style<'a>(img: Cow<'a, RgbaImage>, style: Style) -> Cow<'a, RgbaImage> {
    apply_style_with_config(img, style, &PipelineConfig::default())
}

pub fn apply_style_with_config<'a>(
    img: Cow<'a, RgbaImage>,
    style: Style,
    config: &PipelineConfig,
) -> Cow<'a, RgbaImage> {
    let contract = style.contract();
    let (width, height) = img.dimensions();

    if style.is_identity() || width == 0 || height == 0 {
        debug!(target: "snapstyle::pipeline", style = contract.name, width, height, "no-op");
        return img;
    }

    let parallel =
        contract.parallelizable() && config.should_parallelize(width as u64 * height as u64);
    debug!(
        target: "snapstyle::pipeline",
        style = contract.name,
        width,
        height,
        parallel,
        "apply style"
    );

    let out = match style {
        Style::Original => return img,
        Style::Dither => dither::floyd_steinberg(&img),
        Style::BlackAndWhite => map_pixels(&img, parallel, black_and_white),
        Style::HighContrast => map_pixels(&img, parallel, high_contrast),
        Style::WarmVintage => map_pixels(&img, parallel, warm_vintage),
        Style::CoolBlue => map_pixels(&img, parallel, cool_blue),
        Style::Sepia => map_pixels(&img, parallel, sepia),
        Style::Saturated => map_pixels(&img, parallel, saturated),
        Style::Invert => map_pixels(&img, parallel, invert),
        Style::Posterize => map_pixels(&img, parallel, posterize),
    };
    Cow::Owned(out)
}

/// Resolve a style name under the configured unknown-style policy.
pub fn resolve_style(name: &str, policy: UnknownStylePolicy) -> PipelineResult<Style> {
    match Style::from_name(name) {
        Some(style) => Ok(style),
        None => match policy {
            UnknownStylePolicy::Identity => {
                warn!(target: "snapstyle::pipeline", name, "unknown style, using Original");
                Ok(Style::Original)
            }
            UnknownStylePolicy::Reject => Err(SnapStyleError::unknown_style(name.to_string())),
        },
    }
}

/// Apply a style selected by name.
pub fn apply_named_style<'a>(
    img: Cow<'a, RgbaImage>,
    name: &str,
    config: &PipelineConfig,
) -> PipelineResult<Cow<'a, RgbaImage>> {
    let style = resolve_style(name, config.unknown_style)?;
    Ok(apply_style_with_config(img, style, config))
}

/// Run a per-pixel RGB transform over every pixel, copying alpha through.
fn map_pixels<F>(src: &RgbaImage, parallel: bool, transform: F) -> RgbaImage
where
    F: Fn(u8, u8, u8) -> [f32; 3] + Sync,
{
    let (width, height) = src.dimensions();
    let mut out = RgbaImage::new(width, height);
    let stride = width as usize * 4;

    let src_raw: &[u8] = src.as_raw();
    let dst_raw: &mut [u8] = &mut out;

    let process_row = |(row_out, row_in): (&mut [u8], &[u8])| {
        for (px_out, px_in) in row_out.chunks_exact_mut(4).zip(row_in.chunks_exact(4)) {
            let [r, g, b] = transform(px_in[0], px_in[1], px_in[2]);
            px_out[0] = to_channel(r);
            px_out[1] = to_channel(g);
            px_out[2] = to_channel(b);
            px_out[3] = px_in[3];
        }
    };

    if parallel {
        dst_raw
            .par_chunks_mut(stride)
            .zip(src_raw.par_chunks(stride))
            .for_each(process_row);
    } else {
        dst_raw
            .chunks_mut(stride)
            .zip(src_raw.chunks(stride))
            .for_each(process_row);
    }
    out
}

fn black_and_white(r: u8, g: u8, b: u8) -> [f32; 3] {
    let y = luma(r, g, b);
    [y, y, y]
}

fn high_contrast(r: u8, g: u8, b: u8) -> [f32; 3] {
    let stretch = |c: u8| HIGH_CONTRAST_FACTOR * (c as f32 - 128.0) + 128.0;
    [stretch(r), stretch(g), stretch(b)]
}

fn warm_vintage(r: u8, g: u8, b: u8) -> [f32; 3] {
    [
        1.1 * r as f32 + 20.0,
        0.95 * g as f32 + 10.0,
        0.8 * b as f32,
    ]
}

fn cool_blue(r: u8, g: u8, b: u8) -> [f32; 3] {
    [0.85 * r as f32, 0.95 * g as f32, 1.2 * b as f32 + 15.0]
}

/// Sepia matrix in thousandths.
const SEPIA_WEIGHTS: [[u32; 3]; 3] = [[393, 769, 189], [349, 686, 168], [272, 534, 131]];

// Integer sums keep exact halves exact (0.769 * 6 + 0.189 * 174 is 37.5, not 37.49998).
fn sepia(r: u8, g: u8, b: u8) -> [f32; 3] {
    SEPIA_WEIGHTS.map(|[wr, wg, wb]| {
        let weighted = wr * r as u32 + wg * g as u32 + wb * b as u32;
        weighted as f32 / 1000.0
    })
}

fn saturated(r: u8, g: u8, b: u8) -> [f32; 3] {
    let avg = (r as f32 + g as f32 + b as f32) / 3.0;
    let push = |c: u8| avg + (c as f32 - avg) * SATURATION_FACTOR;
    [push(r), push(g), push(b)]
}

fn invert(r: u8, g: u8, b: u8) -> [f32; 3] {
    [(255 - r) as f32, (255 - g) as f32, (255 - b) as f32]
}

fn posterize(r: u8, g: u8, b: u8) -> [f32; 3] {
    let band = |c: u8| (c as f32 / POSTERIZE_STEP).round() * POSTERIZE_STEP;
    [band(r), band(g), band(b)]
}
