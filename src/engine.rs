// src/engine.rs
//
// The core of snapstyle. Captured frames flow through:
// 1. decode (JPEG/PNG/WebP) into an RGBA8 bitmap
// 2. one style from the catalog, always applied to the untouched original
// 3. encode back to a capture JPEG (or PNG/WebP)
//
// This file is a facade over the modules in engine/.

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed image dimension (width or height).
/// Images larger than 32768x32768 are rejected to prevent decompression bombs.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 400MB uncompressed RGBA.
pub const MAX_PIXELS: u64 = 100_000_000;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod catalog;
mod common;
mod config;
mod decoder;
mod dither;
mod encoder;
mod io;
mod pipeline;
mod pool;

pub use api::StyledPhoto;
pub use catalog::{select_random_style, StyleCatalog};
pub use common::{run_with_panic_policy, EngineResult};
pub use config::{PipelineConfig, UnknownStylePolicy, DEFAULT_PARALLEL_THRESHOLD};
pub use decoder::{
    check_dimensions, check_dimensions_with, decode_bytes, decode_bytes_with, detect_format,
};
pub use dither::{floyd_steinberg, DITHER_THRESHOLD};
pub use encoder::{encode, encode_jpeg, encode_png, encode_webp};
pub use io::{download_filename, file_safe_filename, iso_timestamp, save_encoded, Source};
pub use pipeline::{
    apply_named_style, apply_style, apply_style_with_config, bitmap_from_raw, resolve_style,
    POSTERIZE_STEP,
};
pub use pool::{
    apply_named_style_batch, apply_style_batch, apply_styles_batch, get_pool, MAX_THREADS,
};
