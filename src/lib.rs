// lib.rs
//
// snapstyle: photo style filters for camera captures
//
// - Ten built-in looks (color matrices, posterize, invert, 1-bit dither)
// - Styles always re-derive from the untouched capture, never stack
// - Random "try another style" that never repeats the current one
// - Capture JPEG encoding with timestamped download names

pub mod engine;
pub mod error;
pub mod ops;

use error::SnapStyleError;
use image::ImageReader;
use std::io::{BufRead, BufReader, Cursor, Seek};

pub use engine::{apply_style, select_random_style, PipelineConfig, StyleCatalog, StyledPhoto};
pub use error::{ErrorCategory, Result};
pub use ops::{OutputFormat, Style};

/// Header-only image facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectMetadata {
    pub width: u32,
    pub height: u32,
    /// Detected format (jpeg, png, webp, ...), if recognised
    pub format: Option<String>,
}

fn read_inspect_metadata<R: BufRead + Seek>(reader: R) -> Result<InspectMetadata> {
    let reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| SnapStyleError::decode_failed(format!("failed to read image header: {e}")))?;

    let format = reader.format().map(|f| format!("{:?}", f).to_lowercase());
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| SnapStyleError::decode_failed(format!("failed to read dimensions: {e}")))?;

    Ok(InspectMetadata {
        width,
        height,
        format,
    })
}

/// Read dimensions and format WITHOUT decoding pixels.
///
/// Use this to reject oversized captures before paying for a decode.
pub fn inspect_header_from_bytes(data: &[u8]) -> Result<InspectMetadata> {
    read_inspect_metadata(Cursor::new(data))
}

pub fn inspect_header_from_path(path: &str) -> Result<InspectMetadata> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SnapStyleError::file_not_found(path.to_string()),
        _ => SnapStyleError::file_read_failed(path.to_string(), e),
    })?;
    read_inspect_metadata(BufReader::new(file))
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn supported_input_formats() -> &'static [&'static str] {
    &["jpeg", "jpg", "png", "webp"]
}

pub fn supported_output_formats() -> &'static [&'static str] {
    &["jpeg", "jpg", "png", "webp"]
}

/// Display names of the built-in styles, in catalog order.
pub fn style_names() -> Vec<&'static str> {
    Style::ALL.iter().map(Style::name).collect()
}
