// src/engine/api.rs
//
// StyledPhoto: a captured frame plus the style currently shown on it.
// This is the main public API for the styling engine.

use crate::engine::catalog::StyleCatalog;
use crate::engine::common::EngineResult;
use crate::engine::config::PipelineConfig;
use crate::engine::decoder::decode_bytes_with;
use crate::engine::encoder::{encode, encode_jpeg};
use crate::engine::io::{file_safe_filename, save_encoded, Source};
use crate::engine::pipeline::{apply_style_with_config, resolve_style};
use crate::ops::{OutputFormat, Style};
use image::RgbaImage;
use rand::Rng;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A captured photo and its current style.
///
/// Usage:
/// ```no_run
/// use snapstyle::engine::{PipelineConfig, StyledPhoto};
/// use snapstyle::ops::Style;
///
/// let config = PipelineConfig::default();
/// let bytes = std::fs::read("capture.jpg")?;
/// let mut photo = StyledPhoto::from_bytes(&bytes, &config)?;
/// photo.set_style(Style::Sepia, &config);
/// let jpeg = photo.encode_capture(&config)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct StyledPhoto {
    /// Untouched capture. Every restyle starts from here, so styles never stack.
    original: Arc<RgbaImage>,
    style: Style,
    /// Styled output; `None` while the style is an identity.
    styled: Option<RgbaImage>,
}

impl StyledPhoto {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Wrap an already decoded bitmap. The photo starts unstyled.
    pub fn from_bitmap(original: RgbaImage) -> Self {
        Self {
            original: Arc::new(original),
            style: Style::Original,
            styled: None,
        }
    }

    pub fn from_bytes(data: &[u8], config: &PipelineConfig) -> EngineResult<Self> {
        decode_bytes_with(data, config).map(Self::from_bitmap)
    }

    pub fn from_source(source: &Source, config: &PipelineConfig) -> EngineResult<Self> {
        source.decode(config).map(Self::from_bitmap)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// The bitmap as currently styled.
    pub fn current(&self) -> &RgbaImage {
        self.styled.as_ref().unwrap_or(self.original.as_ref())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    // =========================================================================
    // STYLING
    // =========================================================================

    /// Show `style`, re-derived from the original capture.
    pub fn set_style(&mut self, style: Style, config: &PipelineConfig) {
        self.styled = match apply_style_with_config(Cow::Borrowed(&*self.original), style, config) {
            Cow::Borrowed(_) => None,
            Cow::Owned(img) => Some(img),
        };
        self.style = style;
    }

    /// `set_style` by name; unknown names follow `config.unknown_style`.
    pub fn set_style_by_name(
        &mut self,
        name: &str,
        config: &PipelineConfig,
    ) -> EngineResult<Style> {
        let style = resolve_style(name, config.unknown_style)?;
        self.set_style(style, config);
        Ok(style)
    }

    /// Switch to a random catalog style other than the current one.
    pub fn restyle_random_with<R: Rng + ?Sized>(
        &mut self,
        catalog: &StyleCatalog,
        rng: &mut R,
        config: &PipelineConfig,
    ) -> Style {
        let next = catalog.select_random_with(self.style.name(), rng);
        self.set_style(next, config);
        next
    }

    /// Random restyle from the built-in catalog using the thread-local RNG.
    pub fn restyle(&mut self, config: &PipelineConfig) -> Style {
        self.restyle_random_with(&StyleCatalog::builtin(), &mut rand::rng(), config)
    }

    /// Drop the style and show the original again.
    pub fn reset(&mut self) {
        self.style = Style::Original;
        self.styled = None;
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    pub fn encode(&self, format: OutputFormat) -> EngineResult<Vec<u8>> {
        encode(self.current(), format)
    }

    /// Encode the current bitmap as a capture JPEG at `config.jpeg_quality`.
    pub fn encode_capture(&self, config: &PipelineConfig) -> EngineResult<Vec<u8>> {
        encode_jpeg(self.current(), config.jpeg_quality)
    }

    /// Write the capture JPEG into `dir` under its timestamped download name.
    pub fn save(
        &self,
        dir: impl AsRef<Path>,
        unix_seconds: u64,
        config: &PipelineConfig,
    ) -> EngineResult<PathBuf> {
        let bytes = self.encode_capture(config)?;
        let path = dir.as_ref().join(file_safe_filename(unix_seconds));
        save_encoded(&path, &bytes)?;
        info!(
            target: "snapstyle::api",
            style = self.style.name(),
            path = %path.display(),
            bytes = bytes.len(),
            "saved capture"
        );
        Ok(path)
    }
}
