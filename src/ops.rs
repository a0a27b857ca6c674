// src/ops.rs
//
// Style definitions and output formats.
// Styles are plain values - the pixel work happens in engine::pipeline.

use crate::error::SnapStyleError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// Default JPEG quality used for captured photos (matches a 0.9 canvas export).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// A named look from the fixed style catalog.
///
/// Every variant is a deterministic transform over an RGBA bitmap that keeps
/// width, height and alpha intact. `Original` is the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    Original,
    BlackAndWhite,
    HighContrast,
    WarmVintage,
    CoolBlue,
    Sepia,
    Dither,
    Saturated,
    Invert,
    Posterize,
}

impl Style {
    /// All styles in catalog order.
    pub const ALL: [Style; 10] = [
        Style::Original,
        Style::BlackAndWhite,
        Style::HighContrast,
        Style::WarmVintage,
        Style::CoolBlue,
        Style::Sepia,
        Style::Dither,
        Style::Saturated,
        Style::Invert,
        Style::Posterize,
    ];

    /// Display name, as shown on the style badge.
    pub fn name(&self) -> &'static str {
        match self {
            Style::Original => "Original",
            Style::BlackAndWhite => "B&W",
            Style::HighContrast => "High Contrast",
            Style::WarmVintage => "Warm Vintage",
            Style::CoolBlue => "Cool Blue",
            Style::Sepia => "Sepia",
            Style::Dither => "Dither",
            Style::Saturated => "Saturated",
            Style::Invert => "Invert",
            Style::Posterize => "Posterize",
        }
    }

    /// Resolve a style from its display name or a loose identifier.
    ///
    /// Matching ignores case, surrounding whitespace, spaces, `-` and `_`,
    /// so `"High Contrast"`, `"high-contrast"` and `"HIGH_CONTRAST"` all match.
    /// `"bw"` and `"black and white"` are accepted for `B&W`.
    pub fn from_name(name: &str) -> Option<Style> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "original" | "none" => Some(Style::Original),
            "b&w" | "bw" | "blackandwhite" | "blackwhite" => Some(Style::BlackAndWhite),
            "highcontrast" => Some(Style::HighContrast),
            "warmvintage" => Some(Style::WarmVintage),
            "coolblue" => Some(Style::CoolBlue),
            "sepia" => Some(Style::Sepia),
            "dither" => Some(Style::Dither),
            "saturated" => Some(Style::Saturated),
            "invert" => Some(Style::Invert),
            "posterize" => Some(Style::Posterize),
            _ => None,
        }
    }

    /// Static contract describing how the style touches pixels.
    pub fn contract(&self) -> StyleContract {
        let traits = match self {
            Style::Original => StyleTraits::IDENTITY,
            Style::BlackAndWhite => StyleTraits::PER_PIXEL | StyleTraits::GRAYSCALE_OUTPUT,
            Style::Dither => StyleTraits::ERROR_DIFFUSION | StyleTraits::GRAYSCALE_OUTPUT,
            Style::Invert => StyleTraits::PER_PIXEL | StyleTraits::INVOLUTION,
            Style::Posterize => StyleTraits::PER_PIXEL | StyleTraits::IDEMPOTENT,
            Style::HighContrast
            | Style::WarmVintage
            | Style::CoolBlue
            | Style::Sepia
            | Style::Saturated => StyleTraits::PER_PIXEL,
        };
        StyleContract {
            name: self.name(),
            traits,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Style::Original)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = SnapStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::from_name(s).ok_or_else(|| SnapStyleError::unknown_style(s.to_string()))
    }
}

bitflags! {
    /// Pixel-access traits of a style.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StyleTraits: u8 {
        /// Output equals input; no copy is made.
        const IDENTITY = 0b0000_0001;
        /// Each output pixel depends only on the same input pixel.
        /// Rows may be processed in any order (or in parallel).
        const PER_PIXEL = 0b0000_0010;
        /// Output depends on previously visited pixels; strict row-major order.
        const ERROR_DIFFUSION = 0b0000_0100;
        /// R == G == B in every output pixel.
        const GRAYSCALE_OUTPUT = 0b0000_1000;
        /// Applying twice restores the input exactly.
        const INVOLUTION = 0b0001_0000;
        /// Applying twice equals applying once.
        const IDEMPOTENT = 0b0010_0000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleContract {
    pub name: &'static str,
    pub traits: StyleTraits,
}

impl StyleContract {
    pub fn parallelizable(&self) -> bool {
        self.traits.contains(StyleTraits::PER_PIXEL)
    }
}

/// Output format for encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
    /// Lossless WebP (the pure-Rust encoder has no lossy mode)
    WebP,
}

impl OutputFormat {
    pub fn parse(format: &str, quality: Option<u8>) -> Result<Self, SnapStyleError> {
        let q = quality.unwrap_or(DEFAULT_JPEG_QUALITY);
        match format.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg { quality: q }),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(SnapStyleError::unsupported_format(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
