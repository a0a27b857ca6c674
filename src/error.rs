// src/error.rs
//
// Errors for the capture -> style -> download path.
//
// Styling itself never fails; everything here comes from the edges: a bad
// style name or raw buffer from the caller, a capture the codecs cannot
// read or write, a frame larger than the configured limits, or the file
// the capture is loaded from or saved to.

use std::borrow::Cow;
use thiserror::Error;

/// Who can act on an error.
///
/// A UI picks its message from this: retry with another style or file,
/// re-capture, free disk space, or report a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Bad style name, raw buffer, setting, or missing capture file
    UserError,
    /// The capture bytes (or the requested output) are not something the codecs handle
    CodecError,
    /// Frame over the size limits, or the filesystem refused a read, map or save
    ResourceLimit,
    /// A codec panicked
    InternalBug,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "UserError",
            ErrorCategory::CodecError => "CodecError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InternalBug => "InternalBug",
        }
    }

    /// Stable SNAPSTYLE_* code for this category
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "SNAPSTYLE_USER_ERROR",
            ErrorCategory::CodecError => "SNAPSTYLE_CODEC_ERROR",
            ErrorCategory::ResourceLimit => "SNAPSTYLE_RESOURCE_LIMIT",
            ErrorCategory::InternalBug => "SNAPSTYLE_INTERNAL_BUG",
        }
    }
}

/// Every failure a snapstyle call can report.
#[derive(Debug, Error)]
pub enum SnapStyleError {
    // Caller input
    #[error("No style named '{name}' in the catalog")]
    UnknownStyle { name: Cow<'static, str> },

    #[error("RGBA buffer for a {width}x{height} bitmap must be {expected} bytes, got {actual}")]
    InvalidBitmap {
        width: u32,
        height: u32,
        expected: u64,
        actual: u64,
    },

    // Capture files
    #[error("Capture file not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Cannot read capture '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot map capture '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot save capture to '{path}': {source}")]
    FileWriteFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    // Codecs
    #[error("Unsupported format {format}: expected JPEG, PNG or WebP")]
    UnsupportedFormat { format: Cow<'static, str> },

    #[error("Cannot decode capture: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    #[error("Cannot encode {format}: {message}")]
    EncodeFailed {
        format: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    // Frame limits
    #[error("Frame side of {dimension} px exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Frame of {pixels} px exceeds max of {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // Settings
    #[error("Bad {name} '{value}': {reason}")]
    InvalidArgument {
        name: Cow<'static, str>,
        value: Cow<'static, str>,
        reason: Cow<'static, str>,
    },

    // Bugs
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },
}

fn clone_io_error(source: &std::io::Error) -> std::io::Error {
    std::io::Error::new(source.kind(), source.to_string())
}

impl Clone for SnapStyleError {
    fn clone(&self) -> Self {
        match self {
            Self::UnknownStyle { name } => Self::UnknownStyle { name: name.clone() },
            Self::InvalidBitmap {
                width,
                height,
                expected,
                actual,
            } => Self::InvalidBitmap {
                width: *width,
                height: *height,
                expected: *expected,
                actual: *actual,
            },
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::FileReadFailed { path, source } => Self::FileReadFailed {
                path: path.clone(),
                source: clone_io_error(source),
            },
            Self::MmapFailed { path, source } => Self::MmapFailed {
                path: path.clone(),
                source: clone_io_error(source),
            },
            Self::FileWriteFailed { path, source } => Self::FileWriteFailed {
                path: path.clone(),
                source: clone_io_error(source),
            },
            Self::UnsupportedFormat { format } => Self::UnsupportedFormat {
                format: format.clone(),
            },
            Self::DecodeFailed { message } => Self::DecodeFailed {
                message: message.clone(),
            },
            Self::EncodeFailed { format, message } => Self::EncodeFailed {
                format: format.clone(),
                message: message.clone(),
            },
            Self::DimensionExceedsLimit { dimension, max } => Self::DimensionExceedsLimit {
                dimension: *dimension,
                max: *max,
            },
            Self::PixelCountExceedsLimit { pixels, max } => Self::PixelCountExceedsLimit {
                pixels: *pixels,
                max: *max,
            },
            Self::InvalidArgument {
                name,
                value,
                reason,
            } => Self::InvalidArgument {
                name: name.clone(),
                value: value.clone(),
                reason: reason.clone(),
            },
            Self::InternalPanic { message } => Self::InternalPanic {
                message: message.clone(),
            },
        }
    }
}

// Constructor Helpers
impl SnapStyleError {
    pub fn unknown_style(name: impl Into<Cow<'static, str>>) -> Self {
        Self::UnknownStyle { name: name.into() }
    }

    pub fn invalid_bitmap(width: u32, height: u32, expected: u64, actual: u64) -> Self {
        Self::InvalidBitmap {
            width,
            height,
            expected,
            actual,
        }
    }

    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn file_write_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(
        format: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn invalid_argument(
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    /// True when trying again with other input or a smaller frame can succeed.
    /// A capture the codecs rejected fails the same way every time.
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownStyle { .. }
            | Self::InvalidBitmap { .. }
            | Self::FileNotFound { .. }
            | Self::InvalidArgument { .. } => ErrorCategory::UserError,

            Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::EncodeFailed { .. } => ErrorCategory::CodecError,

            // A capture that cannot be mapped or saved is an environment
            // problem (full disk, read-only download dir), not a bad request.
            Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. }
            | Self::FileWriteFailed { .. } => ErrorCategory::ResourceLimit,

            Self::InternalPanic { .. } => ErrorCategory::InternalBug,
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, SnapStyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SnapStyleError::unknown_style("Vaporwave");
        assert!(err.to_string().contains("'Vaporwave'"));

        let err = SnapStyleError::invalid_bitmap(2, 2, 16, 15);
        assert_eq!(
            err.to_string(),
            "RGBA buffer for a 2x2 bitmap must be 16 bytes, got 15"
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(SnapStyleError::unknown_style("x").is_recoverable());
        assert!(SnapStyleError::invalid_bitmap(1, 1, 4, 3).is_recoverable());
        assert!(SnapStyleError::dimension_exceeds_limit(40000, 32768).is_recoverable());
        assert!(!SnapStyleError::decode_failed("test").is_recoverable());
        assert!(!SnapStyleError::internal_panic("test").is_recoverable());
    }

    #[test]
    fn test_error_category_user_error() {
        assert_eq!(
            SnapStyleError::unknown_style("x").category(),
            ErrorCategory::UserError
        );
        assert_eq!(
            SnapStyleError::file_not_found("a.jpg").category(),
            ErrorCategory::UserError
        );
        assert_eq!(
            SnapStyleError::invalid_argument("quality", "0", "must be 1-100").category(),
            ErrorCategory::UserError
        );
    }

    #[test]
    fn test_error_category_codec_error() {
        assert_eq!(
            SnapStyleError::unsupported_format("tiff").category(),
            ErrorCategory::CodecError
        );
        assert_eq!(
            SnapStyleError::decode_failed("test").category(),
            ErrorCategory::CodecError
        );
        assert_eq!(
            SnapStyleError::encode_failed("jpeg", "test").category(),
            ErrorCategory::CodecError
        );
    }

    #[test]
    fn test_error_category_resource_limit() {
        assert_eq!(
            SnapStyleError::pixel_count_exceeds_limit(200_000_000, 100_000_000).category(),
            ErrorCategory::ResourceLimit
        );
        assert_eq!(
            SnapStyleError::file_write_failed(
                "out.jpg",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied)
            )
            .category(),
            ErrorCategory::ResourceLimit
        );
    }

    #[test]
    fn test_clone_preserves_io_kind() {
        let err = SnapStyleError::file_read_failed(
            "in.png",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        match err.clone() {
            SnapStyleError::FileReadFailed { path, source } => {
                assert_eq!(path, "in.png");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected clone: {other:?}"),
        }
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(ErrorCategory::UserError.code(), "SNAPSTYLE_USER_ERROR");
        assert_eq!(ErrorCategory::InternalBug.as_str(), "InternalBug");
    }
}
