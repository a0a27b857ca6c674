// src/engine/io.rs
//
// I/O operations: Source enum, file loading, saving, and download naming.

use crate::engine::common::EngineResult;
use crate::engine::config::PipelineConfig;
use crate::engine::decoder::decode_bytes_with;
use crate::error::SnapStyleError;
use image::RgbaImage;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SECONDS_PER_DAY: u64 = 86_400;

/// Image source - in-memory data, a memory-mapped file, or a path read lazily.
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory image data (e.g. a captured frame)
    Memory(Arc<Vec<u8>>),
    /// Memory-mapped file (zero-copy access)
    Mapped(Arc<Mmap>),
    /// File path for lazy loading (data is read only when needed)
    Path(PathBuf),
}

impl Source {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Source::Memory(Arc::new(data))
    }

    /// Memory-map `path`.
    pub fn open_mapped(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SnapStyleError::file_not_found(display.clone()),
            _ => SnapStyleError::file_read_failed(display.clone(), e),
        })?;

        // Safety: the file is assumed not to be truncated by another process
        // while mapped.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| SnapStyleError::mmap_failed(display, e))?;
        Ok(Source::Mapped(Arc::new(mmap)))
    }

    /// Get the bytes directly - works for Memory and Mapped sources.
    /// Returns None only for Path sources (which need to be loaded first).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Source::Memory(data) => Some(data.as_slice()),
            Source::Mapped(mmap) => Some(mmap.as_ref()),
            Source::Path(_) => None,
        }
    }

    /// Bytes for any source; reads the file for Path sources.
    pub fn load(&self) -> EngineResult<Cow<'_, [u8]>> {
        match self {
            Source::Memory(data) => Ok(Cow::Borrowed(data.as_slice())),
            Source::Mapped(mmap) => Ok(Cow::Borrowed(mmap.as_ref())),
            Source::Path(path) => {
                let display = path.to_string_lossy().to_string();
                let data = std::fs::read(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => SnapStyleError::file_not_found(display.clone()),
                    _ => SnapStyleError::file_read_failed(display.clone(), e),
                })?;
                Ok(Cow::Owned(data))
            }
        }
    }

    /// Length of the source data (0 for Path sources until loaded).
    pub fn len(&self) -> usize {
        self.as_bytes().map_or(0, <[u8]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn decode(&self, config: &PipelineConfig) -> EngineResult<RgbaImage> {
        let bytes = self.load()?;
        decode_bytes_with(&bytes, config)
    }
}

/// Write encoded bytes to `path`.
pub fn save_encoded(path: impl AsRef<Path>, bytes: &[u8]) -> EngineResult<()> {
    let path = path.as_ref();
    std::fs::write(path, bytes)
        .map_err(|e| SnapStyleError::file_write_failed(path.to_string_lossy().to_string(), e))
}

/// `YYYY-MM-DDTHH:MM:SS` for a UTC unix timestamp.
pub fn iso_timestamp(unix_seconds: u64) -> String {
    let days = unix_seconds / SECONDS_PER_DAY;
    let secs_of_day = unix_seconds % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}",
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60
    )
}

/// Download name for a capture taken at `unix_seconds` (UTC):
/// `selfie-2023-11-14T22:13:20.jpg`.
pub fn download_filename(unix_seconds: u64) -> String {
    format!("selfie-{}.jpg", iso_timestamp(unix_seconds))
}

/// `download_filename` with `:` replaced, for filesystems that reject it.
pub fn file_safe_filename(unix_seconds: u64) -> String {
    download_filename(unix_seconds).replace(':', "-")
}

// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: u64) -> (u64, u32, u32) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
