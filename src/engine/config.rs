// src/engine/config.rs
//
// Pipeline configuration: unknown-style policy, parallelism threshold,
// capture quality and decode limits. Presets plus environment overrides.

use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::SnapStyleError;
use crate::ops::DEFAULT_JPEG_QUALITY;

const ENV_UNKNOWN_STYLE: &str = "SNAPSTYLE_UNKNOWN_STYLE";
const ENV_PARALLEL_THRESHOLD: &str = "SNAPSTYLE_PARALLEL_THRESHOLD";
const ENV_JPEG_QUALITY: &str = "SNAPSTYLE_JPEG_QUALITY";

/// 512x512; below this the rayon split costs more than it saves.
pub const DEFAULT_PARALLEL_THRESHOLD: u64 = 512 * 512;
const STRICT_MAX_PIXELS: u64 = 40_000_000; // ~8K x 5K

/// What to do when a style name is not in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownStylePolicy {
    /// Fall back to `Original` and log a warning.
    Identity,
    /// Return `SnapStyleError::UnknownStyle`.
    Reject,
}

impl UnknownStylePolicy {
    pub fn parse(value: &str) -> Result<Self, SnapStyleError> {
        match value.trim().to_lowercase().as_str() {
            "identity" | "original" | "lenient" => Ok(Self::Identity),
            "reject" | "error" | "strict" => Ok(Self::Reject),
            other => Err(SnapStyleError::invalid_argument(
                ENV_UNKNOWN_STYLE,
                other.to_string(),
                "Expected identity or reject",
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub unknown_style: UnknownStylePolicy,
    /// Minimum pixel count before per-pixel styles split rows across rayon.
    /// `None` disables parallel processing.
    pub parallel_threshold: Option<u64>,
    pub jpeg_quality: u8,
    pub max_dimension: u32,
    pub max_pixels: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            unknown_style: UnknownStylePolicy::Identity,
            parallel_threshold: Some(DEFAULT_PARALLEL_THRESHOLD),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_dimension: MAX_DIMENSION,
            max_pixels: MAX_PIXELS,
        }
    }
}

impl PipelineConfig {
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Rejects unknown style names and caps decodes at 40 megapixels.
    pub fn strict() -> Self {
        Self {
            unknown_style: UnknownStylePolicy::Reject,
            max_pixels: STRICT_MAX_PIXELS,
            ..Self::default()
        }
    }

    /// Single-threaded per call; useful when the caller already fans out.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: None,
            ..Self::default()
        }
    }

    pub fn with_unknown_style(mut self, policy: UnknownStylePolicy) -> Self {
        self.unknown_style = policy;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: Option<u64>) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Result<Self, SnapStyleError> {
        validate_quality(quality)?;
        self.jpeg_quality = quality;
        Ok(self)
    }

    pub fn with_limits(mut self, max_dimension: u32, max_pixels: u64) -> Self {
        self.max_dimension = max_dimension.min(MAX_DIMENSION);
        self.max_pixels = max_pixels.min(MAX_PIXELS);
        self
    }

    /// Whether a bitmap of `pixels` should be processed with rayon.
    pub fn should_parallelize(&self, pixels: u64) -> bool {
        match self.parallel_threshold {
            Some(threshold) => pixels >= threshold,
            None => false,
        }
    }

    /// Defaults overridden by `SNAPSTYLE_*` environment variables.
    /// Malformed values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), false).unwrap_or_default()
    }

    /// Like `from_env`, but malformed values are an error.
    pub fn try_from_env() -> Result<Self, SnapStyleError> {
        Self::from_lookup(|key| std::env::var(key).ok(), true)
    }

    pub(crate) fn from_lookup<F>(lookup: F, strict: bool) -> Result<Self, SnapStyleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_UNKNOWN_STYLE) {
            match UnknownStylePolicy::parse(&raw) {
                Ok(policy) => config.unknown_style = policy,
                Err(err) if strict => return Err(err),
                Err(_) => {}
            }
        }

        if let Some(raw) = lookup(ENV_PARALLEL_THRESHOLD) {
            let trimmed = raw.trim();
            if trimmed.eq_ignore_ascii_case("off") {
                config.parallel_threshold = None;
            } else {
                match trimmed.parse::<u64>() {
                    Ok(threshold) => config.parallel_threshold = Some(threshold),
                    Err(_) if strict => {
                        return Err(SnapStyleError::invalid_argument(
                            ENV_PARALLEL_THRESHOLD,
                            raw,
                            "Expected a pixel count or 'off'",
                        ))
                    }
                    Err(_) => {}
                }
            }
        }

        if let Some(raw) = lookup(ENV_JPEG_QUALITY) {
            let parsed = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|q| validate_quality(*q).is_ok());
            match parsed {
                Some(quality) => config.jpeg_quality = quality,
                None if strict => {
                    return Err(SnapStyleError::invalid_argument(
                        ENV_JPEG_QUALITY,
                        raw,
                        "Expected an integer between 1 and 100",
                    ))
                }
                None => {}
            }
        }

        Ok(config)
    }
}

fn validate_quality(quality: u8) -> Result<(), SnapStyleError> {
    if quality == 0 || quality > 100 {
        return Err(SnapStyleError::invalid_argument(
            "jpeg_quality",
            quality.to_string(),
            "Expected an integer between 1 and 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.unknown_style, UnknownStylePolicy::Identity);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.max_dimension, MAX_DIMENSION);
        assert!(config.should_parallelize(512 * 512));
        assert!(!config.should_parallelize(512 * 512 - 1));
    }

    #[test]
    fn presets() {
        assert_eq!(
            PipelineConfig::strict().unknown_style,
            UnknownStylePolicy::Reject
        );
        assert!(PipelineConfig::strict().max_pixels < MAX_PIXELS);
        assert!(!PipelineConfig::sequential().should_parallelize(u64::MAX));
    }

    #[test]
    fn quality_is_validated() {
        assert!(PipelineConfig::default().with_jpeg_quality(0).is_err());
        assert!(PipelineConfig::default().with_jpeg_quality(101).is_err());
        assert_eq!(
            PipelineConfig::default()
                .with_jpeg_quality(75)
                .unwrap()
                .jpeg_quality,
            75
        );
    }

    #[test]
    fn limits_never_exceed_global_caps() {
        let config = PipelineConfig::default().with_limits(u32::MAX, u64::MAX);
        assert_eq!(config.max_dimension, MAX_DIMENSION);
        assert_eq!(config.max_pixels, MAX_PIXELS);
    }

    #[test]
    fn env_overrides_apply() {
        let lookup = lookup_from(&[
            (ENV_UNKNOWN_STYLE, "reject"),
            (ENV_PARALLEL_THRESHOLD, "1024"),
            (ENV_JPEG_QUALITY, "70"),
        ]);
        let config = PipelineConfig::from_lookup(lookup, true).unwrap();
        assert_eq!(config.unknown_style, UnknownStylePolicy::Reject);
        assert_eq!(config.parallel_threshold, Some(1024));
        assert_eq!(config.jpeg_quality, 70);
    }

    #[test]
    fn env_threshold_off_disables_parallelism() {
        let lookup = lookup_from(&[(ENV_PARALLEL_THRESHOLD, "OFF")]);
        let config = PipelineConfig::from_lookup(lookup, true).unwrap();
        assert_eq!(config.parallel_threshold, None);
    }

    #[test]
    fn malformed_env_is_ignored_or_rejected() {
        let pairs = [(ENV_JPEG_QUALITY, "200"), (ENV_UNKNOWN_STYLE, "maybe")];
        let lenient = PipelineConfig::from_lookup(lookup_from(&pairs), false).unwrap();
        assert_eq!(lenient, PipelineConfig::default());

        let err = PipelineConfig::from_lookup(lookup_from(&pairs), true).unwrap_err();
        assert!(matches!(err, SnapStyleError::InvalidArgument { .. }));
    }
}
