// src/engine/pool.rs
//
// Global thread pool for batch styling.
//
// One pool is shared by every batch call instead of building a pool per
// request. Thread count comes from available_parallelism() (which respects
// cgroup quotas) unless SNAPSTYLE_THREADS overrides it.
//
// The pool is initialized lazily on first use; later changes to
// SNAPSTYLE_THREADS have no effect.

use crate::engine::config::PipelineConfig;
use crate::engine::pipeline::{apply_style_with_config, resolve_style};
use crate::error::SnapStyleError;
use crate::ops::Style;
use image::RgbaImage;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::{info, warn};

const ENV_THREADS: &str = "SNAPSTYLE_THREADS";

/// Upper bound for SNAPSTYLE_THREADS
pub const MAX_THREADS: usize = 256;

const MIN_THREADS: usize = 1;

static GLOBAL_THREAD_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

fn configured_threads() -> usize {
    std::env::var(ENV_THREADS)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|n| *n >= MIN_THREADS)
        .map(|n| n.min(MAX_THREADS))
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(MIN_THREADS)
        })
}

/// The shared pool, or None if the OS refused to spawn its threads
/// (callers then run on rayon's global pool).
pub fn get_pool() -> Option<&'static ThreadPool> {
    GLOBAL_THREAD_POOL
        .get_or_init(|| {
            let num_threads = configured_threads();
            match rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("snapstyle-{i}"))
                .build()
            {
                Ok(pool) => {
                    info!(target: "snapstyle::pool", num_threads, "thread pool ready");
                    Some(pool)
                }
                Err(err) => {
                    warn!(target: "snapstyle::pool", %err, "falling back to rayon global pool");
                    None
                }
            }
        })
        .as_ref()
}

fn run_in_pool<T, F>(job: F) -> T
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    match get_pool() {
        Some(pool) => pool.install(job),
        None => job(),
    }
}

/// Apply one style to every bitmap, in parallel. Output order matches input.
pub fn apply_style_batch(
    images: &[RgbaImage],
    style: Style,
    config: &PipelineConfig,
) -> Vec<RgbaImage> {
    let out: Vec<RgbaImage> = run_in_pool(|| {
        images
            .par_iter()
            .map(|img| apply_style_with_config(Cow::Borrowed(img), style, config).into_owned())
            .collect()
    });
    info!(target: "snapstyle::pool", style = style.name(), count = out.len(), "batch styled");
    out
}

/// Apply a per-image style, in parallel. Output order matches input.
pub fn apply_styles_batch(
    jobs: &[(RgbaImage, Style)],
    config: &PipelineConfig,
) -> Vec<RgbaImage> {
    run_in_pool(|| {
        jobs.par_iter()
            .map(|(img, style)| {
                apply_style_with_config(Cow::Borrowed(img), *style, config).into_owned()
            })
            .collect()
    })
}

/// Batch by style name; the name is resolved once under `config.unknown_style`.
pub fn apply_named_style_batch(
    images: &[RgbaImage],
    name: &str,
    config: &PipelineConfig,
) -> Result<Vec<RgbaImage>, SnapStyleError> {
    let style = resolve_style(name, config.unknown_style)?;
    Ok(apply_style_batch(images, style, config))
}
