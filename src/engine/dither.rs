// src/engine/dither.rs
//
// Floyd-Steinberg error diffusion to a 1-bit black/white image.

use crate::engine::pipeline::{luma, to_channel};
use image::RgbaImage;

/// Values below this become black, the rest white.
pub const DITHER_THRESHOLD: f32 = 128.0;

/// Dither `src` to pure black and white, keeping alpha.
///
/// Luma goes into a per-call `f32` scratch buffer so fractional error is
/// carried between pixels. The scan is strictly row-major (top to bottom,
/// left to right); error only flows to pixels not yet visited, with the
/// classic 7/16, 3/16, 5/16, 1/16 weights. Neighbours outside the image are
/// skipped, so edge error is dropped rather than wrapped.
pub fn floyd_steinberg(src: &RgbaImage) -> RgbaImage {
    let mut out = src.clone();
    let (width, height) = (src.width() as usize, src.height() as usize);
    if width == 0 || height == 0 {
        return out;
    }

    let mut scratch: Vec<f32> = src.pixels().map(|p| luma(p[0], p[1], p[2])).collect();
    diffuse(&mut scratch, width, height);

    for (px, value) in out.pixels_mut().zip(scratch) {
        let c = to_channel(value);
        px[0] = c;
        px[1] = c;
        px[2] = c;
    }
    out
}

/// Binarize `cells` in place (row-major, `width * height` entries).
fn diffuse(cells: &mut [f32], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let old = cells[i];
            let new = if old < DITHER_THRESHOLD { 0.0 } else { 255.0 };
            let err = old - new;
            cells[i] = new;

            if x + 1 < width {
                cells[i + 1] += err * 7.0 / 16.0;
            }
            if y + 1 < height {
                let below = i + width;
                if x > 0 {
                    cells[below - 1] += err * 3.0 / 16.0;
                }
                cells[below] += err * 5.0 / 16.0;
                if x + 1 < width {
                    cells[below + 1] += err / 16.0;
                }
            }
        }
    }
}
