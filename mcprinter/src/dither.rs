//! Quantization of grayscale buffers to black and white.
//!
//! Floyd-Steinberg error diffusion is the default. Plain thresholding is
//! kept as a selectable strategy; it is the same pass with no error carried.
//!
//! Error distribution pattern:
//! ```text
//!          [ x ]  7/16
//!   3/16   5/16   1/16
//! ```
//!
//! Cells are visited strictly row-major, top to bottom and left to right.
//! Every decision depends on error already pushed from above and from the
//! left, so the pass is sequential by construction.

use tracing::debug;

use crate::raster::{BLACK, GrayscaleBuffer, WHITE, WHITE_THRESHOLD};

/// Quantization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantizer {
    /// Floyd-Steinberg error diffusion
    #[default]
    FloydSteinberg,
    /// Fixed threshold at 128, no diffusion
    Threshold,
}

impl Quantizer {
    /// Quantize `buf` in place
    pub fn apply(self, buf: &mut GrayscaleBuffer) {
        match self {
            Self::FloydSteinberg => floyd_steinberg(buf),
            Self::Threshold => threshold(buf),
        }
    }
}

/// Two-level decision for one cell; the threshold belongs to white.
fn quantize(v: f32) -> f32 {
    if v < WHITE_THRESHOLD { BLACK } else { WHITE }
}

/// Apply Floyd-Steinberg dithering in place.
///
/// Error pushed past the buffer edges is dropped.
pub fn floyd_steinberg(buf: &mut GrayscaleBuffer) {
    let (width, height) = (buf.width, buf.height);
    debug!(width, height, "Applying Floyd-Steinberg dithering");

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let old = buf.cells[i];
            let new = quantize(old);
            let error = old - new;

            distribute_error(buf, x, y, error);
            buf.cells[i] = new;
        }
    }
}

/// Push quantization error into the unvisited neighbours of (x, y).
fn distribute_error(buf: &mut GrayscaleBuffer, x: usize, y: usize, error: f32) {
    let (width, height) = (buf.width, buf.height);
    let row = y * width;

    // Right: 7/16
    if x + 1 < width {
        buf.cells[row + x + 1] += error * 7.0 / 16.0;
    }
    if y + 1 < height {
        let below = row + width;
        // Bottom-left: 3/16
        if x > 0 {
            buf.cells[below + x - 1] += error * 3.0 / 16.0;
        }
        // Bottom: 5/16
        buf.cells[below + x] += error * 5.0 / 16.0;
        // Bottom-right: 1/16
        if x + 1 < width {
            buf.cells[below + x + 1] += error / 16.0;
        }
    }
}

/// Threshold every cell at 128 with no error diffusion.
pub fn threshold(buf: &mut GrayscaleBuffer) {
    debug!(width = buf.width, height = buf.height, "Applying threshold conversion");
    for v in buf.cells.iter_mut() {
        *v = quantize(*v);
    }
}
