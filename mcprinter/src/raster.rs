//! Image preparation for raster printing
//!
//! Turns a decoded image into a 1-bit raster in three steps:
//! - scale to the printer's dot width ([`scale_to_width`])
//! - reduce to luminance ([`GrayscaleBuffer::from_pixels`])
//! - pack quantized cells into MSB-first row bytes ([`RasterFrame::pack`])
//!
//! Quantization itself lives in [`crate::dither`].

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::error::{PrintError, PrintResult};

/// Decoded source image. Alpha, if the decoder produced any, is already gone.
pub type PixelGrid = RgbImage;

/// Luminance at or above this value prints white
pub const WHITE_THRESHOLD: f32 = 128.0;

/// Terminal value of an ink cell
pub const BLACK: f32 = 0.0;

/// Terminal value of a no-ink cell
pub const WHITE: f32 = 255.0;

// ============================================================================
// Scaler
// ============================================================================

/// Height of an image of `src_width` x `src_height` scaled to `width` dots.
///
/// Rounds to nearest and never returns less than one row.
pub fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    let h = (f64::from(src_height) * f64::from(width) / f64::from(src_width)).round();
    (h as u32).max(1)
}

/// Resize `src` to exactly `width` dots wide, keeping the aspect ratio.
///
/// Uses bilinear (triangle) filtering. The output height is derived with
/// [`scaled_height`]; there is no cropping.
pub fn scale_to_width(src: &PixelGrid, width: u32) -> PrintResult<PixelGrid> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PrintError::InvalidImage {
            width: src_w,
            height: src_h,
        });
    }
    if width == 0 {
        return Err(PrintError::InvalidConfig(
            "dot width must be greater than zero".to_string(),
        ));
    }

    let height = scaled_height(src_w, src_h, width);
    debug!(src_w, src_h, width, height, "scaling image");

    if (src_w, src_h) == (width, height) {
        return Ok(src.clone());
    }
    Ok(imageops::resize(src, width, height, FilterType::Triangle))
}

// ============================================================================
// Luminance
// ============================================================================

/// BT.601 luma of one RGB sample, on a 0-255 scale
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Row-major grid of real-valued intensities, one cell per dot.
///
/// Mutated in place by the ditherer; after a full pass every cell holds
/// either [`BLACK`] or [`WHITE`].
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleBuffer {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) cells: Vec<f32>,
}

impl GrayscaleBuffer {
    /// Convert every pixel of `img` to its luma
    pub fn from_pixels(img: &PixelGrid) -> Self {
        let (width, height) = img.dimensions();
        let cells = img.pixels().map(|p| luma(p[0], p[1], p[2])).collect();

        Self {
            width: width as usize,
            height: height as usize,
            cells,
        }
    }

    /// A buffer with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build from explicit row-major cells.
    ///
    /// Returns `None` when `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<f32>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.width + x]
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }
}

// ============================================================================
// Bit Packer
// ============================================================================

/// 1-bit raster in `GS v 0` layout.
///
/// Rows are byte-aligned: each one is `ceil(width / 8)` bytes, leftmost dot
/// in the most significant bit, `1` meaning ink. Pad bits past `width` are
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterFrame {
    /// Pack a quantized buffer.
    ///
    /// Cells below [`WHITE_THRESHOLD`] become ink. On a dithered buffer that
    /// is exactly the `0` cells.
    pub fn pack(buf: &GrayscaleBuffer) -> Self {
        let width = buf.width;
        let height = buf.height;
        let bytes_per_row = width.div_ceil(8);
        let mut data = vec![0u8; bytes_per_row * height];

        for (cells, row) in buf
            .cells
            .chunks_exact(width.max(1))
            .zip(data.chunks_exact_mut(bytes_per_row.max(1)))
        {
            for (x, &v) in cells.iter().enumerate() {
                if v < WHITE_THRESHOLD {
                    row[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    /// Width in dots
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes
    pub fn bytes_per_row(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Packed rows, `bytes_per_row() * height()` bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the dot at column `x`, row `y` carries ink
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        let byte = self.data[y * self.bytes_per_row() + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Number of ink dots
    pub fn ink_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}
