//! Print job encoding
//!
//! Runs each image through scale -> luma -> quantize -> pack, frames it, and
//! assembles all items of a job into one [`Payload`].

use tracing::{debug, info, instrument};

use crate::dither::Quantizer;
use crate::error::{PrintError, PrintResult};
use crate::escpos::{EscPosBuilder, check_raster_size};
use crate::raster::{GrayscaleBuffer, PixelGrid, RasterFrame, scale_to_width, scaled_height};

/// One piece of content in a print job
#[derive(Debug, Clone)]
pub enum ContentItem {
    /// Decoded image, printed as a raster
    Image(PixelGrid),
    /// Literal bytes, printed as-is followed by a newline
    Text(Vec<u8>),
}

impl ContentItem {
    pub fn text(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Text(bytes.into())
    }

    pub fn image(img: PixelGrid) -> Self {
        Self::Image(img)
    }
}

/// Complete byte stream for one print job.
///
/// Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Image and job encoder for one printer width
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    width: u32,
    quantizer: Quantizer,
}

impl Encoder {
    /// Create an encoder for a printer `width` dots wide
    pub fn new(width: u32) -> PrintResult<Self> {
        if width == 0 {
            return Err(PrintError::InvalidConfig(
                "dot width must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            width,
            quantizer: Quantizer::default(),
        })
    }

    /// Set the quantization strategy
    pub fn with_quantizer(mut self, quantizer: Quantizer) -> Self {
        self.quantizer = quantizer;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn quantizer(&self) -> Quantizer {
        self.quantizer
    }

    /// Convert an image to a printable 1-bit raster at this encoder's width
    #[instrument(skip(self, img), fields(width = self.width))]
    pub fn encode_image(&self, img: &PixelGrid) -> PrintResult<RasterFrame> {
        let (src_w, src_h) = img.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(PrintError::InvalidImage {
                width: src_w,
                height: src_h,
            });
        }

        // Reject before allocating a scaled copy that could never be sent
        let rows = scaled_height(src_w, src_h, self.width);
        check_raster_size((self.width as usize).div_ceil(8), rows as usize)?;

        let scaled = scale_to_width(img, self.width)?;
        let mut gray = GrayscaleBuffer::from_pixels(&scaled);
        self.quantizer.apply(&mut gray);
        let frame = RasterFrame::pack(&gray);

        debug!(
            rows = frame.height(),
            bytes_per_row = frame.bytes_per_row(),
            ink = frame.ink_count(),
            "image encoded"
        );
        Ok(frame)
    }

    /// Assemble items, in the given order, into one job.
    ///
    /// Layout is init, each item, feed, full cut. Any encoding error aborts
    /// the whole job.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub fn assemble(&self, items: &[ContentItem]) -> PrintResult<Payload> {
        let mut builder = EscPosBuilder::new();

        for item in items {
            match item {
                ContentItem::Image(img) => {
                    let frame = self.encode_image(img)?;
                    builder.raster(&frame)?;
                }
                ContentItem::Text(bytes) => {
                    builder.line(bytes);
                }
            }
        }

        let payload = builder.finish();
        info!(bytes = payload.len(), "payload assembled");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escpos::{FEED, FULL_CUT, INIT, RASTER};
    use image::Rgb;

    fn solid(width: u32, height: u32, v: u8) -> PixelGrid {
        PixelGrid::from_pixel(width, height, Rgb([v, v, v]))
    }

    /// Raster data of the first `GS v 0` in `bytes`
    fn raster_data(bytes: &[u8]) -> (u16, u16, &[u8]) {
        let start = bytes
            .windows(RASTER.len())
            .position(|w| w == RASTER)
            .expect("raster command");
        let h = &bytes[start + 4..start + 8];
        let x = u16::from_le_bytes([h[0], h[1]]);
        let y = u16::from_le_bytes([h[2], h[3]]);
        let data_start = start + 8;
        (x, y, &bytes[data_start..data_start + x as usize * y as usize])
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(Encoder::new(0), Err(PrintError::InvalidConfig(_))));
    }

    #[test]
    fn test_white_pixels_are_zero_bits() {
        let enc = Encoder::new(8).unwrap();
        let payload = enc.assemble(&[ContentItem::image(solid(8, 1, 255))]).unwrap();

        let (x, y, data) = raster_data(payload.as_bytes());
        assert_eq!((x, y), (1, 1));
        assert_eq!(data, &[0x00]);
    }

    #[test]
    fn test_black_image_sets_every_dot() {
        let enc = Encoder::new(12).unwrap();
        let frame = enc.encode_image(&solid(12, 3, 0)).unwrap();

        for y in 0..frame.height() {
            for x in 0..frame.width() {
                assert!(frame.is_ink(x, y));
            }
        }
        // pad bits stay clear
        for row in frame.data().chunks(2) {
            assert_eq!(row, &[0xFF, 0xF0]);
        }
    }

    #[test]
    fn test_mid_gray_dithers_to_mixed_dots() {
        let enc = Encoder::new(384).unwrap();
        let frame = enc.encode_image(&solid(48, 1, 128)).unwrap();

        let total = frame.width() * frame.height();
        let ratio = frame.ink_count() as f64 / total as f64;
        assert!(ratio > 0.1 && ratio < 0.9, "ink fraction {ratio}");
    }

    #[test]
    fn test_threshold_quantizer_keeps_mid_gray_white() {
        let enc = Encoder::new(64).unwrap().with_quantizer(Quantizer::Threshold);
        let frame = enc.encode_image(&solid(64, 4, 200)).unwrap();
        assert_eq!(frame.ink_count(), 0);
    }

    #[test]
    fn test_downscale_dimensions() {
        let enc = Encoder::new(576).unwrap();
        let payload = enc
            .assemble(&[ContentItem::image(solid(768, 100, 90))])
            .unwrap();

        let (x, y, data) = raster_data(payload.as_bytes());
        assert_eq!(x, 72);
        assert_eq!(y, 75);
        assert_eq!(data.len(), 72 * 75);
    }

    #[test]
    fn test_assemble_preserves_item_order() {
        let enc = Encoder::new(8).unwrap();
        let items = [
            ContentItem::text("before"),
            ContentItem::image(solid(8, 1, 0)),
            ContentItem::text("after"),
        ];
        let payload = enc.assemble(&items).unwrap();

        let mut expected = INIT.to_vec();
        expected.extend_from_slice(b"before\n");
        expected.extend_from_slice(&RASTER);
        expected.extend_from_slice(&[1, 0, 1, 0, 0xFF]);
        expected.extend_from_slice(b"after\n");
        expected.extend_from_slice(&FEED);
        expected.extend_from_slice(&FULL_CUT);
        assert_eq!(payload.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_single_envelope() {
        let enc = Encoder::new(8).unwrap();
        let items = [ContentItem::text("a"), ContentItem::text("b")];
        let payload = enc.assemble(&items).unwrap();

        let bytes = payload.as_bytes();
        let inits = bytes.windows(2).filter(|w| *w == INIT).count();
        let cuts = bytes.windows(3).filter(|w| *w == FULL_CUT).count();
        assert_eq!((inits, cuts), (1, 1));
    }

    #[test]
    fn test_empty_job_is_envelope_only() {
        let payload = Encoder::new(384).unwrap().assemble(&[]).unwrap();
        assert_eq!(payload.as_bytes(), &[0x1B, 0x40, 0x1B, 0x64, 0x04, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_invalid_image_aborts_job() {
        let enc = Encoder::new(384).unwrap();
        let items = [ContentItem::text("x"), ContentItem::image(PixelGrid::new(0, 0))];
        assert!(matches!(
            enc.assemble(&items),
            Err(PrintError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_tall_image_rejected_before_scaling() {
        // 1 x 70000 at width 1 -> 70000 rows
        let enc = Encoder::new(1).unwrap();
        let err = enc.encode_image(&solid(1, 70000, 0)).unwrap_err();
        assert!(matches!(err, PrintError::ImageTooLarge { rows: 70000, .. }));
    }

    #[test]
    fn test_deterministic_payload() {
        let mut img = PixelGrid::new(100, 40);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let v = ((x * 7 + y * 13) % 256) as u8;
            *p = Rgb([v, v.wrapping_mul(3), 255 - v]);
        }
        let enc = Encoder::new(384).unwrap();
        let items = [ContentItem::image(img), ContentItem::text("done")];

        let a = enc.assemble(&items).unwrap();
        let b = enc.assemble(&items).unwrap();
        assert_eq!(a, b);
    }
}
