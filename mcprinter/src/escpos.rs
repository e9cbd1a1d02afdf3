//! ESC/POS command builder
//!
//! Frames raster images and literal text into one print job:
//!
//! ```text
//! ESC @                                init
//! GS v 0 m xL xH yL yH d1...dk         raster image (repeatable)
//! text... LF                           literal text (repeatable)
//! ESC d 4                              feed
//! GS V 0                               full cut
//! ```

use crate::encoder::Payload;
use crate::error::{PrintError, PrintResult};
use crate::raster::RasterFrame;

/// ESC @ - initialize printer
pub const INIT: [u8; 2] = [0x1B, 0x40];

/// ESC d n - print and feed n lines
pub const FEED: [u8; 3] = [0x1B, 0x64, FEED_LINES];

/// GS V 0 - full cut
pub const FULL_CUT: [u8; 3] = [0x1D, 0x56, 0x00];

/// GS v 0 m, with m = 0 (normal density)
pub const RASTER: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

/// Lines advanced by [`FEED`]
pub const FEED_LINES: u8 = 4;

/// Largest value of the `x` and `y` length fields of `GS v 0`
pub const RASTER_FIELD_MAX: usize = u16::MAX as usize;

/// Check raster dimensions against the 16-bit length fields.
pub fn check_raster_size(bytes_per_row: usize, rows: usize) -> PrintResult<(u16, u16)> {
    match (u16::try_from(bytes_per_row), u16::try_from(rows)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(PrintError::ImageTooLarge {
            bytes_per_row,
            rows,
            limit: RASTER_FIELD_MAX,
        }),
    }
}

/// Build a complete `GS v 0` command for `frame`.
///
/// Nothing is produced if either dimension overflows its length field.
pub fn raster_command(frame: &RasterFrame) -> PrintResult<Vec<u8>> {
    let (x, y) = check_raster_size(frame.bytes_per_row(), frame.height())?;

    let mut cmd = Vec::with_capacity(RASTER.len() + 4 + frame.data().len());
    // GS v 0 m xL xH yL yH
    cmd.extend_from_slice(&RASTER);
    cmd.extend_from_slice(&x.to_le_bytes());
    cmd.extend_from_slice(&y.to_le_bytes());
    cmd.extend_from_slice(frame.data());
    Ok(cmd)
}

/// ESC/POS command builder
///
/// Starts with `ESC @`. Items are appended in call order; [`finish`](Self::finish)
/// closes the job with feed and full cut.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

#[allow(clippy::len_without_is_empty)]
impl EscPosBuilder {
    /// Create a new builder, already holding the init command
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&INIT);
        Self { buf }
    }

    // === Content ===

    /// Write raw text bytes followed by a newline
    pub fn line(&mut self, text: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(text);
        self.buf.push(b'\n');
        self
    }

    /// Write a raster image
    ///
    /// On error the builder is left unchanged.
    pub fn raster(&mut self, frame: &RasterFrame) -> PrintResult<&mut Self> {
        let cmd = raster_command(frame)?;
        self.buf.extend_from_slice(&cmd);
        Ok(self)
    }

    // === Paper Control ===

    /// Feed [`FEED_LINES`] lines
    pub fn feed(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&FEED);
        self
    }

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&FULL_CUT);
        self
    }

    // === Build ===

    /// Bytes written so far, including the leading [`INIT`]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Feed, cut, and freeze the job
    pub fn finish(mut self) -> Payload {
        self.feed().cut();
        Payload::from(self.buf)
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BLACK, GrayscaleBuffer, WHITE};

    fn frame(width: usize, height: usize, v: f32) -> RasterFrame {
        RasterFrame::pack(&GrayscaleBuffer::filled(width, height, v))
    }

    #[test]
    fn test_raster_header_little_endian() {
        // 2100 dots -> 263 bytes per row = 0x0107; 300 rows = 0x012C
        let f = frame(2100, 300, WHITE);
        let cmd = raster_command(&f).unwrap();

        assert_eq!(&cmd[..4], &RASTER);
        assert_eq!(&cmd[4..8], &[0x07, 0x01, 0x2C, 0x01]);
        assert_eq!(u16::from_le_bytes([cmd[4], cmd[5]]) as usize, f.bytes_per_row());
        assert_eq!(u16::from_le_bytes([cmd[6], cmd[7]]) as usize, f.height());
        assert_eq!(cmd.len(), 8 + 263 * 300);
    }

    #[test]
    fn test_raster_data_follows_header() {
        let cmd = raster_command(&frame(8, 2, BLACK)).unwrap();
        assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_raster_too_many_rows() {
        let f = frame(8, 65536, WHITE);
        let err = raster_command(&f).unwrap_err();
        assert!(matches!(
            err,
            PrintError::ImageTooLarge {
                bytes_per_row: 1,
                rows: 65536,
                ..
            }
        ));
    }

    #[test]
    fn test_check_raster_size_limits() {
        assert_eq!(check_raster_size(65535, 65535).unwrap(), (65535, 65535));
        assert!(check_raster_size(65536, 1).is_err());
        assert!(check_raster_size(1, 65536).is_err());
    }

    #[test]
    fn test_new_builder_starts_with_init() {
        let b = EscPosBuilder::new();
        assert_eq!(b.len(), INIT.len());
        assert_eq!(EscPosBuilder::default().len(), INIT.len());
    }

    #[test]
    fn test_failed_raster_leaves_builder_unchanged() {
        let mut b = EscPosBuilder::new();
        let before = b.len();
        assert!(b.raster(&frame(8, 70000, WHITE)).is_err());
        assert_eq!(b.len(), before);
    }

    #[test]
    fn test_builder_envelope() {
        let mut b = EscPosBuilder::new();
        b.line(b"Hello");
        let payload = b.finish();

        let mut expected = INIT.to_vec();
        expected.extend_from_slice(b"Hello\n");
        expected.extend_from_slice(&FEED);
        expected.extend_from_slice(&FULL_CUT);
        assert_eq!(payload.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_line_keeps_embedded_newlines() {
        let mut b = EscPosBuilder::new();
        b.line(b"Line1\nLine2");
        let payload = b.finish();
        assert_eq!(&payload.as_bytes()[2..14], b"Line1\nLine2\n");
    }

    #[test]
    fn test_command_bytes() {
        assert_eq!(INIT, [0x1B, 0x40]);
        assert_eq!(FEED, [0x1B, 0x64, 0x04]);
        assert_eq!(FULL_CUT, [0x1D, 0x56, 0x00]);
    }
}
