//! # mcprinter
//!
//! ESC/POS raster printing over raw TCP.
//!
//! ## Scope
//!
//! This crate handles the print path from decoded pixels to the wire:
//! - Scaling images to the printer's dot width
//! - Grayscale conversion and Floyd-Steinberg dithering
//! - Packing 1-bit rasters into `GS v 0` commands
//! - Framing text and images into one init/feed/cut job
//! - Network printing (TCP port 9100)
//!
//! Argument handling, `.env` configuration and image file decoding stay in
//! the `mcprint` binary.
//!
//! ## Example
//!
//! ```ignore
//! use mcprinter::{ContentItem, Printer, PrinterTarget};
//!
//! let target = PrinterTarget::new("192.168.1.100").with_width(576);
//! let logo = image::open("logo.png")?.to_rgb8();
//!
//! let payload = target.encoder()?.assemble(&[
//!     ContentItem::image(logo),
//!     ContentItem::text("Thank you!"),
//! ])?;
//!
//! target.printer()?.print(payload.as_bytes()).await?;
//! ```

pub mod dither;
mod encoder;
mod error;
pub mod escpos;
mod printer;
pub mod raster;

// Re-exports
pub use dither::Quantizer;
pub use encoder::{ContentItem, Encoder, Payload};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{
    CONNECT_TIMEOUT, DEFAULT_DOT_WIDTH, DEFAULT_PORT, NetworkPrinter, Printer, PrinterTarget,
    WRITE_TIMEOUT,
};
pub use raster::{GrayscaleBuffer, PixelGrid, RasterFrame};
