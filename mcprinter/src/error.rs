//! Error types for the printer library

use thiserror::Error;

/// Printer error types
///
/// Every variant is terminal for the print job that raised it. Nothing in
/// this crate retries; callers decide what to do with the job.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Source image has a zero dimension
    #[error("Invalid image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// Raster does not fit the 16-bit length fields of `GS v 0`
    #[error("Image too large: {bytes_per_row} bytes per row x {rows} rows (limit {limit})")]
    ImageTooLarge {
        bytes_per_row: usize,
        rows: usize,
        limit: usize,
    },

    /// Image could not be decoded
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Connection could not be established in time
    #[error("Cannot reach printer at {addr}: {reason}")]
    PrinterUnreachable { addr: String, reason: String },

    /// Payload write failed or missed its deadline
    #[error("Failed writing to printer at {addr}: {reason}")]
    PrinterWriteFailed { addr: String, reason: String },

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Whether the failure happened on the wire rather than while encoding.
    ///
    /// Re-sending the same job may succeed for these; encoding errors will
    /// fail the same way every time.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::PrinterUnreachable { .. } | Self::PrinterWriteFailed { .. }
        )
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
