//! Print job execution
//!
//! Decodes image items, encodes the whole job, and sends it in one write.

use std::path::Path;

use mcprinter::{
    ContentItem, Payload, PixelGrid, PrintError, PrintResult, Printer, PrinterTarget, Quantizer,
};
use tracing::{info, instrument};

use crate::resolve::PrintItem;

/// Decode an image file. Alpha is dropped.
pub fn load_image(path: &Path) -> PrintResult<PixelGrid> {
    let img = image::open(path)
        .map_err(|e| PrintError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;
    Ok(img.to_rgb8())
}

/// Load every image and keep text as-is, preserving order
pub fn to_content(items: &[PrintItem]) -> PrintResult<Vec<ContentItem>> {
    items
        .iter()
        .map(|item| match item {
            PrintItem::Text(bytes) => Ok(ContentItem::Text(bytes.clone())),
            PrintItem::Image(path) => load_image(path).map(ContentItem::Image),
        })
        .collect()
}

/// Encode `items` for `target`
pub fn build_payload(
    target: &PrinterTarget,
    quantizer: Quantizer,
    items: &[ContentItem],
) -> PrintResult<Payload> {
    target.encoder()?.with_quantizer(quantizer).assemble(items)
}

/// Build and send one job. Nothing is sent if encoding fails.
#[instrument(skip(target, items), fields(host = %target.host, port = target.port, width = target.width))]
pub async fn run(
    target: &PrinterTarget,
    quantizer: Quantizer,
    items: &[ContentItem],
) -> PrintResult<()> {
    let payload = build_payload(target, quantizer, items)?;
    let printer = target.printer()?;

    info!(bytes = payload.len(), "sending job");
    printer.print(payload.as_bytes()).await
}
