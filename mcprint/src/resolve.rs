//! Turns command-line arguments and piped stdin into an ordered list of items.
//!
//! Images always come first, then stdin text, then text from arguments.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A resolved piece of content to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintItem {
    /// Text bytes, printed verbatim
    Text(Vec<u8>),
    /// Image file, decoded when the job is built
    Image(PathBuf),
}

/// Whether `path` has an image extension (case-insensitive)
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Classify positional arguments.
///
/// Existing image files become image items, other existing files are read
/// as text, and anything else is literal text. Images are sorted before text.
pub fn resolve_args(args: &[String]) -> Result<Vec<PrintItem>> {
    if args.is_empty() {
        bail!("no input provided; pass text, a file path, or pipe via stdin");
    }

    let mut images = Vec::new();
    let mut texts = Vec::new();

    for arg in args {
        let path = Path::new(arg);
        if path.is_file() {
            if is_image_file(path) {
                images.push(PrintItem::Image(path.to_path_buf()));
            } else {
                let content =
                    std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
                texts.push(PrintItem::Text(content));
            }
        } else {
            texts.push(PrintItem::Text(arg.clone().into_bytes()));
        }
    }

    images.extend(texts);
    Ok(images)
}

/// Combine stdin text with resolved arguments.
///
/// Order is argument images, stdin, argument text.
pub fn collect_items(args: &[String], stdin: Option<Vec<u8>>) -> Result<Vec<PrintItem>> {
    let resolved = if args.is_empty() {
        Vec::new()
    } else {
        resolve_args(args)?
    };

    let (mut items, texts): (Vec<_>, Vec<_>) = resolved
        .into_iter()
        .partition(|item| matches!(item, PrintItem::Image(_)));

    items.extend(stdin.filter(|data| !data.is_empty()).map(PrintItem::Text));
    items.extend(texts);

    if items.is_empty() {
        bail!("no input provided; pass text, a file path, or pipe via stdin");
    }
    Ok(items)
}

/// Read piped stdin. Returns `None` when stdin is a terminal.
pub fn read_stdin() -> Result<Option<Vec<u8>>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut data = Vec::new();
    stdin.read_to_end(&mut data).context("reading stdin")?;
    Ok(Some(data))
}
