use std::path::{Path, PathBuf};

use mcprinter::{DEFAULT_DOT_WIDTH, DEFAULT_PORT, PrintError, PrintResult, PrinterTarget};

use crate::cli::Args;

/// Printer configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PRINTER_HOST | (none) | Printer address, required unless `--host` is given |
/// | PRINTER_PORT | 9100 | Raw printing port |
/// | PRINTER_WIDTH | 384 | Printable width in dots |
///
/// Values are read from the process environment first, then `./.env`,
/// then `~/.env`. Command-line flags override all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<String>,
    pub width: u32,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("PRINTER_HOST").filter(|h| !h.trim().is_empty()),
            port: lookup("PRINTER_PORT").filter(|p| !p.trim().is_empty()),
            width: lookup("PRINTER_WIDTH")
                .and_then(|w| w.trim().parse().ok())
                .filter(|&w| w > 0)
                .unwrap_or(DEFAULT_DOT_WIDTH),
        }
    }

    /// Apply command-line overrides and produce the job's target
    pub fn resolve(self, args: &Args) -> PrintResult<PrinterTarget> {
        let host = args.host.clone().or(self.host).ok_or_else(|| {
            PrintError::InvalidConfig(
                "no printer host configured; set PRINTER_HOST in .env or use --host".to_string(),
            )
        })?;

        let port = match (args.port, self.port) {
            (Some(port), _) => port,
            (None, Some(port)) => port.trim().parse().map_err(|_| {
                PrintError::InvalidConfig(format!("PRINTER_PORT is not a valid port: {}", port))
            })?,
            (None, None) => DEFAULT_PORT,
        };

        let width = args.width.unwrap_or(self.width);
        if width == 0 {
            return Err(PrintError::InvalidConfig(
                "--width must be greater than zero".to_string(),
            ));
        }

        Ok(PrinterTarget::new(host).with_port(port).with_width(width))
    }
}

/// `.env` files to load, in precedence order
pub fn dotenv_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env")];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(Path::new(&home).join(".env"));
    }
    paths
}

/// Load `.env` files without overriding variables that are already set.
///
/// Returns the files that were found and read.
pub fn load_dotenv() -> Vec<PathBuf> {
    dotenv_paths()
        .into_iter()
        .filter(|path| dotenvy::from_path(path).is_ok())
        .collect()
}
