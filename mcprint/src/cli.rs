//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use mcprinter::Quantizer;

#[derive(Parser, Debug)]
#[command(name = "mcprint")]
#[command(
    version,
    about = "Print to a WiFi ESC/POS receipt printer",
    long_about = "Send text and images to a WiFi-connected ESC/POS thermal receipt printer.\n\n\
                  Printer settings come from PRINTER_HOST, PRINTER_PORT and PRINTER_WIDTH, \
                  read from the environment, ./.env or ~/.env."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Printer IP address (overrides PRINTER_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Printer port (overrides PRINTER_PORT)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Printer width in dots (overrides PRINTER_WIDTH)
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// How images are reduced to black and white
    #[arg(long, global = true, default_value = "floyd-steinberg")]
    pub dither: Dither,

    /// Log filter, e.g. "debug" or "mcprinter=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Text, text files, or images (.png, .jpg, .jpeg, .bmp) to print
    pub items: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print a calibration page to determine printer width in dots
    Calibrate,
}

/// Quantization strategy for images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Dither {
    #[default]
    FloydSteinberg,
    Threshold,
}

impl From<Dither> for Quantizer {
    fn from(d: Dither) -> Self {
        match d {
            Dither::FloydSteinberg => Quantizer::FloydSteinberg,
            Dither::Threshold => Quantizer::Threshold,
        }
    }
}
