mod calibrate;
mod cli;
mod config;
mod job;
mod logger;
mod resolve;

use anyhow::Result;
use clap::Parser;
use mcprinter::ContentItem;

use crate::cli::{Args, Command};
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env first so RUST_LOG and PRINTER_* from it are visible below
    let env_files = config::load_dotenv();
    let args = Args::parse();
    logger::init_logger(args.log_level.as_deref());

    for path in &env_files {
        tracing::debug!(path = %path.display(), "loaded env file");
    }

    match args.command {
        Some(Command::Calibrate) => run_calibrate(&args).await,
        None => run_print(&args).await,
    }
}

async fn run_print(args: &Args) -> Result<()> {
    let stdin = resolve::read_stdin()?;
    let items = resolve::collect_items(&args.items, stdin)?;
    let target = Config::from_env().resolve(args)?;

    let content = job::to_content(&items)?;
    if let Err(e) = job::run(&target, args.dither.into(), &content).await {
        tracing::error!(error = %e, retryable = e.is_transport(), "print failed");
        return Err(e.into());
    }
    Ok(())
}

async fn run_calibrate(args: &Args) -> Result<()> {
    let target = Config::from_env().resolve(args)?;
    let page = calibrate::calibration_image();

    println!("Printing calibration page...");
    println!("The last fully visible dashed line indicates your printer width.");
    println!("Set PRINTER_WIDTH in your .env to that value.");

    job::run(&target, args.dither.into(), &[ContentItem::image(page)]).await?;
    Ok(())
}
