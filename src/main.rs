mod capture;
mod config;
mod error;
mod output;
mod session;

use anyhow::{Context, Result};
use capture::WebcamCapture;
use clap::{ArgAction, Parser};
use config::CaptureOptions;
use output::{FilenameTemplate, ImageFileOutput};
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Capture a series of webcam frames as numbered PNG files.
///
/// Example: capture 10 frames at 1280x960 named 'New Moon 00000.png' onwards:
/// -n 10 -w 1280 -h 960 -m "New Moon "
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Show help
    #[arg(short = '?', long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Filename prefix
    #[arg(short = 'm', long)]
    name: Option<String>,

    /// Number of frames (default is infinite)
    #[arg(short = 'n', long)]
    number: Option<u64>,

    /// Resolution width in pixels
    #[arg(short = 'w', long, requires = "height", value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Resolution height in pixels
    #[arg(short = 'h', long, requires = "width", value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Which camera device?
    #[arg(short = 'd', long, default_value_t = 0)]
    device: u32,

    /// Verbose output (debug)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn into_options(self) -> error::Result<CaptureOptions> {
        CaptureOptions::new(
            self.name,
            self.number,
            self.width,
            self.height,
            self.device,
            self.verbose,
        )
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let options = args.into_options().context("Invalid command line")?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        // A second Ctrl+C gets out of a read stuck on a stalled device
        if session::request_stop(&stop_handler) {
            eprintln!("Interrupted again, exiting");
            std::process::exit(130);
        }
    })
    .context("Failed to install Ctrl+C handler")?;

    // Dropping the capture on any error path still releases the device
    let mut capture = WebcamCapture::open(options.device_index)
        .context("Failed to initialize webcam capture")?;

    let mut output = ImageFileOutput::new(FilenameTemplate::new(options.name_prefix.as_deref()));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let stats = session::run(&mut capture, &mut output, &options, &stop, &mut out)
        .context("Capture failed")?;
    tracing::debug!("Captured {} frames in {:?}", stats.frames, stats.elapsed);

    Ok(())
}
