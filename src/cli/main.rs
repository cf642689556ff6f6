use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use photo_watermark::color::ColorSpec;
use photo_watermark::config::{Position, WatermarkConfig};
use photo_watermark::pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "photo-watermark",
    version,
    about = "Stamp EXIF capture dates onto photos as text watermarks"
)]
struct Cli {
    /// Image file or directory containing images
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Font size for the watermark
    #[arg(
        short = 's',
        long,
        default_value_t = 36,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    font_size: u32,

    /// Text color: a color name, #RRGGBB, or rgba(r,g,b,a)
    #[arg(short, long, default_value = "white")]
    color: ColorSpec,

    /// Watermark anchor: top-left, top-center, top-right, center-left,
    /// center, center-right, bottom-left, bottom-center, bottom-right
    #[arg(short, long, default_value = "bottom-right")]
    position: Position,

    /// Font file to use instead of system font discovery
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = WatermarkConfig {
        font_size: cli.font_size,
        color: cli.color.resolve(),
        position: cli.position,
        font_path: cli.font,
    };

    let summary = pipeline::process(&cli.path, &config)?;

    println!(
        "Completed: {} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );

    Ok(())
}
