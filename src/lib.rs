//! # photo-watermark
//!
//! Stamp EXIF capture dates onto photos. Reads the capture date out of each
//! image's metadata, draws it as a `YYYY-MM-DD` text overlay at one of nine
//! named anchor positions, and writes the result to a sibling
//! `{dirname}_watermark` directory. Files without a resolvable date are
//! skipped; unreadable files are counted as failed without aborting the
//! batch.
//!
//! ## Quick Start
//!
//! The pipeline module drives the whole enumerate → extract → render → save
//! flow:
//!
//! ```rust,no_run
//! use photo_watermark::config::{Position, WatermarkConfig};
//! use photo_watermark::pipeline;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = WatermarkConfig {
//!         font_size: 36,
//!         color: image::Rgba([255, 255, 255, 255]),
//!         position: Position::BottomRight,
//!         font_path: None,
//!     };
//!
//!     let summary = pipeline::process(Path::new("./photos"), &config)?;
//!     println!(
//!         "{} processed, {} skipped, {} failed",
//!         summary.processed, summary.skipped, summary.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The extractor and renderer are independent and can be called directly:
//!
//! ```rust,no_run
//! use photo_watermark::config::WatermarkConfig;
//! use photo_watermark::{exif, render};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("photo.jpg");
//!
//!     // 1. Extract the capture date (None means "skip this file")
//!     let Some(date) = exif::extract_date(path) else { return Ok(()) };
//!
//!     // 2. Render the date onto a copy of the image
//!     let font = render::load_font(None)?;
//!     let image = image::open(path)?;
//!     let config = WatermarkConfig::default();
//!     let stamped = render::render(&image, &date.format("%Y-%m-%d").to_string(), &config, &font);
//!     stamped.save("stamped.png")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Formats
//!
//! `.jpg` / `.jpeg`, `.png`, `.bmp`, `.tiff` — the original format is
//! preserved on save. JPEG and BMP outputs are flattened to RGB; PNG and
//! TIFF keep the alpha channel.
//!
//! ## Modules
//!
//! - [`color`] — `--color` string parsing (named / hex / rgba)
//! - [`config`] — watermark settings and the nine anchor positions
//! - [`exif`] — capture-date extraction
//! - [`render`] — font discovery, text measurement, and drawing
//! - [`pipeline`] — batch enumeration, per-file outcomes, and the summary

pub mod color;
pub mod config;
pub mod exif;
pub mod pipeline;
pub mod render;
