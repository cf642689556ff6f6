use ab_glyph::FontVec;
use anyhow::{Context, Result, bail};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::WatermarkConfig;
use crate::exif;
use crate::render;

/// Supported image extensions (case-insensitive).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// Output format family for a file, determined by its extension.
///
/// JPEG and BMP outputs are flattened to RGB before encoding; PNG and TIFF
/// keep the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl ImageKind {
    /// Determine the image kind from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Whether the encoder for this format accepts an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Png | Self::Tiff)
    }
}

/// One unit of work: a source image and where its watermarked copy goes.
#[derive(Debug, Clone)]
pub struct ImageTask {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Terminal state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Watermarked copy written to the output directory.
    Saved,
    /// No resolvable capture date; no output file produced.
    Skipped,
    /// Load, decode, or write failure; the batch continues.
    Failed,
}

/// Per-batch tally, folded over task outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Saved => self.processed += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    ImageKind::from_path(path).is_some()
}

/// Enumerate candidate image files under `root`.
///
/// A single file is its own candidate list (empty if unsupported). A
/// directory is enumerated non-recursively, keeping only supported
/// extensions, sorted by path for a deterministic processing order.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        if is_supported_image(root) {
            return vec![root.to_path_buf()];
        }
        log::warn!("{} is not a supported image file", root.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_supported_image(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Derive the output directory for `root`: a sibling of the input directory
/// (or of a single file's parent) named `{dirname}_watermark`.
pub fn output_dir_for(root: &Path) -> Result<PathBuf> {
    let base_dir = if root.is_file() {
        root.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        root.to_path_buf()
    };

    // Relative inputs like "." have no file name; canonicalize to get one.
    let base_dir = match base_dir.file_name() {
        Some(_) => base_dir,
        None => base_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", base_dir.display()))?,
    };

    let dir_name = base_dir
        .file_name()
        .with_context(|| format!("{} has no directory name", base_dir.display()))?
        .to_string_lossy();
    let output_name = format!("{dir_name}_watermark");

    Ok(match base_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(output_name),
        _ => PathBuf::from(output_name),
    })
}

/// Run the whole batch: enumerate, watermark, save, tally.
///
/// Only fatal conditions come back as errors: a nonexistent root, zero
/// supported files, no usable font, or an output directory that cannot be
/// created. Per-file problems are folded into the [`Summary`].
pub fn process(root: &Path, config: &WatermarkConfig) -> Result<Summary> {
    if !root.exists() {
        bail!("Path {} does not exist", root.display());
    }

    let files = collect_files(root);
    if files.is_empty() {
        bail!("No supported image files found in {}", root.display());
    }

    let font = render::load_font(config.font_path.as_deref())?;

    let output_dir = output_dir_for(root)?;
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory {}", output_dir.display())
    })?;

    log::info!("Processing {} image(s)", files.len());
    log::info!("Output directory: {}", output_dir.display());

    let mut summary = Summary::default();
    for source in files {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let task = ImageTask {
            output: output_dir.join(file_name),
            source,
        };
        summary.record(process_file(&task, config, &font));
    }

    Ok(summary)
}

/// Process a single task through load → extract date → render → save.
pub fn process_file(task: &ImageTask, config: &WatermarkConfig, font: &FontVec) -> Outcome {
    log::info!("Processing: {}", task.source.display());

    let image = match image::open(&task.source) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Failed to load {}: {e}", task.source.display());
            return Outcome::Failed;
        }
    };

    let Some(date) = exif::extract_date(&task.source) else {
        log::warn!("No capture date found in {}, skipping", task.source.display());
        return Outcome::Skipped;
    };

    let date_text = date.format("%Y-%m-%d").to_string();
    log::debug!("  Date found: {date_text}");

    let rendered = render::render(&image, &date_text, config, font);

    match save_rendered(rendered, &task.output) {
        Ok(()) => {
            log::info!("  Saved: {}", task.output.display());
            Outcome::Saved
        }
        Err(e) => {
            log::warn!("Failed to save {}: {e}", task.output.display());
            Outcome::Failed
        }
    }
}

/// Encode the rendered image at `path`, flattening alpha for formats that
/// cannot carry it.
fn save_rendered(image: RgbaImage, path: &Path) -> Result<()> {
    let kind = ImageKind::from_path(path)
        .with_context(|| format!("{} has an unsupported extension", path.display()))?;

    if kind.supports_alpha() {
        image.save(path)?;
    } else {
        DynamicImage::ImageRgba8(image).to_rgb8().save(path)?;
    }
    Ok(())
}
