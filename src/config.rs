use anyhow::{Result, bail};
use image::Rgba;
use std::path::PathBuf;
use std::str::FromStr;

/// Distance in pixels kept between the text box and each relevant image edge.
pub const MARGIN: u32 = 20;

/// Watermark settings, built once from CLI options and shared read-only
/// across every file in the batch.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Font size in pixels. Always positive (enforced at argument parse time).
    pub font_size: u32,
    /// Canonical RGBA text color, resolved from the `--color` string.
    pub color: Rgba<u8>,
    /// Which of the nine anchors the text box is placed against.
    pub position: Position,
    /// Optional font file overriding system font discovery.
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 36,
            color: Rgba([255, 255, 255, 255]),
            position: Position::BottomRight,
            font_path: None,
        }
    }
}

/// The nine named watermark anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// All anchors, in reading order. Used for help text and tests.
    pub fn all() -> [Position; 9] {
        [
            Self::TopLeft,
            Self::TopCenter,
            Self::TopRight,
            Self::CenterLeft,
            Self::Center,
            Self::CenterRight,
            Self::BottomLeft,
            Self::BottomCenter,
            Self::BottomRight,
        ]
    }

    /// The CLI spelling of this anchor.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Compute the top-left pixel coordinate of the text box.
    ///
    /// Pure function of the anchor, the image dimensions, the measured text
    /// dimensions, and the edge margin. Coordinates may go negative when the
    /// text is larger than the image; the drawing routine clips.
    pub fn anchor(
        &self,
        image_dims: (u32, u32),
        text_dims: (u32, u32),
        margin: u32,
    ) -> (i32, i32) {
        let (img_w, img_h) = (image_dims.0 as i64, image_dims.1 as i64);
        let (text_w, text_h) = (text_dims.0 as i64, text_dims.1 as i64);
        let margin = margin as i64;

        let x = match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => margin,
            Self::TopRight | Self::CenterRight | Self::BottomRight => img_w - text_w - margin,
            Self::TopCenter | Self::Center | Self::BottomCenter => (img_w - text_w) / 2,
        };
        let y = match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => margin,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => {
                img_h - text_h - margin
            }
            Self::CenterLeft | Self::Center | Self::CenterRight => (img_h - text_h) / 2,
        };

        (x as i32, y as i32)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        for pos in Self::all() {
            if pos.name() == lower {
                return Ok(pos);
            }
        }
        let names: Vec<&str> = Self::all().iter().map(|p| p.name()).collect();
        bail!(
            "unrecognized position '{s}' (expected one of: {})",
            names.join(", ")
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
