use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result, bail};
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use crate::config::{MARGIN, WatermarkConfig};

/// Scalable system fonts tried in order when no `--font` override is given.
///
/// Covers the usual Linux font packages (Debian/Ubuntu, Fedora, Arch),
/// macOS, and Windows. Every candidate is a scalable font, so the requested
/// size is always honored exactly — there is no bitmap fallback tier.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the watermark font.
///
/// An explicit `override_path` must load or the whole batch is aborted.
/// Otherwise the candidates in [`FONT_CANDIDATES`] are tried in order, with
/// a warning when the preferred (first installed) choice is passed over
/// because it failed to parse. No usable font at all is fatal: nothing can
/// be rendered without one.
pub fn load_font(override_path: Option<&Path>) -> Result<FontVec> {
    if let Some(path) = override_path {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font file {}", path.display()))?;
        return FontVec::try_from_vec(bytes)
            .with_context(|| format!("{} is not a usable font", path.display()));
    }

    let mut preferred_missing = false;
    for candidate in FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                if preferred_missing {
                    log::warn!("Preferred font unavailable, using {candidate}");
                } else {
                    log::debug!("Using font {candidate}");
                }
                return Ok(font);
            }
            Err(e) => {
                log::debug!("Font candidate {candidate} failed to parse: {e}");
                preferred_missing = true;
            }
        }
    }

    bail!(
        "No usable font found on this system; pass one explicitly with --font"
    )
}

/// Measure the pixel dimensions of `text` at `font_size`.
pub fn measure_text(font: &FontVec, font_size: u32, text: &str) -> (u32, u32) {
    text_size(PxScale::from(font_size as f32), font, text)
}

/// Draw the date text onto a copy of `image` and return the result.
///
/// The source image is never mutated. Text (preceded by a small drop shadow
/// for legibility on light backgrounds) is drawn on a transparent overlay
/// layer, which is then alpha-composited over the base so partially
/// transparent colors blend with the underlying pixels instead of replacing
/// them. Callers flatten to RGB before saving to formats without alpha.
pub fn render(
    image: &DynamicImage,
    date_text: &str,
    config: &WatermarkConfig,
    font: &FontVec,
) -> RgbaImage {
    let mut base = image.to_rgba8();
    let scale = PxScale::from(config.font_size as f32);

    let text_dims = measure_text(font, config.font_size, date_text);
    let (x, y) = config
        .position
        .anchor(base.dimensions(), text_dims, MARGIN);

    let mut overlay = RgbaImage::new(base.width(), base.height());

    let shadow_offset = (config.font_size / 24).max(1) as i32;
    let alpha = config.color.0[3];
    draw_text_mut(
        &mut overlay,
        Rgba([0, 0, 0, alpha]),
        x + shadow_offset,
        y + shadow_offset,
        scale,
        font,
        date_text,
    );
    draw_text_mut(&mut overlay, config.color, x, y, scale, font, date_text);

    imageops::overlay(&mut base, &overlay, 0, 0);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Position;

    /// Tests that rasterize glyphs need a real font; hosts without one get
    /// an automatic pass for those cases.
    fn test_font() -> Option<FontVec> {
        load_font(None).ok()
    }

    fn config(color: Rgba<u8>, position: Position) -> WatermarkConfig {
        WatermarkConfig {
            font_size: 36,
            color,
            position,
            font_path: None,
        }
    }

    #[test]
    fn font_override_must_exist() {
        assert!(load_font(Some(Path::new("/nonexistent/font.ttf"))).is_err());
    }

    #[test]
    fn measured_text_is_nonempty() {
        let Some(font) = test_font() else { return };
        let (w, h) = measure_text(&font, 36, "2023-05-14");
        assert!(w > 0 && h > 0);
        let (w2, _) = measure_text(&font, 72, "2023-05-14");
        assert!(w2 > w, "larger font size should measure wider");
    }

    #[test]
    fn renders_visible_text_on_dark_background() {
        let Some(font) = test_font() else { return };
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255])));
        let cfg = config(Rgba([255, 255, 255, 255]), Position::Center);

        let out = render(&img, "2023-05-14", &cfg, &font);

        let changed = out.pixels().filter(|p| p.0[0] > 0).count();
        assert!(changed > 0, "expected some white text pixels");
    }

    #[test]
    fn rendering_is_deterministic() {
        let Some(font) = test_font() else { return };
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 150, Rgba([30, 60, 90, 255])));
        let cfg = config(Rgba([255, 255, 0, 200]), Position::BottomRight);

        let a = render(&img, "2020-01-01", &cfg, &font);
        let b = render(&img, "2020-01-01", &cfg, &font);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn half_alpha_white_blends_instead_of_replacing() {
        let Some(font) = test_font() else { return };
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 300, Rgba([100, 100, 100, 255])));
        let cfg = config(Rgba([255, 255, 255, 128]), Position::Center);

        let out = render(&img, "2023-05-14", &cfg, &font);

        // Blended pixels must be brighter than the background but not
        // fully opaque white.
        let blended = out
            .pixels()
            .filter(|p| p.0[0] > 110 && p.0[0] < 250)
            .count();
        let pure_white = out.pixels().filter(|p| p.0[0] == 255).count();
        assert!(blended > 0, "expected partially blended text pixels");
        assert_eq!(pure_white, 0, "half-alpha white must never saturate");
    }

    #[test]
    fn text_lands_inside_bounds_for_all_anchors() {
        let Some(font) = test_font() else { return };
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1000,
            800,
            Rgba([0, 0, 0, 255]),
        ));

        for position in Position::all() {
            let cfg = config(Rgba([255, 255, 255, 255]), position);
            let out = render(&img, "2023-05-14", &cfg, &font);

            // Every lit pixel stays inside the image and roughly respects
            // the 20px margin (shadow offset adds a couple of pixels).
            for (px, py, p) in out.enumerate_pixels() {
                if p.0[0] > 0 {
                    assert!(
                        px >= 15 && px < 990 && py >= 15 && py < 790,
                        "{position}: pixel ({px},{py}) outside expected band"
                    );
                }
            }
        }
    }
}
