use anyhow::{Result, bail};
use image::Rgba;
use std::str::FromStr;

/// CSS-style named colors accepted by `--color`.
///
/// The table covers the 16 basic CSS names plus the handful of extended
/// names people actually type on a command line.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("lime", [0, 255, 0]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
];

/// A color as written on the command line.
///
/// Three syntaxes are accepted:
///
/// - a named color: `white`, `red`, ...
/// - hex: `#RRGGBB` (or the short `#RGB` form)
/// - an explicit tuple with alpha: `rgba(255,255,255,128)`
///
/// Parsing happens once at startup; [`ColorSpec::resolve`] yields the
/// canonical RGBA value used for every file, so nothing is re-parsed
/// per image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    /// A recognized color name (kept as written, already validated).
    Named(String),
    /// `#RRGGBB` — fully opaque.
    Hex(u8, u8, u8),
    /// `rgba(r,g,b,a)` with all components in 0–255.
    RgbaTuple(u8, u8, u8, u8),
}

impl ColorSpec {
    /// Resolve to the canonical RGBA pixel value.
    ///
    /// Infallible: unknown names are rejected at parse time.
    pub fn resolve(&self) -> Rgba<u8> {
        match self {
            Self::Named(name) => {
                let [r, g, b] = NAMED_COLORS
                    .iter()
                    .find(|(n, _)| *n == name.as_str())
                    .map(|(_, rgb)| *rgb)
                    .unwrap_or([255, 255, 255]);
                Rgba([r, g, b, 255])
            }
            Self::Hex(r, g, b) => Rgba([*r, *g, *b, 255]),
            Self::RgbaTuple(r, g, b, a) => Rgba([*r, *g, *b, *a]),
        }
    }
}

impl FromStr for ColorSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        if let Some(body) = s
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgba_tuple(body);
        }

        let lower = s.to_lowercase();
        if NAMED_COLORS.iter().any(|(n, _)| *n == lower) {
            return Ok(Self::Named(lower));
        }

        bail!(
            "unrecognized color '{s}' (expected a color name, #RRGGBB, or rgba(r,g,b,a))"
        )
    }
}

fn parse_hex(hex: &str) -> Result<ColorSpec> {
    let expand = |c: u8| (c << 4) | c;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16)?;
            let g = u8::from_str_radix(&hex[2..4], 16)?;
            let b = u8::from_str_radix(&hex[4..6], 16)?;
            Ok(ColorSpec::Hex(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16)?;
            let g = u8::from_str_radix(&hex[1..2], 16)?;
            let b = u8::from_str_radix(&hex[2..3], 16)?;
            Ok(ColorSpec::Hex(expand(r), expand(g), expand(b)))
        }
        n => bail!("hex color must have 3 or 6 digits, got {n}"),
    }
}

fn parse_rgba_tuple(body: &str) -> Result<ColorSpec> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        bail!("rgba() takes 4 components, got {}", parts.len());
    }
    let mut vals = [0u8; 4];
    for (slot, part) in vals.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| anyhow::anyhow!("rgba component '{part}' is not in 0-255"))?;
    }
    Ok(ColorSpec::RgbaTuple(vals[0], vals[1], vals[2], vals[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_parse() {
        assert_eq!(
            "white".parse::<ColorSpec>().unwrap().resolve(),
            Rgba([255, 255, 255, 255])
        );
        assert_eq!(
            "RED".parse::<ColorSpec>().unwrap().resolve(),
            Rgba([255, 0, 0, 255])
        );
        // Aliases keep their spelling but resolve to the same pixel.
        assert_eq!(
            "grey".parse::<ColorSpec>().unwrap().resolve(),
            "gray".parse::<ColorSpec>().unwrap().resolve()
        );
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(
            "#ff8000".parse::<ColorSpec>().unwrap(),
            ColorSpec::Hex(0xff, 0x80, 0x00)
        );
        assert_eq!(
            "#fff".parse::<ColorSpec>().unwrap(),
            ColorSpec::Hex(255, 255, 255)
        );
        assert_eq!(
            "#FFFFFF".parse::<ColorSpec>().unwrap().resolve(),
            Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn rgba_tuples_parse() {
        assert_eq!(
            "rgba(255,255,255,128)".parse::<ColorSpec>().unwrap(),
            ColorSpec::RgbaTuple(255, 255, 255, 128)
        );
        assert_eq!(
            "rgba( 10, 20 , 30, 40 )".parse::<ColorSpec>().unwrap(),
            ColorSpec::RgbaTuple(10, 20, 30, 40)
        );
    }

    #[test]
    fn alpha_survives_resolution() {
        let c = "rgba(255,255,255,128)".parse::<ColorSpec>().unwrap();
        assert_eq!(c.resolve(), Rgba([255, 255, 255, 128]));
    }

    #[test]
    fn malformed_colors_rejected() {
        assert!("notacolor".parse::<ColorSpec>().is_err());
        assert!("#ggg".parse::<ColorSpec>().is_err());
        assert!("#ffff".parse::<ColorSpec>().is_err());
        assert!("rgba(1,2,3)".parse::<ColorSpec>().is_err());
        assert!("rgba(1,2,3,400)".parse::<ColorSpec>().is_err());
        assert!("rgba(1,2,3,4".parse::<ColorSpec>().is_err());
    }
}
