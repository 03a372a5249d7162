use palette::{encoding, Hsv, IntoColor, Srgb};
use serde::Serialize;

use crate::error::StylingError;

/// Score given to any pairing that involves a neutral color
pub const NEUTRAL_SCORE: f64 = 0.9;
/// Score given to analogous or near-complementary hues
pub const HARMONY_SCORE: f64 = 0.8;

/// Saturation below which a color counts as neutral
const NEUTRAL_SATURATION: f64 = 0.1;
/// Max |R-G| and |G-B| (0-255) for a near-gray color
const NEUTRAL_CHANNEL_SPREAD: i16 = 30;

/// Verdict on whether two colors can be worn together
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Compatibility {
    pub compatible: bool,
    pub score: f64,
}

impl Compatibility {
    /// Permissive verdict used when a color cannot be parsed
    pub const FALLBACK: Compatibility = Compatibility {
        compatible: true,
        score: 0.7,
    };
}

/// A parsed color with the HSV components the rules need
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorSample {
    rgb: [u8; 3],
    /// Hue in `[0, 1)`
    hue: f64,
    saturation: f64,
}

impl ColorSample {
    fn parse(hex: &str) -> Result<Self, StylingError> {
        let rgb = parse_hex(hex)?;
        let unit = rgb.map(|channel| f64::from(channel) / 255.0);
        let hsv: Hsv<encoding::Srgb, f64> = Srgb::new(unit[0], unit[1], unit[2]).into_color();

        Ok(Self {
            rgb,
            hue: hue_turns(unit),
            saturation: hsv.saturation,
        })
    }

    fn is_neutral(&self) -> bool {
        let [r, g, b] = self.rgb.map(i16::from);
        self.saturation < NEUTRAL_SATURATION
            || ((r - g).abs() < NEUTRAL_CHANNEL_SPREAD && (g - b).abs() < NEUTRAL_CHANNEL_SPREAD)
    }
}

/// Parses `#RRGGBB` (leading `#` optional) into 8-bit channels
pub fn parse_hex(hex: &str) -> Result<[u8; 3], StylingError> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StylingError::InvalidColorFormat(hex.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| StylingError::InvalidColorFormat(hex.to_string()))
    };

    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Hue as a fraction of a turn, `[0, 1)`
///
/// Taken from the hexcone sector in turns, not degrees: going through degrees
/// rounds boundary hues such as 0.4 the other way.
fn hue_turns([r, g, b]: [f64; 3]) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0.0;
    }

    let span = max - min;
    let rc = (max - r) / span;
    let gc = (max - g) / span;
    let bc = (max - b) / span;
    let sector = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (sector / 6.0).rem_euclid(1.0)
}

/// Distance between two hues on the unit circle, in `[0, 0.5]`
fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > 0.5 {
        1.0 - d
    } else {
        d
    }
}

/// Scores how well two hex colors pair
///
/// Neutrals pair with anything. Chromatic colors are judged by hue distance:
/// analogous (< 0.2) and near-complementary (0.4..0.6) hues score 0.8, anything
/// else scores `1 - distance` and is compatible above 0.6.
pub fn compatible(hex_a: &str, hex_b: &str) -> Result<Compatibility, StylingError> {
    let a = ColorSample::parse(hex_a)?;
    let b = ColorSample::parse(hex_b)?;

    if a.is_neutral() || b.is_neutral() {
        return Ok(Compatibility {
            compatible: true,
            score: NEUTRAL_SCORE,
        });
    }

    let d = hue_distance(a.hue, b.hue);
    if (d > 0.4 && d < 0.6) || d < 0.2 {
        return Ok(Compatibility {
            compatible: true,
            score: HARMONY_SCORE,
        });
    }

    let score = 1.0 - d;
    Ok(Compatibility {
        compatible: score > 0.6,
        score,
    })
}

/// Like [`compatible`] but never fails: malformed input yields
/// [`Compatibility::FALLBACK`]
pub fn compatibility_or_default(hex_a: &str, hex_b: &str) -> Compatibility {
    compatible(hex_a, hex_b).unwrap_or_else(|e| {
        tracing::warn!(error = %e, color_a = %hex_a, color_b = %hex_b, "Falling back to permissive color match");
        Compatibility::FALLBACK
    })
}
