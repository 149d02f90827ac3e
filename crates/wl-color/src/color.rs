// SPDX-License-Identifier: MIT
//
// wl-color color system: 8-bit sRGB with HSL for palette derivation.
//
// Single-character variable names (r, g, b, h, s, l, p, q, t) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference formulas.
#![allow(clippy::many_single_char_names)]
//
// Conversion pipeline:
//
//   "#rrggbb" / "#rgb"  →  Rgb (u8 channels)  →  Hsl (f64, degrees + fractions)
//   Hsl  →  Rgb (rounded)  →  "#rrggbb" (lowercase)
//
// HSL is kept in f64 and never rounded, so an Rgb → Hsl → Rgb round trip
// reproduces the original channels within one unit of rounding.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
///
/// # Examples
///
/// ```
/// use wl_color::Rgb;
///
/// let purple: Rgb = "#9333ea".parse().unwrap();
/// assert_eq!(purple, Rgb::new(0x93, 0x33, 0xea));
/// assert_eq!(purple.to_hex(), "#9333ea");
///
/// // Shorthand expands by duplicating each digit.
/// assert_eq!("f00".parse::<Rgb>().unwrap(), Rgb::new(255, 0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to HSL.
    #[inline]
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Sum of the three channels (0–765). A cheap, monotonic stand-in for
    /// brightness when comparing shades of the same hue.
    #[inline]
    #[must_use]
    pub fn brightness(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }

    /// Whether all three channels are equal.
    #[inline]
    #[must_use]
    pub const fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

// ─── Hsl ─────────────────────────────────────────────────────────────────────

/// A color in HSL space.
///
/// - `h`: hue angle in degrees, `[0, 360)`
/// - `s`: saturation, `[0, 1]`
/// - `l`: lightness, `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    #[inline]
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Return a copy with lightness replaced.
    #[inline]
    #[must_use]
    pub const fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    /// Return a copy with saturation replaced.
    #[inline]
    #[must_use]
    pub const fn with_saturation(self, s: f64) -> Self {
        Self { s, ..self }
    }

    /// Convert to 8-bit sRGB, rounding each channel.
    #[inline]
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

// ─── Hex ─────────────────────────────────────────────────────────────────────

/// Parse `#rgb` / `#rrggbb` (the `#` is optional) into an [`Rgb`].
///
/// # Errors
///
/// Returns [`ColorParseError`] for an empty string, a non-hex character, or
/// a digit count other than 3 or 6.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorParseError> {
    let s = hex.strip_prefix('#').unwrap_or(hex);

    if s.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if let Some((position, digit)) = s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidDigit { digit, position });
    }

    // All ASCII from here on, so byte indexing is safe.
    let bytes = s.as_bytes();
    match bytes.len() {
        // #RGB → #RRGGBB
        3 => {
            let r = parse_hex_digit(bytes[0]);
            let g = parse_hex_digit(bytes[1]);
            let b = parse_hex_digit(bytes[2]);
            Ok(Rgb::new(r << 4 | r, g << 4 | g, b << 4 | b))
        }
        6 => Ok(Rgb::new(
            parse_hex_byte(bytes[0], bytes[1]),
            parse_hex_byte(bytes[2], bytes[3]),
            parse_hex_byte(bytes[4], bytes[5]),
        )),
        len => Err(ColorParseError::InvalidLength { len }),
    }
}

/// Format channels as lowercase `#rrggbb`.
///
/// Channels are rounded to the nearest integer and clamped into `[0, 255]`,
/// so fractional or out-of-range intermediates saturate instead of failing.
/// NaN formats as `00`.
///
/// ```
/// assert_eq!(wl_color::rgb_to_hex(300.0, -10.0, 128.0), "#ff0080");
/// ```
#[must_use]
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Rgb::new(channel_to_u8(r), channel_to_u8(g), channel_to_u8(b)).to_hex()
}

// ─── HSL conversions ─────────────────────────────────────────────────────────

/// Standard min/max-channel decomposition of sRGB into HSL.
///
/// Grays (`max == min`) short-circuit to `(0, 0, l)`: hue is undefined for an
/// achromatic color and saturation would otherwise divide by zero.
#[must_use]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if rgb.is_gray() {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if rgb.r >= rgb.g && rgb.r >= rgb.b {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if rgb.g >= rgb.b {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h * 60.0, s, l)
}

/// Convert HSL back to 8-bit sRGB, rounding each channel.
///
/// Zero saturation short-circuits to a gray of `round(l * 255)`.
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        let v = channel_to_u8(l * 255.0);
        return Rgb::new(v, v, v);
    }

    let h = h / 360.0;
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0f64.mul_add(l, -q);

    Rgb::new(
        channel_to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0),
        channel_to_u8(hue_to_rgb(p, q, h) * 255.0),
        channel_to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0),
    )
}

/// Piecewise HSL helper: the channel value at hue position `t` (in turns).
#[inline]
fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p)
    } else {
        p
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

#[inline]
const fn parse_hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

#[inline]
const fn parse_hex_byte(hi: u8, lo: u8) -> u8 {
    parse_hex_digit(hi) << 4 | parse_hex_digit(lo)
}

/// Round a 0–255 float to a byte, saturating at both ends.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(v: f64) -> u8 {
    // Safe: clamp bounds the value to 0.0..=255.0; NaN casts to 0.
    v.round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
