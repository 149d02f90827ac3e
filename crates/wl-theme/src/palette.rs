//! Shade palette generation: one brand color in, eleven shades out.
//!
//! Only the hue and saturation of the base color survive. Each shade gets a
//! fixed target lightness, so shade 500 is always a mid-tone regardless of
//! how light or dark the tenant's input was. Near-white and near-black
//! shades are desaturated so they don't look oversaturated.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use wl_color::{ColorParseError, Rgb, hex_to_rgb};

/// Saturation multiplier applied to shades lighter than 0.9 or darker than 0.2.
const EDGE_SATURATION: f64 = 0.6;

// ---------------------------------------------------------------------------
// Shade
// ---------------------------------------------------------------------------

/// One numbered rung of a palette, from near-white (`S50`) to near-black (`S950`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shade {
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
    S950,
}

impl Shade {
    /// Every shade, lightest first.
    pub const ALL: [Self; 11] = [
        Self::S50,
        Self::S100,
        Self::S200,
        Self::S300,
        Self::S400,
        Self::S500,
        Self::S600,
        Self::S700,
        Self::S800,
        Self::S900,
        Self::S950,
    ];

    /// The numeric name used in CSS variables (`50` … `950`).
    #[must_use]
    pub const fn number(self) -> u16 {
        match self {
            Self::S50 => 50,
            Self::S100 => 100,
            Self::S200 => 200,
            Self::S300 => 300,
            Self::S400 => 400,
            Self::S500 => 500,
            Self::S600 => 600,
            Self::S700 => 700,
            Self::S800 => 800,
            Self::S900 => 900,
            Self::S950 => 950,
        }
    }

    /// Look a shade up by its numeric name.
    #[must_use]
    pub fn from_number(n: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// HSL lightness this shade is generated at.
    #[must_use]
    pub const fn target_lightness(self) -> f64 {
        match self {
            Self::S50 => 0.97,
            Self::S100 => 0.94,
            Self::S200 => 0.87,
            Self::S300 => 0.77,
            Self::S400 => 0.63,
            Self::S500 => 0.50,
            Self::S600 => 0.42,
            Self::S700 => 0.35,
            Self::S800 => 0.28,
            Self::S900 => 0.22,
            Self::S950 => 0.14,
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// A mapping from shade to color.
///
/// [`generate_palette`] always fills all eleven shades. Palettes built by hand
/// through [`FromIterator`] may be partial; [`palette_to_css`] formats
/// whatever is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    shades: BTreeMap<Shade, Rgb>,
}

impl Palette {
    #[must_use]
    pub fn get(&self, shade: Shade) -> Option<Rgb> {
        self.shades.get(&shade).copied()
    }

    /// Entries in shade order, lightest first.
    pub fn iter(&self) -> impl Iterator<Item = (Shade, Rgb)> + '_ {
        self.shades.iter().map(|(shade, rgb)| (*shade, *rgb))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shades.is_empty()
    }

    /// Whether every one of the eleven shades is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shades.len() == Shade::ALL.len()
    }
}

impl FromIterator<(Shade, Rgb)> for Palette {
    fn from_iter<I: IntoIterator<Item = (Shade, Rgb)>>(iter: I) -> Self {
        Self {
            shades: iter.into_iter().collect(),
        }
    }
}

/// Serializes as `{"50": "#f8f4fe", …}`.
impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shades.len()))?;
        for (shade, rgb) in &self.shades {
            map.serialize_entry(&shade.to_string(), &rgb.to_hex())?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Derive the full 11-shade palette from a base color.
#[must_use]
pub fn generate_palette(base: Rgb) -> Palette {
    let hsl = base.to_hsl();

    Shade::ALL
        .into_iter()
        .map(|shade| {
            let l = shade.target_lightness();
            let mut derived = hsl.with_lightness(l);
            if l > 0.9 || l < 0.2 {
                derived = derived.with_saturation(hsl.s * EDGE_SATURATION);
            }
            (shade, derived.to_rgb())
        })
        .collect()
}

/// Parse a hex color and derive its palette.
///
/// # Errors
///
/// Returns the parse error if `hex` is not a valid `#rgb` / `#rrggbb` color.
pub fn generate_palette_hex(hex: &str) -> Result<Palette, ColorParseError> {
    hex_to_rgb(hex).map(generate_palette)
}

/// Format a palette as CSS custom-property declarations, one per line:
/// `--{prefix}-{shade}: {hex};`.
///
/// `prefix` is not validated; it must already be a safe CSS identifier.
#[must_use]
pub fn palette_to_css(palette: &Palette, prefix: &str) -> String {
    palette
        .iter()
        .map(|(shade, rgb)| format!("--{prefix}-{shade}: {rgb};"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
