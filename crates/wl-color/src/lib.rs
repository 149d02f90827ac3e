// SPDX-License-Identifier: MIT
//
// wl-color: color space conversions for white-label brand theming.
//
// Tenants hand us a single brand color as a hex string. Everything the
// theme engine derives from it flows through three representations:
//
//   hex string  ↔  8-bit sRGB (Rgb)  ↔  HSL (Hsl)
//
// Parsing is the only fallible step. Malformed hex is reported as a typed
// ColorParseError at the boundary so that nothing downstream ever sees a
// half-parsed color. The encode path (rgb_to_hex) saturates instead of
// failing, so intermediate float math can be formatted directly.

pub mod color;
pub mod error;

pub use color::{Hsl, Rgb, hex_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
pub use error::ColorParseError;
