// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Why a hex color string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string was empty (or only a `#`).
    #[error("empty color string")]
    Empty,

    /// Only `#rgb` and `#rrggbb` are accepted.
    #[error("expected 3 or 6 hex digits, found {len}")]
    InvalidLength { len: usize },

    /// A character that is not `0-9`, `a-f` or `A-F`.
    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}
