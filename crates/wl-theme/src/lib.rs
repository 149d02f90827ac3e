//! # wl-theme: White-label theming engine
//!
//! Turns a tenant's branding config into page styling: a full shade palette
//! per brand color, a sanitized copy of the tenant's own CSS, and the font,
//! favicon and title side effects that go with them.
//!
//! # Architecture
//!
//! ```text
//! TenantConfig { branding: BrandingConfig }       (config.rs)
//!     │
//!     ▼
//! inject.rs:   ThemeService::apply, one writer per page
//!     │
//!     ├── palette.rs:  11 shades per brand color → --wl-{role}-{shade}
//!     ├── sanitize.rs: regex rewrite of untrusted tenant CSS
//!     ├── font.rs:     web-font URL unless the font is local
//!     │
//!     ▼
//! sink.rs:     StyleSink: keyed style regions, font link, favicon, title
//! ```
//!
//! # Color Space
//!
//! Palettes are derived in HSL (`wl-color`): the base color's hue and
//! saturation are kept, lightness is replaced by a fixed per-shade target.

pub mod config;
pub mod font;
pub mod inject;
pub mod palette;
pub mod sanitize;
pub mod sink;

pub use config::{BrandingConfig, ConfigError, TenantConfig, ThemeOptions};
pub use inject::{ApplyReport, ColorRole, ThemeService};
pub use palette::{Palette, Shade, generate_palette, palette_to_css};
pub use sanitize::sanitize_css;
pub use sink::{Document, StyleSink};
