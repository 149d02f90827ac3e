//! Theme injection: applies a tenant's branding to a page.
//!
//! One [`ThemeService`] exists per page or session and owns the page's
//! [`StyleSink`]. Each [`ThemeService::apply`] call runs six independent,
//! best-effort steps:
//!
//! 1. palettes for the primary, secondary and accent colors, plus the
//!    `--brand`, `--brand-light` and `--brand-dark` aliases from primary
//! 2. the variables written into the `:root` block of the vars region
//! 3. custom CSS sanitized into its own region, or that region removed
//! 4. document font if it is a plain family list, and a web-font link
//!    unless the font is local
//! 5. favicon (explicit favicon, else logo)
//! 6. tenant name substituted for the platform name in the title
//!
//! A missing field skips its step. A malformed color skips its role. Nothing
//! here fails the apply as a whole.
//!
//! `apply` takes `&mut self`, so a service has one writer at a time. Each
//! call only overwrites what its config supplies: callers that want a field
//! reverted must pass a full snapshot.

use std::fmt;

use tracing::{debug, info, warn};
use wl_color::{ColorParseError, Rgb, hex_to_rgb};

use crate::config::{BrandingConfig, ThemeOptions};
use crate::font::{clean_font_family, resolve_web_font};
use crate::palette::{Palette, Shade, generate_palette, palette_to_css};
use crate::sanitize::{SanitizeReport, sanitize_report};
use crate::sink::{BRAND_VARS_ID, CUSTOM_CSS_ID, StyleSink};

// ---------------------------------------------------------------------------
// ColorRole
// ---------------------------------------------------------------------------

/// Which brand color a palette was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
}

impl ColorRole {
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Accent];

    /// Custom-property prefix for this role's shades.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Primary => "wl-brand",
            Self::Secondary => "wl-secondary",
            Self::Accent => "wl-accent",
        }
    }

    /// The role's color in `config`, if present.
    #[must_use]
    pub fn color_in(self, config: &BrandingConfig) -> Option<&str> {
        match self {
            Self::Primary => config.primary_color(),
            Self::Secondary => config.secondary_color(),
            Self::Accent => config.accent_color(),
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primaryColor",
            Self::Secondary => "secondaryColor",
            Self::Accent => "accentColor",
        })
    }
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Palettes and variable text derived from a config's brand colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandVariables {
    /// One entry per role whose color parsed, in role order.
    pub palettes: Vec<(ColorRole, Palette)>,
    /// Roles whose color was present but malformed.
    pub rejected: Vec<(ColorRole, String, ColorParseError)>,
    /// Custom-property declarations, one per line.
    pub declarations: String,
}

impl BrandVariables {
    /// Derive the variables for every color role present in `config`.
    #[must_use]
    pub fn from_config(config: &BrandingConfig) -> Self {
        let mut vars = Self::default();
        let mut lines: Vec<String> = Vec::new();

        for role in ColorRole::ALL {
            let Some(hex) = role.color_in(config) else {
                continue;
            };
            let base = match hex_to_rgb(hex.trim()) {
                Ok(base) => base,
                Err(err) => {
                    vars.rejected.push((role, hex.to_owned(), err));
                    continue;
                }
            };

            let palette = generate_palette(base);
            lines.push(palette_to_css(&palette, role.prefix()));
            if role == ColorRole::Primary {
                lines.push(brand_aliases(base, &palette));
            }
            vars.palettes.push((role, palette));
        }

        vars.declarations = lines.join("\n");
        vars
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// The declarations wrapped in a `:root` rule.
    #[must_use]
    pub fn root_block(&self) -> String {
        format!(":root {{\n{}\n}}", self.declarations)
    }
}

fn brand_aliases(base: Rgb, palette: &Palette) -> String {
    let mut lines = vec![format!("--brand: {base};")];
    if let Some(light) = palette.get(Shade::S400) {
        lines.push(format!("--brand-light: {light};"));
    }
    if let Some(dark) = palette.get(Shade::S700) {
        lines.push(format!("--brand-dark: {dark};"));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// What one [`ThemeService::apply`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Roles that produced a palette.
    pub roles: Vec<ColorRole>,
    /// Roles skipped because their color did not parse.
    pub rejected_colors: Vec<(ColorRole, String, ColorParseError)>,
    /// Sanitizer outcome, when custom CSS was supplied.
    pub custom_css: Option<SanitizeReport>,
    /// Whether a previous custom-CSS region was cleared.
    pub custom_css_removed: bool,
    /// Font family set on the document.
    pub font_family: Option<String>,
    /// Font family refused because it was not a plain family list.
    pub rejected_font: Option<String>,
    /// Web-font stylesheet requested, if the font is not local.
    pub web_font: Option<String>,
    pub favicon: Option<String>,
    /// The new title, when the platform name was substituted.
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// ThemeService
// ---------------------------------------------------------------------------

/// Applies tenant branding to one page.
#[derive(Debug)]
pub struct ThemeService<S: StyleSink> {
    sink: S,
    options: ThemeOptions,
}

impl<S: StyleSink> ThemeService<S> {
    #[must_use]
    pub const fn new(sink: S, options: ThemeOptions) -> Self {
        Self { sink, options }
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Apply `config` to the page. See the module docs for the steps.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn apply(&mut self, config: &BrandingConfig) -> ApplyReport {
        let mut report = ApplyReport::default();

        self.apply_colors(config, &mut report);
        self.apply_custom_css(config, &mut report);
        self.apply_font(config, &mut report);
        self.apply_favicon(config, &mut report);
        self.apply_title(config, &mut report);

        info!(
            roles = report.roles.len(),
            rejected = report.rejected_colors.len(),
            custom_css = report.custom_css.is_some(),
            web_font = report.web_font.is_some(),
            "applied tenant branding"
        );
        report
    }

    fn apply_colors(&mut self, config: &BrandingConfig, report: &mut ApplyReport) {
        let vars = BrandVariables::from_config(config);

        for (role, value, err) in &vars.rejected {
            warn!(%role, value = %value, error = %err, "ignoring malformed brand color");
        }
        report.rejected_colors.clone_from(&vars.rejected);

        // Leave the previous variables in place when nothing new was derived.
        if vars.is_empty() {
            return;
        }
        debug!(roles = vars.palettes.len(), "writing brand variables");
        self.sink.set_style_region(BRAND_VARS_ID, &vars.root_block());
        report.roles = vars.palettes.iter().map(|(role, _)| *role).collect();
    }

    fn apply_custom_css(&mut self, config: &BrandingConfig, report: &mut ApplyReport) {
        let Some(css) = config.custom_css() else {
            debug!("no custom css, clearing region");
            self.sink.remove_style_region(CUSTOM_CSS_ID);
            report.custom_css_removed = true;
            return;
        };

        let sanitized = sanitize_report(css);
        if !sanitized.rules.is_empty() {
            debug!(rules = ?sanitized.rules, "rewrote tenant css");
        }
        if !sanitized.suspicions.is_empty() {
            warn!(suspicions = ?sanitized.suspicions, "tenant css needs review");
        }
        self.sink.set_style_region(CUSTOM_CSS_ID, &sanitized.css);
        report.custom_css = Some(sanitized);
    }

    fn apply_font(&mut self, config: &BrandingConfig, report: &mut ApplyReport) {
        let Some(raw) = config.font_family() else {
            return;
        };
        let Some(family) = clean_font_family(raw) else {
            warn!(value = %raw, "ignoring malformed font family");
            report.rejected_font = Some(raw.to_owned());
            return;
        };
        self.sink.set_font_family(&family);

        if let Some(href) = resolve_web_font(&family, &self.options) {
            debug!(%href, "loading web font");
            self.sink.set_font_link(&href);
            report.web_font = Some(href);
        }
        report.font_family = Some(family);
    }

    fn apply_favicon(&mut self, config: &BrandingConfig, report: &mut ApplyReport) {
        if let Some(href) = config.icon() {
            self.sink.set_favicon(href);
            report.favicon = Some(href.to_owned());
        }
    }

    fn apply_title(&mut self, config: &BrandingConfig, report: &mut ApplyReport) {
        let Some(name) = config.name() else {
            return;
        };
        let platform = self.options.platform_name.as_str();
        if platform.is_empty() || !self.sink.title().contains(platform) {
            return;
        }
        let title = self.sink.title().replacen(platform, name, 1);
        self.sink.set_title(&title);
        report.title = Some(title);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Document;
    use pretty_assertions::assert_eq;

    fn service(title: &str) -> ThemeService<Document> {
        ThemeService::new(Document::new(title), ThemeOptions::default())
    }

    fn branding() -> BrandingConfig {
        BrandingConfig {
            primary_color: Some("#9333ea".to_owned()),
            ..BrandingConfig::default()
        }
    }

    #[test]
    fn primary_color_yields_palette_and_aliases() {
        let vars = BrandVariables::from_config(&branding());
        let palette = &vars.palettes[0].1;
        let light = palette.get(Shade::S400).unwrap();
        let dark = palette.get(Shade::S700).unwrap();

        assert!(vars.declarations.contains("--wl-brand-50: #"));
        assert!(vars.declarations.contains("--wl-brand-950: #"));
        assert!(vars.declarations.contains("--brand: #9333ea;"));
        assert!(vars.declarations.contains(&format!("--brand-light: {light};")));
        assert!(vars.declarations.contains(&format!("--brand-dark: {dark};")));
        assert_eq!(vars.declarations.lines().count(), 14);
    }

    #[test]
    fn aliases_come_from_primary_only() {
        let config = BrandingConfig {
            secondary_color: Some("#0ea5e9".to_owned()),
            accent_color: Some("#f59e0b".to_owned()),
            ..BrandingConfig::default()
        };
        let vars = BrandVariables::from_config(&config);
        assert!(vars.declarations.contains("--wl-secondary-500: #"));
        assert!(vars.declarations.contains("--wl-accent-500: #"));
        assert!(!vars.declarations.contains("--brand:"));
        assert_eq!(vars.declarations.lines().count(), 22);
    }

    #[test]
    fn shorthand_primary_is_normalized() {
        let config = BrandingConfig {
            primary_color: Some("f00".to_owned()),
            ..BrandingConfig::default()
        };
        let vars = BrandVariables::from_config(&config);
        assert!(vars.declarations.contains("--brand: #ff0000;"));
    }

    #[test]
    fn malformed_color_skips_only_its_role() {
        let config = BrandingConfig {
            primary_color: Some("#zzzzzz".to_owned()),
            accent_color: Some("#f59e0b".to_owned()),
            ..BrandingConfig::default()
        };
        let mut svc = service("Storefront");
        let report = svc.apply(&config);

        assert_eq!(report.roles, vec![ColorRole::Accent]);
        assert_eq!(report.rejected_colors.len(), 1);
        assert_eq!(report.rejected_colors[0].0, ColorRole::Primary);

        let vars = svc.sink().style_region(BRAND_VARS_ID).unwrap();
        assert!(vars.contains("--wl-accent-500"));
        assert!(!vars.contains("--brand:"));
    }

    #[test]
    fn vars_region_is_replaced_not_merged() {
        let mut svc = service("Storefront");
        svc.apply(&branding());
        svc.apply(&BrandingConfig {
            accent_color: Some("#f59e0b".to_owned()),
            ..BrandingConfig::default()
        });
        let vars = svc.sink().style_region(BRAND_VARS_ID).unwrap();
        assert!(vars.starts_with(":root {\n"));
        assert!(vars.ends_with("\n}"));
        assert!(!vars.contains("--wl-brand-"));
        assert!(vars.contains("--wl-accent-"));
    }

    #[test]
    fn colorless_apply_keeps_previous_vars() {
        let mut svc = service("Storefront");
        svc.apply(&branding());
        let before = svc.sink().style_region(BRAND_VARS_ID).map(str::to_owned);
        let report = svc.apply(&BrandingConfig::default());
        assert!(report.roles.is_empty());
        assert_eq!(svc.sink().style_region(BRAND_VARS_ID).map(str::to_owned), before);
    }

    #[test]
    fn custom_css_is_sanitized_then_removed() {
        let mut svc = service("Storefront");
        let report = svc.apply(&BrandingConfig {
            custom_css: Some(".o{position:fixed}".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(
            svc.sink().style_region(CUSTOM_CSS_ID),
            Some(".o{position: relative /* fixed removed */}")
        );
        assert!(report.custom_css.is_some());

        let report = svc.apply(&BrandingConfig::default());
        assert_eq!(svc.sink().style_region(CUSTOM_CSS_ID), None);
        assert!(report.custom_css_removed);
    }

    #[test]
    fn web_font_is_loaded_for_remote_fonts() {
        let mut svc = service("Storefront");
        let report = svc.apply(&BrandingConfig {
            font_family: Some("Poppins, sans-serif".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().font_family(), Some("Poppins, sans-serif"));
        assert_eq!(
            svc.sink().font_link(),
            Some(
                "https://fonts.googleapis.com/css2?family=Poppins:\
                 wght@300;400;500;600;700&display=swap"
            )
        );
        assert_eq!(report.web_font.as_deref(), svc.sink().font_link());
    }

    #[test]
    fn local_fonts_keep_previous_link() {
        let mut svc = service("Storefront");
        svc.apply(&BrandingConfig {
            font_family: Some("Poppins".to_owned()),
            ..BrandingConfig::default()
        });
        let report = svc.apply(&BrandingConfig {
            font_family: Some("Inter, sans-serif".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(report.web_font, None);
        assert_eq!(svc.sink().font_family(), Some("Inter, sans-serif"));
        assert!(svc.sink().font_link().unwrap().contains("family=Poppins"));
    }

    #[test]
    fn font_family_cannot_inject_rules() {
        let mut svc = service("Storefront");
        svc.apply(&BrandingConfig {
            font_family: Some("Poppins".to_owned()),
            ..BrandingConfig::default()
        });
        let attack = "x; } .overlay { position: fixed; z-index: 99999 } body { color: red";
        let report = svc.apply(&BrandingConfig {
            font_family: Some(attack.to_owned()),
            ..BrandingConfig::default()
        });

        assert_eq!(report.rejected_font.as_deref(), Some(attack));
        assert_eq!(report.font_family, None);
        assert_eq!(svc.sink().font_family(), Some("Poppins"));
        assert!(!svc.sink().render_head().contains("position: fixed"));
    }

    #[test]
    fn favicon_prefers_explicit_icon() {
        let mut svc = service("Storefront");
        svc.apply(&BrandingConfig {
            logo: Some("/logo.png".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().favicon(), Some("/logo.png"));

        svc.apply(&BrandingConfig {
            favicon: Some("/favicon.ico".to_owned()),
            logo: Some("/logo.png".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().favicon(), Some("/favicon.ico"));
    }

    #[test]
    fn title_substitutes_platform_name() {
        let mut svc = service("Checkout | Storefront");
        let report = svc.apply(&BrandingConfig {
            name: Some("Acme".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().title(), "Checkout | Acme");
        assert_eq!(report.title.as_deref(), Some("Checkout | Acme"));
    }

    #[test]
    fn only_the_first_platform_name_is_replaced() {
        let mut svc = service("Storefront - Storefront Deals");
        svc.apply(&BrandingConfig {
            name: Some("Acme".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().title(), "Acme - Storefront Deals");
    }

    #[test]
    fn custom_title_is_left_alone() {
        let mut svc = service("My Own Title");
        let report = svc.apply(&BrandingConfig {
            name: Some("Acme".to_owned()),
            ..BrandingConfig::default()
        });
        assert_eq!(svc.sink().title(), "My Own Title");
        assert_eq!(report.title, None);
    }

    #[test]
    fn empty_config_touches_nothing_but_custom_css() {
        let mut svc = service("Storefront");
        let report = svc.apply(&BrandingConfig::default());
        assert_eq!(svc.sink(), &Document::new("Storefront"));
        assert!(report.custom_css_removed);
        assert!(report.roles.is_empty() && report.favicon.is_none());
    }

    #[test]
    fn role_display_names_json_fields() {
        assert_eq!(ColorRole::Secondary.to_string(), "secondaryColor");
        assert_eq!(ColorRole::Accent.prefix(), "wl-accent");
    }
}
