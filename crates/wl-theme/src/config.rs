//! Tenant branding input and engine options.
//!
//! The storefront's config fetcher hands over a JSON envelope per tenant.
//! Only the nested `branding` object matters here; every other field of the
//! envelope is ignored.
//!
//! ```json
//! {
//!   "tenantId": "acme",
//!   "branding": {
//!     "name": "Acme Supply",
//!     "primaryColor": "#9333ea",
//!     "fontFamily": "Poppins, sans-serif",
//!     "customCSS": ".hero { border-radius: 0 }",
//!     "logo": "https://cdn.example.com/acme.png"
//!   }
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Errors decoding configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tenant config")]
    Tenant(#[source] serde_json::Error),

    #[error("invalid theme options")]
    Options(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Tenant input
// ---------------------------------------------------------------------------

/// The tenant config envelope as delivered by the config fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Absent when the tenant has no branding; the theme is then left alone.
    #[serde(default)]
    pub branding: Option<BrandingConfig>,
}

impl TenantConfig {
    /// Decode an envelope from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Tenant`] if the text is not a valid envelope.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Tenant)
    }
}

/// A tenant's visual identity. Every field is optional: an absent field
/// leaves that aspect of the live theme untouched.
///
/// Empty and whitespace-only strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
    /// Tenant display name, substituted into the document title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    /// A CSS `font-family` list.
    #[serde(default)]
    pub font_family: Option<String>,
    /// Raw, untrusted tenant stylesheet.
    #[serde(default, rename = "customCSS", alias = "customCss")]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Treat `None`, `""` and whitespace-only values alike.
fn present(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl BrandingConfig {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        present(self.name.as_ref())
    }

    #[must_use]
    pub fn primary_color(&self) -> Option<&str> {
        present(self.primary_color.as_ref())
    }

    #[must_use]
    pub fn secondary_color(&self) -> Option<&str> {
        present(self.secondary_color.as_ref())
    }

    #[must_use]
    pub fn accent_color(&self) -> Option<&str> {
        present(self.accent_color.as_ref())
    }

    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        present(self.font_family.as_ref())
    }

    #[must_use]
    pub fn custom_css(&self) -> Option<&str> {
        present(self.custom_css.as_ref())
    }

    /// The icon to show: an explicit favicon wins over the logo.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        present(self.favicon.as_ref()).or_else(|| present(self.logo.as_ref()))
    }
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Platform-level knobs for the theme engine.
///
/// Defaults describe the stock storefront; a deployment can override any
/// of them from a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeOptions {
    /// The platform's own name, as it appears in the default document title.
    pub platform_name: String,
    /// Font already bundled with the platform; never fetched as a web font.
    pub bundled_font: String,
    /// Font names the browser provides; never fetched as web fonts.
    pub system_fonts: Vec<String>,
    /// `wght` axis values requested from the font host.
    pub font_weights: Vec<u16>,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            platform_name: "Storefront".to_owned(),
            bundled_font: "Inter".to_owned(),
            system_fonts: [
                "system-ui",
                "-apple-system",
                "BlinkMacSystemFont",
                "Segoe UI",
                "Roboto",
                "Helvetica",
                "Helvetica Neue",
                "Arial",
                "sans-serif",
                "serif",
                "monospace",
                "Georgia",
                "Times New Roman",
                "Courier New",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            font_weights: vec![300, 400, 500, 600, 700],
        }
    }
}

impl ThemeOptions {
    /// Decode options from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Options`] if the text is not valid options JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Options)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_envelope() {
        let config = TenantConfig::from_json(
            r##"{
                "tenantId": "acme",
                "plan": "pro",
                "branding": {
                    "name": "Acme",
                    "primaryColor": "#9333ea",
                    "customCSS": ".a{}",
                    "logo": "/logo.png"
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.tenant_id.as_deref(), Some("acme"));
        let branding = config.branding.unwrap();
        assert_eq!(branding.primary_color(), Some("#9333ea"));
        assert_eq!(branding.custom_css(), Some(".a{}"));
        assert_eq!(branding.icon(), Some("/logo.png"));
        assert_eq!(branding.secondary_color(), None);
    }

    #[test]
    fn missing_branding_is_none() {
        let config = TenantConfig::from_json(r#"{"tenantId":"x"}"#).unwrap();
        assert_eq!(config.branding, None);
    }

    #[test]
    fn custom_css_alias() {
        let branding: BrandingConfig = serde_json::from_str(r#"{"customCss":"a{}"}"#).unwrap();
        assert_eq!(branding.custom_css(), Some("a{}"));
    }

    #[test]
    fn blank_fields_count_as_absent() {
        let branding = BrandingConfig {
            primary_color: Some(String::new()),
            font_family: Some("   ".to_owned()),
            ..BrandingConfig::default()
        };
        assert_eq!(branding.primary_color(), None);
        assert_eq!(branding.font_family(), None);
    }

    #[test]
    fn favicon_beats_logo() {
        let branding = BrandingConfig {
            favicon: Some("/favicon.ico".to_owned()),
            logo: Some("/logo.png".to_owned()),
            ..BrandingConfig::default()
        };
        assert_eq!(branding.icon(), Some("/favicon.ico"));
    }

    #[test]
    fn malformed_envelope_is_an_error() {
        let err = TenantConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Tenant(_)));
        assert_eq!(err.to_string(), "invalid tenant config");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn options_default_and_override() {
        let defaults = ThemeOptions::default();
        assert_eq!(defaults.bundled_font, "Inter");
        assert_eq!(defaults.font_weights, vec![300, 400, 500, 600, 700]);

        let opts = ThemeOptions::from_json(r#"{"platformName":"ShopHub"}"#).unwrap();
        assert_eq!(opts.platform_name, "ShopHub");
        assert_eq!(opts.bundled_font, "Inter");
        assert_eq!(opts.system_fonts, defaults.system_fonts);
    }
}
