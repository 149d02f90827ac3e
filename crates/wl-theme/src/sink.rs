//! The style-injection boundary.
//!
//! [`StyleSink`] is everything the theme engine needs from a page: two
//! keyed style regions, the document font, a web-font link, the favicon and
//! the title. A browser host implements it over the live DOM; [`Document`]
//! is the in-memory implementation used for server-side rendering and tests.

use std::fmt::Write as _;

use crate::font::clean_font_family;

/// Region holding the generated `:root { … }` custom properties.
pub const BRAND_VARS_ID: &str = "wl-brand-vars";

/// Region holding the sanitized tenant stylesheet.
pub const CUSTOM_CSS_ID: &str = "wl-custom-css";

/// Id of the single web-font `<link>`.
pub const FONT_LINK_ID: &str = "wl-brand-font";

/// Where the theme engine writes its output.
///
/// Every write is a full replacement. Regions are created on first write.
pub trait StyleSink {
    /// Create or replace the text of the style region `id`.
    fn set_style_region(&mut self, id: &str, css: &str);

    /// Remove the style region `id` if it exists.
    fn remove_style_region(&mut self, id: &str);

    /// Set the document-wide `font-family`.
    fn set_font_family(&mut self, family: &str);

    /// Point the web-font stylesheet link at `href`, creating it if needed.
    ///
    /// Loading is fire-and-forget: a failed load keeps the previous font.
    fn set_font_link(&mut self, href: &str);

    /// Point the `<link rel="icon">` at `href`, creating it if needed.
    fn set_favicon(&mut self, href: &str);

    fn title(&self) -> &str;

    fn set_title(&mut self, title: &str);
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An in-memory page head.
///
/// Style regions keep the order in which they were first created, like
/// elements appended to `<head>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: String,
    regions: Vec<(String, String)>,
    font_family: Option<String>,
    font_link: Option<String>,
    favicon: Option<String>,
}

impl Document {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Text of the style region `id`, if present.
    #[must_use]
    pub fn style_region(&self, id: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|(region, _)| region == id)
            .map(|(_, css)| css.as_str())
    }

    /// Ids of all style regions, in creation order.
    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    #[must_use]
    pub fn font_link(&self) -> Option<&str> {
        self.font_link.as_deref()
    }

    #[must_use]
    pub fn favicon(&self) -> Option<&str> {
        self.favicon.as_deref()
    }

    /// Render the head as HTML.
    ///
    /// Style text is escaped so tenant CSS cannot close its `<style>` element.
    /// A font family that is not a plain family list is left out.
    #[must_use]
    pub fn render_head(&self) -> String {
        // Writing into a String cannot fail.
        let mut out = String::new();
        let _ = writeln!(out, "<title>{}</title>", escape_html(&self.title));
        if let Some(href) = &self.favicon {
            let _ = writeln!(out, "<link rel=\"icon\" href=\"{}\">", escape_html(href));
        }
        if let Some(href) = &self.font_link {
            let _ = writeln!(
                out,
                "<link rel=\"stylesheet\" id=\"{FONT_LINK_ID}\" href=\"{}\">",
                escape_html(href)
            );
        }
        for (id, css) in &self.regions {
            let _ = writeln!(
                out,
                "<style id=\"{}\">\n{}\n</style>",
                escape_html(id),
                escape_style_text(css)
            );
        }
        if let Some(family) = self.font_family.as_deref().and_then(clean_font_family) {
            let _ = writeln!(out, "<style>body {{ font-family: {family}; }}</style>");
        }
        out
    }
}

impl StyleSink for Document {
    fn set_style_region(&mut self, id: &str, css: &str) {
        match self.regions.iter_mut().find(|(region, _)| region == id) {
            Some((_, text)) => css.clone_into(text),
            None => self.regions.push((id.to_owned(), css.to_owned())),
        }
    }

    fn remove_style_region(&mut self, id: &str) {
        self.regions.retain(|(region, _)| region != id);
    }

    fn set_font_family(&mut self, family: &str) {
        self.font_family = Some(family.to_owned());
    }

    fn set_font_link(&mut self, href: &str) {
        self.font_link = Some(href.to_owned());
    }

    fn set_favicon(&mut self, href: &str) {
        self.favicon = Some(href.to_owned());
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }
}

/// Escape text for an HTML attribute value or text node.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<style>` content is raw text: entities aren't decoded, so the only thing
/// to prevent is a literal `</`. CSS reads `<\/` as the same two characters.
fn escape_style_text(css: &str) -> String {
    css.replace("</", "<\\/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
