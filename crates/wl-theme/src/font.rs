//! Web-font resolution for tenant font families.
//!
//! A `font-family` list is applied only after [`clean_font_family`] has
//! accepted it: the value lands inside a `body { … }` rule, so anything that
//! could end the declaration is refused. Only the first family is ever
//! fetched, and only when the browser or the platform doesn't already have it.

use crate::config::ThemeOptions;

/// Stylesheet endpoint of the font host.
const FONT_HOST: &str = "https://fonts.googleapis.com/css2";

/// First family of a CSS `font-family` list, trimmed and unquoted.
///
/// ```
/// use wl_theme::font::primary_family;
///
/// assert_eq!(primary_family("'Open Sans', Arial, sans-serif"), Some("Open Sans"));
/// assert_eq!(primary_family(" , serif"), None);
/// ```
#[must_use]
pub fn primary_family(family: &str) -> Option<&str> {
    let first = family.split(',').next()?.trim();
    let unquoted = unquote(first).unwrap_or(first).trim();
    (!unquoted.is_empty()).then_some(unquoted)
}

/// Validate a tenant `font-family` list and normalize its separators.
///
/// Each family is a bare name or a single- or double-quoted one, made of
/// letters, digits, spaces, `-`, `_`, `.` and `+`. Empty entries are dropped.
/// Returns `None` if any family has other characters.
///
/// ```
/// use wl_theme::font::clean_font_family;
///
/// assert_eq!(clean_font_family("'Open Sans',Arial"), Some("'Open Sans', Arial".to_owned()));
/// assert_eq!(clean_font_family("x; } .a { position: fixed"), None);
/// ```
#[must_use]
pub fn clean_font_family(list: &str) -> Option<String> {
    let mut families = Vec::new();
    for family in list.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let name = unquote(family).unwrap_or(family).trim();
        if name.is_empty() || !name.chars().all(is_family_char) {
            return None;
        }
        families.push(family);
    }
    (!families.is_empty()).then(|| families.join(", "))
}

fn is_family_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | '+')
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
}

/// Whether `name` is a system font or the platform's bundled font.
#[must_use]
pub fn is_local_font(name: &str, options: &ThemeOptions) -> bool {
    name.eq_ignore_ascii_case(&options.bundled_font)
        || options
            .system_fonts
            .iter()
            .any(|system| system.eq_ignore_ascii_case(name))
}

/// Font-host stylesheet URL for `name` with the configured weights.
#[must_use]
pub fn web_font_url(name: &str, options: &ThemeOptions) -> String {
    let weights = options
        .font_weights
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!(
        "{FONT_HOST}?family={}:wght@{weights}&display=swap",
        urlencoding::encode(name)
    )
}

/// The stylesheet to load for a `font-family` list, if any.
///
/// `None` when the list is empty or its first family is available locally.
#[must_use]
pub fn resolve_web_font(family: &str, options: &ThemeOptions) -> Option<String> {
    let name = primary_family(family)?;
    if is_local_font(name, options) {
        return None;
    }
    Some(web_font_url(name, options))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_family_is_unquoted() {
        assert_eq!(primary_family("\"Playfair Display\", serif"), Some("Playfair Display"));
        assert_eq!(primary_family("Poppins"), Some("Poppins"));
        assert_eq!(primary_family(""), None);
    }

    #[test]
    fn url_template() {
        let url = web_font_url("Open Sans", &ThemeOptions::default());
        assert_eq!(
            url,
            "https://fonts.googleapis.com/css2?family=Open%20Sans:\
             wght@300;400;500;600;700&display=swap"
        );
    }

    #[test]
    fn custom_weights() {
        let options = ThemeOptions {
            font_weights: vec![400, 700],
            ..ThemeOptions::default()
        };
        assert!(web_font_url("Lato", &options).contains(":wght@400;700&"));
    }

    #[test]
    fn system_and_bundled_fonts_are_not_fetched() {
        let options = ThemeOptions::default();
        assert_eq!(resolve_web_font("system-ui, sans-serif", &options), None);
        assert_eq!(resolve_web_font("'Segoe UI', Roboto", &options), None);
        assert_eq!(resolve_web_font("inter, sans-serif", &options), None);
        assert_eq!(resolve_web_font("arial", &options), None);
    }

    #[test]
    fn only_the_first_family_decides() {
        let options = ThemeOptions::default();
        assert!(resolve_web_font("Poppins, Inter, sans-serif", &options).is_some());
        assert_eq!(resolve_web_font("Arial, Poppins", &options), None);
    }

    #[test]
    fn plain_family_lists_are_accepted() {
        assert_eq!(
            clean_font_family("Poppins, sans-serif").as_deref(),
            Some("Poppins, sans-serif")
        );
        assert_eq!(
            clean_font_family(" \"Playfair Display\" ,serif, ").as_deref(),
            Some("\"Playfair Display\", serif")
        );
        assert_eq!(
            clean_font_family("M+ 1p, Noto Sans JP").as_deref(),
            Some("M+ 1p, Noto Sans JP")
        );
        assert_eq!(clean_font_family(" , "), None);
    }

    #[test]
    fn family_lists_that_escape_the_declaration_are_refused() {
        let refused = [
            "x; } .overlay { position: fixed; z-index: 99999 } body { color: red",
            "Arial; color: red",
            "Arial, url(javascript:alert(1))",
            "Arial/**/",
            "x</style><script>",
            r"\41 rial",
            "'Open Sans",
            "'a', 'b'c'",
            "\"\"",
        ];
        for family in refused {
            assert_eq!(clean_font_family(family), None, "accepted {family:?}");
        }
    }

    #[test]
    fn special_characters_are_encoded() {
        let url = resolve_web_font("M+ 1p&x", &ThemeOptions::default()).unwrap();
        assert!(url.contains("family=M%2B%201p%26x:"), "{url}");
    }
}
