//! Tenant CSS sanitizing.
//!
//! Tenant-supplied stylesheets are shown to every visitor of the tenant's
//! storefront, so the constructs that load remote code, execute script or
//! let a tenant draw over platform UI are rewritten before injection.
//!
//! This is a textual filter, not a CSS parser. Each rule is a
//! case-insensitive regex applied to the whole text, in a fixed order:
//!
//! | # | Matches                     | Becomes                                   |
//! |---|-----------------------------|-------------------------------------------|
//! | 1 | `@import …;`                | `/* import removed */`                    |
//! | 2 | `url(javascript:`           | `url(about:blank`                         |
//! | 3 | `url(data:` non-image types | `url(about:blank`                         |
//! | 4 | `expression(`               | `expression/* blocked */(`                |
//! | 5 | `-moz-binding:`/`behavior:` | `-moz-binding/* blocked */:`              |
//! | 6 | `position: fixed`           | `position: relative /* fixed removed */`  |
//! | 7 | `z-index: N`                | `z-index: min(N, 100)`                    |
//!
//! No rule's output matches its own trigger, so sanitizing twice is the same
//! as sanitizing once.
//!
//! Obfuscated input (escape sequences, comments inside keywords) can slip
//! past a textual rule. Those shapes are not rewritten; [`sanitize_report`]
//! flags them as [`Suspicions`] for manual review instead.

use std::borrow::Cow;
use std::sync::LazyLock;

use bitflags::bitflags;
use regex::{Captures, Regex};

/// Highest `z-index` a tenant stylesheet may use.
pub const MAX_Z_INDEX: i64 = 100;

/// Data-URI MIME prefixes that stay untouched.
const ALLOWED_DATA_MIME: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/svg",
    "image/webp",
];

/// Marker comment left by the rewrites that neutralize a call or property.
const BLOCKED: &str = "/* blocked */";

static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@import[^;]*(?:;|$)").expect("import pattern is valid"));

static JAVASCRIPT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(url\(\s*['"]?\s*)javascript\s*:"#).expect("javascript url pattern is valid")
});

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(url\(\s*['"]?\s*)data:([^,;'"()\s]*)"#).expect("data url pattern is valid")
});

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(expression)\s*\(").expect("expression pattern is valid"));

static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-moz-binding|behavior)\s*:").expect("binding pattern is valid")
});

static FIXED_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)position\s*:\s*fixed\b").expect("fixed position pattern is valid")
});

static Z_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)z-index\s*:\s*([+-]?[0-9]+)").expect("z-index pattern is valid")
});

// Suspicion detectors. These never rewrite.

static CSS_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[0-9a-fA-F]").expect("escape pattern is valid"));

static SPLIT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z-]/\*(.*?)\*/[A-Za-z(:-]").expect("split keyword pattern is valid")
});

static STYLE_BREAKOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</\s*style").expect("style breakout pattern is valid"));

static SCRIPT_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:vbscript|livescript|mocha)\s*:").expect("script scheme pattern is valid")
});

bitflags! {
    /// Which rewrite rules changed the text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rules: u8 {
        const IMPORT         = 1 << 0;
        const JAVASCRIPT_URL = 1 << 1;
        const DATA_URL       = 1 << 2;
        const EXPRESSION     = 1 << 3;
        const BINDING        = 1 << 4;
        const FIXED_POSITION = 1 << 5;
        const Z_INDEX        = 1 << 6;
    }
}

bitflags! {
    /// Shapes the rule set does not neutralize but a reviewer should see.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Suspicions: u8 {
        /// `\hh` escape sequences, which can spell any keyword.
        const CSS_ESCAPE     = 1 << 0;
        /// A comment glued between identifier characters, e.g. `expr/**/ession(`.
        const SPLIT_KEYWORD  = 1 << 1;
        /// `</style`, which would close the host element if rendered as HTML.
        const STYLE_BREAKOUT = 1 << 2;
        /// Script-capable URL schemes other than `javascript:`.
        const SCRIPT_SCHEME  = 1 << 3;
    }
}

/// Result of [`sanitize_report`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizeReport {
    /// The sanitized text, identical to what [`sanitize_css`] returns.
    pub css: String,
    /// Rules that rewrote something.
    pub rules: Rules,
    /// Suspicious shapes found in the input.
    pub suspicions: Suspicions,
}

type Rewrite = for<'a> fn(&'a str) -> Cow<'a, str>;

/// Rewrite rules in application order.
const PIPELINE: [(Rules, Rewrite); 7] = [
    (Rules::IMPORT, strip_imports),
    (Rules::JAVASCRIPT_URL, neutralize_javascript_urls),
    (Rules::DATA_URL, neutralize_data_urls),
    (Rules::EXPRESSION, block_expressions),
    (Rules::BINDING, block_bindings),
    (Rules::FIXED_POSITION, unfix_positions),
    (Rules::Z_INDEX, clamp_z_indexes),
];

/// Sanitize untrusted tenant CSS.
///
/// `None` and the empty string yield `""`. Anything else comes back with the
/// seven rewrite rules applied; text that triggers none of them is returned
/// unchanged. Never fails.
///
/// ```
/// use wl_theme::sanitize::sanitize_css;
///
/// let out = sanitize_css(Some(".m{z-index:99999}"));
/// assert_eq!(out, ".m{z-index: 100}");
/// assert_eq!(sanitize_css(None), "");
/// ```
#[must_use]
pub fn sanitize_css(css: Option<&str>) -> String {
    match css {
        Some(css) if !css.is_empty() => run(css).0,
        _ => String::new(),
    }
}

/// Sanitize and also report which rules fired and what looked suspicious.
#[must_use]
pub fn sanitize_report(css: &str) -> SanitizeReport {
    if css.is_empty() {
        return SanitizeReport::default();
    }
    let (out, rules) = run(css);
    SanitizeReport {
        css: out,
        rules,
        suspicions: detect_suspicions(css),
    }
}

fn run(css: &str) -> (String, Rules) {
    let mut current = css.to_owned();
    let mut fired = Rules::empty();

    for (flag, rewrite) in PIPELINE {
        let next = match rewrite(&current) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(next) => next,
        };
        if next != current {
            fired |= flag;
            current = next;
        }
    }

    (current, fired)
}

// ---------------------------------------------------------------------------
// Rewrite rules
// ---------------------------------------------------------------------------

fn strip_imports(css: &str) -> Cow<'_, str> {
    IMPORT.replace_all(css, "/* import removed */")
}

fn neutralize_javascript_urls(css: &str) -> Cow<'_, str> {
    JAVASCRIPT_URL.replace_all(css, "${1}about:blank")
}

fn neutralize_data_urls(css: &str) -> Cow<'_, str> {
    DATA_URL.replace_all(css, |caps: &Captures<'_>| {
        if is_allowed_data_mime(&caps[2]) {
            caps[0].to_owned()
        } else {
            format!("{}about:blank", &caps[1])
        }
    })
}

fn block_expressions(css: &str) -> Cow<'_, str> {
    EXPRESSION.replace_all(css, format!("${{1}}{BLOCKED}(").as_str())
}

fn block_bindings(css: &str) -> Cow<'_, str> {
    BINDING.replace_all(css, format!("${{1}}{BLOCKED}:").as_str())
}

fn unfix_positions(css: &str) -> Cow<'_, str> {
    FIXED_POSITION.replace_all(css, "position: relative /* fixed removed */")
}

fn clamp_z_indexes(css: &str) -> Cow<'_, str> {
    Z_INDEX.replace_all(css, |caps: &Captures<'_>| {
        let raw = &caps[1];
        match raw.parse::<i64>() {
            Ok(n) => format!("z-index: {}", n.min(MAX_Z_INDEX)),
            // Too many digits for i64: huge positives clamp, huge negatives can't
            // stack above anything and pass through.
            Err(_) if raw.starts_with('-') => format!("z-index: {raw}"),
            Err(_) => format!("z-index: {MAX_Z_INDEX}"),
        }
    })
}

fn is_allowed_data_mime(mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    ALLOWED_DATA_MIME.iter().any(|allowed| mime.starts_with(allowed))
}

// ---------------------------------------------------------------------------
// Suspicions
// ---------------------------------------------------------------------------

fn detect_suspicions(css: &str) -> Suspicions {
    let mut found = Suspicions::empty();
    if CSS_ESCAPE.is_match(css) {
        found |= Suspicions::CSS_ESCAPE;
    }
    // Our own markers are comments glued to identifiers too; skip them so a
    // re-sanitized stylesheet doesn't flag itself.
    let is_marker =
        |body: &str| matches!(body.trim(), "blocked" | "import removed" | "fixed removed");
    if SPLIT_KEYWORD
        .captures_iter(css)
        .any(|caps| !is_marker(&caps[1]))
    {
        found |= Suspicions::SPLIT_KEYWORD;
    }
    if STYLE_BREAKOUT.is_match(css) {
        found |= Suspicions::STYLE_BREAKOUT;
    }
    if SCRIPT_SCHEME.is_match(css) {
        found |= Suspicions::SCRIPT_SCHEME;
    }
    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
