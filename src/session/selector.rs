//! Selector model
//!
//! Query descriptors in the Playwright string syntax the page objects use:
//! plain CSS, XPath (`//…`, `xpath=…`) and CSS narrowed by `:has-text("…")`.

use std::fmt;

const HAS_TEXT: &str = ":has-text(";

/// A DOM query descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// CSS selector keeping only elements whose text contains `text`
    /// (case-insensitive, whitespace-normalised)
    HasText { css: String, text: String },
}

impl Selector {
    /// CSS selector
    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css(css.into())
    }

    /// XPath selector
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Selector::XPath(xpath.into())
    }

    /// CSS selector filtered by contained text
    pub fn has_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Selector::HasText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Parse a Playwright-style selector string
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(xpath) = raw.strip_prefix("xpath=") {
            return Selector::xpath(xpath);
        }
        if raw.starts_with("//") || raw.starts_with("(//") || raw.starts_with("..") {
            return Selector::xpath(raw);
        }

        let css = raw.strip_prefix("css=").unwrap_or(raw);

        if let Some((base, text)) = split_has_text(css) {
            return Selector::has_text(base, text);
        }

        Selector::css(css)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => f.write_str(css),
            Selector::XPath(xpath) if xpath.starts_with("//") || xpath.starts_with("(//") || xpath.starts_with("..") => {
                f.write_str(xpath)
            }
            Selector::XPath(xpath) => write!(f, "xpath={}", xpath),
            Selector::HasText { css, text } => {
                write!(f, "{}{}{})", css, HAS_TEXT, serde_json::Value::from(text.as_str()))
            }
        }
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Selector::parse(raw)
    }
}

/// Split `base:has-text("text")` into its parts
fn split_has_text(css: &str) -> Option<(String, String)> {
    let inner = css.strip_suffix(')')?;
    let idx = inner.rfind(HAS_TEXT)?;
    let base = &inner[..idx];
    let quoted = inner[idx + HAS_TEXT.len()..].trim();

    let text = if quoted.starts_with('"') {
        serde_json::from_str::<String>(quoted).ok()?
    } else if quoted.len() >= 2 && quoted.starts_with('\'') && quoted.ends_with('\'') {
        quoted[1..quoted.len() - 1].replace("\\'", "'")
    } else {
        quoted.to_string()
    };

    Some((base.to_string(), text))
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `:has-text` matching: case-insensitive substring over normalised text
pub fn text_matches(haystack: &str, needle: &str) -> bool {
    normalize_whitespace(haystack)
        .to_lowercase()
        .contains(&normalize_whitespace(needle).to_lowercase())
}
