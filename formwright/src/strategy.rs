use serde::{Deserialize, Serialize};

/// Represents ways to locate an element in the current document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Select by the `id` attribute
    Id(String),
    /// Select by the `name` attribute
    Name(String),
    /// Select using a CSS selector
    Css(String),
    /// Select using an XPath expression
    XPath(String),
    /// Select an anchor by its exact link text
    LinkText(String),
    /// Represents an invalid strategy string, with a reason.
    Invalid(String),
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Id(v) => write!(f, "id:{v}"),
            Strategy::Name(v) => write!(f, "name:{v}"),
            Strategy::Css(v) => write!(f, "css:{v}"),
            Strategy::XPath(v) => write!(f, "xpath:{v}"),
            Strategy::LinkText(v) => write!(f, "link:{v}"),
            Strategy::Invalid(reason) => write!(f, "invalid:{reason}"),
        }
    }
}

impl From<&str> for Strategy {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Strategy::Invalid("empty selector string".to_string());
        }

        match trimmed {
            _ if trimmed.to_lowercase().starts_with("id:") => {
                Strategy::Id(trimmed[3..].to_string())
            }
            _ if trimmed.to_lowercase().starts_with("name:") => {
                Strategy::Name(trimmed[5..].to_string())
            }
            _ if trimmed.to_lowercase().starts_with("css:") => {
                Strategy::Css(trimmed[4..].to_string())
            }
            _ if trimmed.to_lowercase().starts_with("xpath:") => {
                Strategy::XPath(trimmed[6..].to_string())
            }
            _ if trimmed.to_lowercase().starts_with("link:") => {
                Strategy::LinkText(trimmed[5..].to_string())
            }
            // `#fname` shorthand, but only for a plain identifier; anything
            // with combinators or further selector syntax stays CSS
            _ if trimmed.starts_with('#')
                && trimmed[1..]
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_') =>
            {
                Strategy::Id(trimmed[1..].to_string())
            }
            _ if trimmed.starts_with('/') || trimmed.starts_with("(/") => {
                Strategy::XPath(trimmed.to_string())
            }
            // Bare strings default to CSS, matching browser-automation convention
            _ => Strategy::Css(trimmed.to_string()),
        }
    }
}

impl From<String> for Strategy {
    fn from(s: String) -> Self {
        Strategy::from(s.as_str())
    }
}

/// Render `value` as an XPath string literal.
///
/// XPath 1.0 has no escape sequence inside string literals, so a value
/// containing both quote kinds must be spliced with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let mut parts = Vec::new();
    for (i, chunk) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{chunk}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Render `value` as a quoted CSS string, escaping backslashes and quotes
pub fn css_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Join a strategy list for diagnostics, list order preserved
pub(crate) fn describe_list(strategies: &[Strategy]) -> String {
    strategies
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
