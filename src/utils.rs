//! Small string and JSON helpers shared by the translators and the spec builder.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static REGEXP_SPECIALS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"([.*+?^=!:${}()|\[\]/\\])").unwrap()
});

static URL_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r":([a-zA-Z_]+)").unwrap()
});

/// Escape every regular-expression metacharacter in `raw`.
pub fn quote_regexp(raw: &str) -> String {
    REGEXP_SPECIALS.replace_all(raw, r"\$1").into_owned()
}

/// Join items in prose form: `a`, `a and b`, `a, b and c`.
///
/// # Arguments
///
/// * `items` - The items to join
/// * `last_separator` - Placed between the last two items (usually `" and "`)
/// * `separator` - Placed between every other pair (usually `", "`)
///
/// # Example
///
/// ```rust
/// use oasforge::utils::nice_join;
///
/// let items = ["a".to_string(), "b".to_string(), "c".to_string()];
/// assert_eq!(nice_join(&items, " and ", ", "), "a, b and c");
/// ```
pub fn nice_join<S: AsRef<str>>(items: &[S], last_separator: &str, separator: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{}{}{}", head.join(separator), last_separator, last.as_ref())
        }
    }
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrite `:name` URL placeholders into OpenAPI `{name}` form.
pub fn openapi_path(url: &str) -> String {
    URL_PLACEHOLDER.replace_all(url, "{$1}").into_owned()
}

/// Walk a dotted/bracketed path (`body.items[0].name`) through a JSON value.
///
/// Objects are indexed by key, arrays by numeric segment. Quotes around
/// bracketed keys (`['a-b']`) are ignored. Returns `None` as soon as a
/// segment does not resolve.
pub fn get_path<'a>(container: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = container;

    for segment in path.split(['.', '[', ']']).filter(|s| !s.is_empty()) {
        let segment = segment.trim_matches(|c| c == '\'' || c == '"');
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}
