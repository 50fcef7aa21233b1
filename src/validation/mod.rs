//! # Validation Error Translation
//!
//! Turns the machine-oriented failure records of a JSON Schema validator into a
//! flat `field path → message` map and wraps it into a 422 [`HttpError`].
//!
//! ## Keyword Mapping
//!
//! | keyword | field key | message |
//! |---|---|---|
//! | `required`, `dependencies` | `params.missingProperty` | must be present |
//! | `additionalProperties` | `params.additionalProperty` | is not a valid attribute |
//! | `minProperties` | data path | cannot be an empty object |
//! | `type` | data path | catalog entry for `params.type` |
//! | `minimum`, `maximum` | data path | formatted with `params.limit` |
//! | `enum` | data path | formatted with `params.allowedValues` |
//! | `pattern` | data path | non-empty marker, `fields` list, or the validator message |
//! | `format` | data path | catalog entry for the normalized format name |
//!
//! Failures with any other keyword produce no entry. When two failures resolve
//! to the same field path the later one wins.
//!
//! ## Usage
//!
//! ```rust
//! use oasforge::validation::{convert_validation_errors, ValidationFailure};
//! use serde_json::json;
//!
//! let failures = vec![ValidationFailure::new(
//!     "required",
//!     "",
//!     json!({ "missingProperty": "name" }),
//! )];
//! let error = convert_validation_errors(&json!({}), &failures, "body", None);
//!
//! assert_eq!(error.status_code.as_u16(), 422);
//! assert_eq!(error.errors, Some(json!({ "body": { "name": "must be present" } })));
//! ```

mod failure;
pub mod messages;

pub use failure::{Keyword, ValidationFailure};

use crate::error::HttpError;
use crate::utils::get_path;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Message of the 422 error produced by [`convert_validation_errors`].
pub const BAD_INPUT_MESSAGE: &str = "Bad input data.";

/// Pattern the validators use for "any non-empty string".
const NON_EMPTY_PATTERN: &str = ".+";

static NAMED_GROUP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\^\(\?<([a-zA-Z]+)>.+").unwrap()
});

/// Convert validator failures into a 422 "Bad input data." error.
///
/// # Arguments
///
/// * `data` - The request input, keyed by section (`body`, `query`, `params`, `headers`)
/// * `failures` - The validator's failure records
/// * `prefix` - The section the failures belong to; wraps the error map when non-empty
/// * `strip_prefix` - Removed (first match only) from every resulting field path
///
/// # Returns
///
/// A 422 [`HttpError`] whose `errors` hold `{ prefix: { field: message } }`,
/// or the bare field map when `prefix` is empty.
pub fn convert_validation_errors(
    data: &Value,
    failures: &[ValidationFailure],
    prefix: &str,
    strip_prefix: Option<&Regex>,
) -> HttpError {
    let section = if prefix == "querystring" { "query" } else { prefix };
    let mut errors = Map::new();

    for failure in failures {
        let base_key = failure.field_path();
        let (key, message) = describe(data, failure, section, &base_key);

        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => {
                debug!(
                    keyword = %failure.keyword,
                    path = %base_key,
                    "no message for validation failure"
                );
                continue;
            }
        };

        let mut parts: Vec<&str> = Vec::with_capacity(2);
        for part in [base_key.as_str(), key.as_str()] {
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }

        let mut property = parts.join(".").replace(['[', ']'], "");
        if let Some(pattern) = strip_prefix {
            property = pattern.replace(&property, "").into_owned();
        }

        errors.insert(property, Value::String(message));
    }

    let errors = if prefix.is_empty() {
        Value::Object(errors)
    } else {
        let mut wrapped = Map::new();
        wrapped.insert(prefix.to_string(), Value::Object(errors));
        Value::Object(wrapped)
    };

    HttpError::bad_data(BAD_INPUT_MESSAGE, errors)
}

/// Resolve the field key and message for one failure.
fn describe(
    data: &Value,
    failure: &ValidationFailure,
    section: &str,
    base_key: &str,
) -> (String, Option<String>) {
    let key = base_key.to_string();

    match failure.keyword() {
        Keyword::Required | Keyword::Dependencies => (
            failure.missing_property().unwrap_or_default().to_string(),
            Some(messages::MISSING.to_string()),
        ),
        Keyword::AdditionalProperties => (
            failure.additional_property().unwrap_or_default().to_string(),
            Some(messages::UNKNOWN.to_string()),
        ),
        Keyword::MinProperties => (key, Some(messages::EMPTY_OBJECT.to_string())),
        Keyword::Type => {
            let message = failure.type_name().and_then(messages::message);
            (key, message.map(str::to_string))
        }
        Keyword::Minimum => (key, failure.limit().map(messages::minimum)),
        Keyword::Maximum => (key, failure.limit().map(messages::maximum)),
        Keyword::Number => (key, Some(messages::NUMBER.to_string())),
        Keyword::Enum => (
            key,
            Some(messages::allowed_values(
                failure.allowed_values().unwrap_or(&Value::Null),
            )),
        ),
        Keyword::Pattern => {
            let message = pattern_message(data, failure, section, base_key);
            (key, Some(message))
        }
        Keyword::Format => (key, failure.format().and_then(format_message)),
        Keyword::Unknown => (key, None),
    }
}

fn pattern_message(data: &Value, failure: &ValidationFailure, section: &str, key: &str) -> String {
    let pattern = failure.pattern().unwrap_or_default();
    let value = get_path(data, &format!("{section}.{key}"));

    if pattern == NON_EMPTY_PATTERN || !is_present(value) {
        return messages::PRESENT_STRING.to_string();
    }

    if key == "fields" {
        if let Some(name) = NAMED_GROUP_PATTERN
            .captures(pattern)
            .and_then(|c| c.get(1))
        {
            return messages::fields(&Value::String(name.as_str().to_string()));
        }
    }

    match &failure.message {
        Some(message) => message.replace("(?:", "("),
        None => format!("must match pattern \"{pattern}\""),
    }
}

/// A value counts as present when it is a non-empty string or array.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    }
}

fn format_message(format: &str) -> Option<String> {
    let reason = match format {
        "ipv4" | "ipv6" => "ip",
        "date-time" => "timestamp",
        other => other,
    };

    match messages::formatter(reason) {
        Some(render) => Some(render(&Value::String(reason.to_string()))),
        None => messages::message(reason).map(str::to_string),
    }
}
