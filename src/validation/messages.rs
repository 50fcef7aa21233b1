//! Human-readable messages for validation failures.
//!
//! Two immutable tables, built once per process:
//!
//! - static messages, looked up by name (a JSON type, a string format, or a
//!   failure kind such as `missing`)
//! - formatters, which render a message around one parameter (a numeric
//!   limit, a list of allowed values, a status code)
//!
//! Dynamic lookups (`type` and `format` keywords) go through [`message`] and
//! [`formatter`]; the translator uses the named constants directly.

use crate::utils::nice_join;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

pub const CONTENT_TYPE: &str =
    r#"only JSON payloads are accepted. Please set the "Content-Type" header to be "application/json""#;
pub const JSON: &str = "the body payload is not a valid JSON";
pub const JSON_EMPTY: &str =
    r#"the JSON body payload cannot be empty if the "Content-Type" header is set"#;
pub const MISSING: &str = "must be present";
pub const UNKNOWN: &str = "is not a valid attribute";
pub const EMPTY_OBJECT: &str = "cannot be an empty object";
pub const PRESENT_STRING: &str = "must be a non empty string";
pub const NUMBER: &str = "must be a valid number";

/// Renders a message around a single parameter.
pub type Formatter = fn(&Value) -> String;

static MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("contentType", CONTENT_TYPE),
        ("json", JSON),
        ("jsonEmpty", JSON_EMPTY),
        ("missing", MISSING),
        ("unknown", UNKNOWN),
        ("emptyObject", EMPTY_OBJECT),
        ("uuid", "must be a valid GUID (UUID v4)"),
        (
            "timestamp",
            "must be a valid UTC timestamp in the format YYYY-MM-DDTHH:MM:SS.ssssssZ (example: 2018-07-06T12:34:56.123456Z)",
        ),
        ("date", "must be a valid RFC 3339 date (example: 2018-07-06)"),
        ("hostname", "must be a valid hostname"),
        ("ip", "must be a valid IPv4 or IPv6"),
        ("integer", "must be a valid integer number"),
        ("number", NUMBER),
        ("boolean", "must be a valid boolean (true or false)"),
        ("object", "must be a object"),
        ("array", "must be an array"),
        ("string", "must be a string"),
        ("presentString", PRESENT_STRING),
    ])
});

static FORMATTERS: Lazy<HashMap<&'static str, Formatter>> = Lazy::new(|| {
    HashMap::from([
        ("minimum", minimum as Formatter),
        ("maximum", maximum as Formatter),
        ("enum", allowed_values as Formatter),
        ("fields", fields as Formatter),
        ("invalidResponseCode", invalid_response_code as Formatter),
        ("invalidResponse", invalid_response as Formatter),
    ])
});

/// Look up a static message by name.
pub fn message(name: &str) -> Option<&'static str> {
    MESSAGES.get(name).copied()
}

/// Look up a formatter by name.
pub fn formatter(name: &str) -> Option<Formatter> {
    FORMATTERS.get(name).copied()
}

/// Render a JSON scalar the way it reads in prose: strings unquoted.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn minimum(limit: &Value) -> String {
    format!("must be a number greater than or equal to {}", display(limit))
}

pub fn maximum(limit: &Value) -> String {
    format!("must be a number less than or equal to {}", display(limit))
}

pub fn allowed_values(values: &Value) -> String {
    let quoted: Vec<String> = match values {
        Value::Array(items) => items.iter().map(|v| format!("\"{}\"", display(v))).collect(),
        Value::Null => Vec::new(),
        single => vec![format!("\"{}\"", display(single))],
    };

    format!(
        "must be one of the following values: {}",
        nice_join(&quoted, " or ", ", ")
    )
}

pub fn fields(name: &Value) -> String {
    format!("must be a valid comma separated list of {}", display(name))
}

pub fn invalid_response_code(code: &Value) -> String {
    format!("This endpoint cannot respond with HTTP status {}.", display(code))
}

pub fn invalid_response(code: &Value) -> String {
    format!(
        "The response returned from the endpoint violates its specification for the HTTP status {}.",
        display(code)
    )
}
