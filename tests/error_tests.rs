#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use http::StatusCode;
use oasforge::error::{serialize_error_description, serialize_error_stack};
use oasforge::validation::ValidationFailure;
use oasforge::{to_http_error, HttpError, RaisedError};
use serde_json::{json, Value};

const MALFORMED_MESSAGE: &str = "The body payload is not a valid JSON";

fn cwd() -> String {
    std::env::current_dir().unwrap().display().to_string()
}

#[test]
fn test_http_errors_pass_through() {
    let original = HttpError::new(StatusCode::NOT_FOUND, "User not found.");
    assert_eq!(to_http_error(original.clone(), None), original);

    let conflict = HttpError::new(StatusCode::CONFLICT, "Already exists.")
        .with_errors(json!({ "email": "taken" }));
    assert_eq!(to_http_error(conflict.clone(), Some(&json!({}))), conflict);
}

#[test]
fn test_validation_failures_use_message_prefix() {
    common::tracing_util::init();

    let err = RaisedError::new("body should have required property 'name'").with_validation(vec![
        ValidationFailure::new("required", "", json!({ "missingProperty": "name" })),
    ]);

    let http = to_http_error(err, Some(&json!({ "body": {} })));
    assert_eq!(http.status_code, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(http.message, "Bad input data.");
    assert_eq!(http.errors, Some(json!({ "body": { "name": "must be present" } })));
}

#[test]
fn test_validation_prefix_stops_at_period_or_bracket() {
    let data = json!({ "query": { "fields": "" } });

    let dotted = RaisedError::new("querystring.fields should match pattern").with_validation(vec![
        ValidationFailure::new("pattern", ".fields", json!({ "pattern": "^(?<user>id|name)$" })),
    ]);
    assert_eq!(
        to_http_error(dotted, Some(&data)).errors,
        Some(json!({ "querystring": { "fields": "must be a non empty string" } }))
    );

    let bracketed = RaisedError::new("params[id] should be integer").with_validation(vec![
        ValidationFailure::new("type", ".id", json!({ "type": "integer" })),
    ]);
    assert_eq!(
        to_http_error(bracketed, None).errors,
        Some(json!({ "params": { "id": "must be a valid integer number" } }))
    );
}

#[test]
fn test_content_type_codes() {
    for code in ["INVALID_CONTENT_TYPE", "FST_ERR_CTP_INVALID_MEDIA_TYPE"] {
        let http = to_http_error(RaisedError::new("Unsupported Media Type").with_code(code), None);
        assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            http.message,
            r#"Only JSON payloads are accepted. Please set the "Content-Type" header to be "application/json""#
        );
        assert!(http.errors.is_none());
        assert!(http.stack.is_none());
    }
}

#[test]
fn test_empty_body_codes() {
    for code in ["EMPTY_JSON_BODY", "FST_ERR_CTP_EMPTY_JSON_BODY"] {
        let http = to_http_error(RaisedError::new("Body cannot be empty").with_code(code), None);
        assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            http.message,
            r#"The JSON body payload cannot be empty if the "Content-Type" header is set"#
        );
    }
}

#[test]
fn test_malformed_json_code_ignores_message() {
    let http = to_http_error(
        RaisedError::new("Unexpected token } in JSON at position 12").with_code("MALFORMED_JSON"),
        None,
    );
    assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(http.message, MALFORMED_MESSAGE);
}

#[test]
fn test_invalid_json_message() {
    let http = to_http_error(RaisedError::new("Invalid JSON"), None);
    assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(http.message, MALFORMED_MESSAGE);
}

#[test]
fn test_json_parser_top_frame() {
    let stack = "SyntaxError: Unexpected end of JSON input\n    at JSON.parse (<anonymous>)\n    at parseBody (/srv/app/body.js:10:3)";
    let http = to_http_error(
        RaisedError::new("Unexpected end of JSON input")
            .with_name("SyntaxError")
            .with_stack(stack),
        None,
    );
    assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(http.message, MALFORMED_MESSAGE);

    let rust_stack = "   0: oasforge::handler\n   1: serde_json::de::from_str\n   2: app::main";
    let http = to_http_error(RaisedError::new("trailing characters").with_stack(rust_stack), None);
    assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
}

#[test]
fn test_serde_json_errors() {
    let empty = serde_json::from_str::<Value>("").unwrap_err();
    assert_eq!(
        to_http_error(empty, None).message,
        r#"The JSON body payload cannot be empty if the "Content-Type" header is set"#
    );

    let truncated = serde_json::from_str::<Value>("{\"name\": ").unwrap_err();
    assert_eq!(to_http_error(truncated, None).message, MALFORMED_MESSAGE);

    let invalid = serde_json::from_str::<Value>("{\"name\": nope}").unwrap_err();
    let http = to_http_error(invalid, None);
    assert_eq!(http.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(http.message, MALFORMED_MESSAGE);
}

#[test]
fn test_unclassified_errors_become_500() {
    common::tracing_util::init();

    let stack = format!(
        "Error: connection refused\n    at connect ({root}/src/db.js:4:11)\n\n    at handler ({root}/src/routes/users.js:20:5)\n",
        root = cwd()
    );
    let http = to_http_error(
        RaisedError::new("connection refused")
            .with_code("ECONNREFUSED")
            .with_stack(stack),
        None,
    );

    assert_eq!(http.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(http.error, "Internal Server Error");
    assert_eq!(http.message, "[ECONNREFUSED] connection refused");
    assert_eq!(
        http.stack,
        Some(vec![
            "connect ($ROOT/src/db.js:4:11)".to_string(),
            "handler ($ROOT/src/routes/users.js:20:5)".to_string(),
        ])
    );
    assert!(http.errors.is_none());
}

#[test]
fn test_leading_blank_line_is_the_dropped_frame() {
    let http = to_http_error(
        RaisedError::new("boom").with_stack("\nError: boom\n    at handler (/srv/app.js:1:2)"),
        None,
    );

    assert_eq!(http.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        http.stack,
        Some(vec!["Error: boom".to_string(), "handler (/srv/app.js:1:2)".to_string()])
    );
}

#[test]
fn test_500_without_code_uses_name() {
    let http = to_http_error(RaisedError::new("oops").with_name("TypeError"), None);
    assert_eq!(http.message, "[TypeError] oops");
    assert_eq!(http.stack, Some(Vec::new()));

    let plain = RaisedError::new("oops");
    assert_eq!(serialize_error_description(&plain), "[Error] oops");
}

#[test]
fn test_captured_backtrace() {
    let err = RaisedError::capture("E_STATE", "inconsistent state");
    assert!(err.stack.is_some());

    let http = to_http_error(err, None);
    assert_eq!(http.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(http.message, "[E_STATE] inconsistent state");
    assert!(http.stack.is_some());
}

#[test]
fn test_stack_normalization_is_stable() {
    let text = format!("Error: x\n  at a ({}/lib/a.rs:1:1)\n  12: b::c", cwd());
    assert_eq!(serialize_error_stack(&text), serialize_error_stack(&text));
    assert_eq!(
        serialize_error_stack(&text),
        vec!["Error: x".to_string(), "a ($ROOT/lib/a.rs:1:1)".to_string(), "b::c".to_string()]
    );
}

#[test]
fn test_payload_shape() {
    let http = to_http_error(
        RaisedError::new("body must have required property 'name'").with_validation(vec![
            ValidationFailure::new("required", "", json!({ "missingProperty": "name" })),
        ]),
        None,
    );

    assert_eq!(
        serde_json::to_value(&http).unwrap(),
        json!({
            "statusCode": 422,
            "error": "Unprocessable Entity",
            "message": "Bad input data.",
            "errors": { "body": { "name": "must be present" } }
        })
    );
    assert_eq!(serde_json::to_value(&http).unwrap(), http.to_json());
    assert_eq!(http.to_string(), "422 Unprocessable Entity: Bad input data.");
}
