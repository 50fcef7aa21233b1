//! Standard error response shapes.
//!
//! Every entry describes the payload of an [`HttpError`](crate::error::HttpError)
//! for one status code. The table is built once and never changes; a
//! [`Spec`](super::Spec) copies it into `components.schemas` as `errors.{code}`
//! unless told to skip it.

use super::Schema;
use crate::error::status_title;
use http::StatusCode;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// One catalogued error shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorShape {
    /// Short identifier (`badRequest`, `notFound`, ...)
    pub name: &'static str,
    pub status: StatusCode,
    /// JSON Schema of the payload, with a `ref` of `errors/{code}`
    pub schema: Schema,
}

fn build_error(
    name: &'static str,
    status: StatusCode,
    description: &str,
    extra: Value,
) -> ErrorShape {
    let code = status.as_u16();
    let title = status_title(status);
    let internal_code = title.split_whitespace().collect::<Vec<_>>().join("_").to_uppercase();

    let mut properties = json!({
        "statusCode": { "type": "number", "description": "The error code", "enum": [code], "example": code },
        "error": { "type": "string", "description": "The error title", "enum": [title], "example": title },
        "message": {
            "type": "string",
            "description": "The error message",
            "pattern": ".+",
            "example": format!("{title}.")
        },
        "code": {
            "type": "string",
            "description": "The error internal code",
            "pattern": ".+",
            "example": internal_code
        }
    });

    if let (Value::Object(target), Value::Object(extra)) = (&mut properties, extra) {
        target.extend(extra);
    }

    let schema = json!({
        "type": "object",
        "ref": format!("errors/{code}"),
        "description": description,
        "properties": properties,
        "required": ["statusCode", "error", "message"],
        "additionalProperties": false
    });

    ErrorShape {
        name,
        status,
        schema: Schema::from_value(schema).unwrap_or_default(),
    }
}

static CATALOG: Lazy<Vec<ErrorShape>> = Lazy::new(|| {
    let details = json!({ "type": "object", "additionalProperties": true });

    vec![
        build_error(
            "badRequest",
            StatusCode::BAD_REQUEST,
            "Error returned when the client payload is either invalid, malformed or has logical validation errors.",
            json!({ "errors": details, "failedValidations": details }),
        ),
        build_error(
            "unauthorized",
            StatusCode::UNAUTHORIZED,
            "Error returned when client does not provide any valid authorization.",
            json!({}),
        ),
        build_error(
            "forbidden",
            StatusCode::FORBIDDEN,
            "Error returned when client is not authorized to access the requested resource.",
            json!({}),
        ),
        build_error(
            "notFound",
            StatusCode::NOT_FOUND,
            "Error returned when the requested resource is not found.",
            json!({}),
        ),
        build_error(
            "methodNotAllowed",
            StatusCode::METHOD_NOT_ALLOWED,
            "Error returned when the requested method resource is not available.",
            json!({}),
        ),
        build_error(
            "notAcceptable",
            StatusCode::NOT_ACCEPTABLE,
            "Error returned when the server is not able to accept the request.",
            json!({}),
        ),
        build_error(
            "conflict",
            StatusCode::CONFLICT,
            "Error returned when the requested resource already exists.",
            json!({}),
        ),
        build_error(
            "unsupportedType",
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Error returned when the server is not able to accept the request media type.",
            json!({}),
        ),
        build_error(
            "unprocessableEntity",
            StatusCode::UNPROCESSABLE_ENTITY,
            "Error returned when the client payload does not satisfy the endpoint validation rules.",
            json!({ "errors": details }),
        ),
        build_error(
            "internalServerError",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error returned when a unexpected error was thrown by the server.",
            json!({
                "stack": { "type": "array", "items": { "type": "string", "pattern": ".+" } },
                "errors": details,
                "failedValidations": details
            }),
        ),
        build_error(
            "gatewayError",
            StatusCode::BAD_GATEWAY,
            "Error returned when a unexpected error was thrown by a upstream server.",
            json!({}),
        ),
        build_error(
            "gatewayTimeout",
            StatusCode::GATEWAY_TIMEOUT,
            "Error returned when a upstream server timed out.",
            json!({}),
        ),
    ]
});

/// All catalogued error shapes, ordered by status code.
pub fn error_catalog() -> &'static [ErrorShape] {
    &CATALOG
}

/// The catalogued shape for `status`, if there is one.
pub fn error_schema(status: StatusCode) -> Option<&'static Schema> {
    CATALOG.iter().find(|e| e.status == status).map(|e| &e.schema)
}
