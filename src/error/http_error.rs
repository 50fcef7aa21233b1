use http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// A structured HTTP error payload.
///
/// Serializes to the `{ statusCode, error, message, errors?, stack? }` shape
/// described by the `errors.*` component schemas. Absent `errors` and `stack`
/// are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// HTTP status code
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    /// Canonical reason phrase of the status (the error title)
    pub error: String,
    /// Human readable description
    pub message: String,
    /// Field-addressable details, for client input errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    /// Normalized stack frames, for server errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// Title used for a status code: its canonical reason phrase.
pub fn status_title(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

impl HttpError {
    pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        HttpError {
            status_code,
            error: status_title(status_code).to_string(),
            message: message.into(),
            errors: None,
            stack: None,
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 422 Unprocessable Entity carrying a field-addressable error map.
    pub fn bad_data(message: impl Into<String>, errors: Value) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message).with_errors(errors)
    }

    /// 500 Internal Server Error carrying a normalized stack.
    pub fn internal(message: impl Into<String>, stack: Vec<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_stack(stack)
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code.is_server_error()
    }

    /// The JSON payload for the HTTP layer.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "statusCode": self.status_code.as_u16(),
            "error": self.error,
            "message": self.message,
        });

        if let Value::Object(map) = &mut body {
            if let Some(errors) = &self.errors {
                map.insert("errors".to_string(), errors.clone());
            }
            if let Some(stack) = &self.stack {
                map.insert("stack".to_string(), json!(stack));
            }
        }

        body
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.status_code.as_u16(),
            self.error,
            self.message
        )
    }
}

impl std::error::Error for HttpError {}
