use super::HttpError;
use crate::utils::capitalize;
use crate::validation::{convert_validation_errors, messages, ValidationFailure};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::backtrace::Backtrace;
use tracing::{debug, error};

/// Codes signalling a request whose content type is not JSON.
pub const CONTENT_TYPE_CODES: [&str; 2] =
    ["INVALID_CONTENT_TYPE", "FST_ERR_CTP_INVALID_MEDIA_TYPE"];
/// Codes signalling an empty JSON body.
pub const EMPTY_BODY_CODES: [&str; 2] = ["EMPTY_JSON_BODY", "FST_ERR_CTP_EMPTY_JSON_BODY"];
pub const MALFORMED_JSON_CODE: &str = "MALFORMED_JSON";

const INVALID_JSON_MESSAGE: &str = "Invalid JSON";
const JSON_PARSER_FRAMES: [&str; 2] = ["JSON.parse", "serde_json::"];

static FRAME_INDEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d+:\s*").unwrap()
});

static PREFIX_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[.\s\[]").unwrap()
});

/// An error raised while handling a request, before it has an HTTP shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaisedError {
    /// Error type name, used when there is no code
    pub name: String,
    pub code: Option<String>,
    pub message: String,
    /// Stack text, one frame per line
    pub stack: Option<String>,
    /// Failures attached by a schema validator
    pub validation: Option<Vec<ValidationFailure>>,
}

impl RaisedError {
    pub fn new(message: impl Into<String>) -> Self {
        RaisedError {
            name: "Error".to_string(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Create a coded error and record the current backtrace as its stack.
    pub fn capture(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(message)
            .with_code(code)
            .with_stack(Backtrace::force_capture().to_string())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_validation(mut self, failures: Vec<ValidationFailure>) -> Self {
        self.validation = Some(failures);
        self
    }

    fn has_code(&self, codes: &[&str]) -> bool {
        self.code.as_deref().is_some_and(|c| codes.contains(&c))
    }
}

impl From<serde_json::Error> for RaisedError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let raised = RaisedError::new(err.to_string()).with_name("serde_json::Error");
        match err.classify() {
            Category::Eof if err.line() == 1 && err.column() == 0 => {
                raised.with_code(EMPTY_BODY_CODES[0])
            }
            Category::Syntax | Category::Eof => raised.with_code(MALFORMED_JSON_CODE),
            Category::Data | Category::Io => raised,
        }
    }
}

/// Anything [`to_http_error`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Already shaped for HTTP; passed through unchanged
    Http(HttpError),
    Raised(RaisedError),
}

impl From<HttpError> for SourceError {
    fn from(err: HttpError) -> Self {
        SourceError::Http(err)
    }
}

impl From<RaisedError> for SourceError {
    fn from(err: RaisedError) -> Self {
        SourceError::Raised(err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Raised(err.into())
    }
}

/// `[CODE] message`, falling back to the error name when there is no code.
pub fn serialize_error_description(err: &RaisedError) -> String {
    let label = err.code.as_deref().unwrap_or(&err.name);
    format!("[{}] {}", label, err.message)
}

/// Normalize stack text into one entry per frame.
///
/// Each line is trimmed, a leading `at ` and a leading backtrace frame index
/// are removed, and the first occurrence of the working directory becomes
/// `$ROOT`. Blank lines are dropped.
pub fn serialize_error_stack(stack: &str) -> Vec<String> {
    normalize_lines(stack.lines())
}

fn normalize_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let cwd = std::env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty());

    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = line.strip_prefix("at ").unwrap_or(line);
            let line = FRAME_INDEX.replace(line, "");
            match &cwd {
                Some(cwd) => line.replacen(cwd.as_str(), "$ROOT", 1),
                None => line.into_owned(),
            }
        })
        .collect()
}

/// Classify an error and produce the structured HTTP error for it.
///
/// First match wins:
///
/// 1. an [`HttpError`] is returned unchanged
/// 2. attached validation failures become a 422, sectioned by the first
///    token of the message (`body.name ...` → `body`)
/// 3. a content-type code becomes a 400
/// 4. an empty-body code becomes a 400
/// 5. malformed JSON (code, `Invalid JSON` message, or a JSON parser top frame) becomes a 400
/// 6. anything else becomes a 500 with the description and normalized stack
///
/// The first line of the raw stack (the message line) is removed before
/// blank lines are dropped, so a stack opening with a blank line keeps its
/// message.
///
/// # Arguments
///
/// * `err` - The error to classify
/// * `data` - The request input, consulted by the validation translator
pub fn to_http_error(err: impl Into<SourceError>, data: Option<&Value>) -> HttpError {
    let raised = match err.into() {
        SourceError::Http(http) => return http,
        SourceError::Raised(raised) => raised,
    };

    let stack = raised
        .stack
        .as_deref()
        .map(|text| normalize_lines(text.lines().skip(1)))
        .unwrap_or_default();

    if let Some(failures) = &raised.validation {
        let prefix = PREFIX_DELIMITER
            .split(&raised.message)
            .next()
            .unwrap_or_default();
        debug!(prefix, failures = failures.len(), "translating validation failures");
        return convert_validation_errors(data.unwrap_or(&Value::Null), failures, prefix, None);
    }

    if raised.has_code(&CONTENT_TYPE_CODES) {
        return HttpError::bad_request(capitalize(messages::CONTENT_TYPE));
    }

    if raised.has_code(&EMPTY_BODY_CODES) {
        return HttpError::bad_request(capitalize(messages::JSON_EMPTY));
    }

    let parser_frame = stack
        .first()
        .is_some_and(|frame| JSON_PARSER_FRAMES.iter().any(|p| frame.starts_with(p)));
    if raised.has_code(&[MALFORMED_JSON_CODE])
        || raised.message == INVALID_JSON_MESSAGE
        || parser_frame
    {
        return HttpError::bad_request(capitalize(messages::JSON));
    }

    let description = serialize_error_description(&raised);
    error!(error = %description, "unhandled error converted to 500");
    HttpError::internal(description, stack)
}
