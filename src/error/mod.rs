//! # Error Normalization
//!
//! Converts errors raised while handling a request into structured HTTP error
//! payloads ([`HttpError`]).
//!
//! ## Taxonomy
//!
//! - **Client input errors** (wrong content type, empty or malformed JSON,
//!   schema validation failures) become 400 or 422 responses, with a
//!   field-addressable `errors` map where one applies.
//! - **Server errors** (anything unclassified) become 500 responses carrying
//!   `[CODE] message` and a normalized stack trace, and are logged at error level.
//!
//! ## Usage
//!
//! ```rust
//! use oasforge::error::{to_http_error, RaisedError};
//!
//! let err = RaisedError::new("Unexpected token").with_code("MALFORMED_JSON");
//! let http = to_http_error(err, None);
//!
//! assert_eq!(http.status_code.as_u16(), 400);
//! assert_eq!(http.message, "The body payload is not a valid JSON");
//! ```

mod http_error;
mod normalize;

pub use http_error::{status_title, HttpError};
pub use normalize::{
    serialize_error_description, serialize_error_stack, to_http_error, RaisedError, SourceError,
    CONTENT_TYPE_CODES, EMPTY_BODY_CODES, MALFORMED_JSON_CODE,
};
