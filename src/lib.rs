//! # oasforge
//!
//! **oasforge** turns route descriptors into an [OpenAPI 3.0.1](https://spec.openapis.org/oas/v3.0.1)
//! document and turns request-handling failures into structured HTTP error payloads.
//!
//! ## Overview
//!
//! Services describe their endpoints once, as route descriptors carrying JSON Schema
//! fragments for headers, path parameters, query string, body and responses. The same
//! descriptors feed the request validator of the hosting framework and this crate's
//! spec builder, so the published document never drifts from what is enforced.
//!
//! When validation (or anything else) fails, the error normalizer maps the failure to
//! a client-safe [`HttpError`]: 400 for malformed input, 422 with a field-addressable
//! `errors` map for schema violations, 500 with a normalized stack for the rest.
//!
//! ## Architecture
//!
//! - **[`spec`]** - The [`Spec`] aggregate: models, security schemes, error shapes, paths;
//!   folder discovery; document generation
//! - **[`validation`]** - Translation of schema-validator failures into per-field messages
//! - **[`error`]** - Error normalization and the [`HttpError`] payload type
//! - **[`security`]** - OpenAPI security scheme objects
//! - **[`utils`]** - String and JSON path helpers
//!
//! ### Document Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Spec as spec::Spec
//!     participant FS as File System
//!
//!     App->>Spec: Spec::new(SpecInfo)
//!     Spec->>Spec: Load error catalog
//!     Spec->>FS: add_folder(folder)
//!     FS-->>Spec: route/routes modules
//!     Spec->>Spec: Merge models and security schemes
//!     App->>Spec: add_routes(routes)
//!     Spec->>Spec: Drop hidden, sort, rewrite :name to {name}
//!     App->>Spec: generate()
//!     Spec-->>App: OpenApiDocument
//! ```
//!
//! ### Error Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Handler
//!     participant Normalizer as error::to_http_error
//!     participant Translator as validation::convert_validation_errors
//!
//!     Handler->>Normalizer: RaisedError / HttpError
//!     alt carries validation failures
//!         Normalizer->>Translator: failures, request data
//!         Translator-->>Normalizer: 422 HttpError
//!     else classified input error
//!         Normalizer->>Normalizer: 400 HttpError
//!     else anything else
//!         Normalizer->>Normalizer: 500 HttpError + stack
//!     end
//!     Normalizer-->>Handler: HttpError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use oasforge::{RouteDescriptor, Spec, SpecInfo};
//! use http::Method;
//!
//! let mut spec = Spec::new(SpecInfo {
//!     title: Some("Pet Store".to_string()),
//!     version: Some("1.0.0".to_string()),
//!     ..Default::default()
//! })?;
//!
//! spec.add_routes(vec![
//!     RouteDescriptor::new(Method::GET, "/pets/:id"),
//!     RouteDescriptor::new(vec![Method::PUT, Method::PATCH], "/pets/:id"),
//! ]);
//!
//! let yaml = spec.to_yaml()?;
//! assert!(yaml.contains("/pets/{id}"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (route registration at debug level, folder scans at
//! info level, unhandled errors at error level) and never installs a subscriber.

pub mod error;
pub mod security;
pub mod spec;
pub mod utils;
pub mod validation;

pub use error::{to_http_error, HttpError, RaisedError, SourceError};
pub use security::{jwt_bearer_security_scheme, SecurityScheme, SecuritySchemeDefinition};
pub use spec::{
    omit_from_schema, resolve_reference, FileDiscovery, OpenApiDocument, RouteConfig,
    RouteDescriptor, RouteDiscovery, RouteProvider, RouteSchema, Schema, Spec, SpecInfo,
};
pub use validation::{convert_validation_errors, ValidationFailure};
