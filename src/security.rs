//! # Security Scheme Metadata
//!
//! Descriptions of authentication mechanisms, as they appear under
//! `components.securitySchemes` in the generated document. Nothing here
//! enforces authentication; the types only describe it.
//!
//! A scheme is registered under a name (see `Spec::add_security_schemes`)
//! and referenced from a route's `config.security` by that name.
//!
//! ## Example
//!
//! ```rust
//! use oasforge::security::{jwt_bearer_security_scheme, SecuritySchemeDefinition};
//!
//! let bearer = jwt_bearer_security_scheme();
//! assert_eq!(bearer.scheme.as_deref(), Some("bearer"));
//!
//! let definition = SecuritySchemeDefinition::from(bearer);
//! assert!(matches!(definition, SecuritySchemeDefinition::Scheme(_)));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenAPI security scheme `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
}

/// Where an `apiKey` scheme reads its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

/// An OpenAPI `securityScheme` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: SecuritySchemeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header, query or cookie name for `apiKey` schemes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiKeyLocation>,
    /// HTTP authorization scheme for `http` schemes (e.g. `bearer`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
    /// Any other keys (`x-*` extensions)
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl SecurityScheme {
    pub fn new(kind: SecuritySchemeType) -> Self {
        SecurityScheme {
            kind,
            description: None,
            name: None,
            location: None,
            scheme: None,
            bearer_format: None,
            flows: None,
            open_id_connect_url: None,
            extensions: Map::new(),
        }
    }
}

/// A named entry of the scheme registry.
///
/// Either a full scheme description or a bare string naming a scheme
/// registered elsewhere; both are copied into the document as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecuritySchemeDefinition {
    Named(String),
    Scheme(SecurityScheme),
}

impl From<SecurityScheme> for SecuritySchemeDefinition {
    fn from(scheme: SecurityScheme) -> Self {
        SecuritySchemeDefinition::Scheme(scheme)
    }
}

/// Stock JWT bearer token scheme.
pub fn jwt_bearer_security_scheme() -> SecurityScheme {
    SecurityScheme {
        description: Some("JWT based Bearer Token authentication".to_string()),
        scheme: Some("bearer".to_string()),
        bearer_format: Some("JWT".to_string()),
        ..SecurityScheme::new(SecuritySchemeType::Http)
    }
}
