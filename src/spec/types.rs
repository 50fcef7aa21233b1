use super::Schema;
use crate::security::SecuritySchemeDefinition;
use http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// One HTTP verb or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteMethod {
    One(String),
    Many(Vec<String>),
}

impl RouteMethod {
    /// The verbs as [`Method`] values. Strings that are not valid HTTP
    /// tokens are skipped with a warning.
    pub fn methods(&self) -> Vec<Method> {
        let names: Vec<&str> = match self {
            RouteMethod::One(name) => vec![name.as_str()],
            RouteMethod::Many(names) => names.iter().map(String::as_str).collect(),
        };

        names
            .into_iter()
            .filter_map(|name| {
                match Method::from_bytes(name.to_ascii_uppercase().as_bytes()) {
                    Ok(method) => Some(method),
                    Err(_) => {
                        warn!(method = name, "skipping invalid HTTP method");
                        None
                    }
                }
            })
            .collect()
    }
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        RouteMethod::One(method.as_str().to_string())
    }
}

impl From<&str> for RouteMethod {
    fn from(method: &str) -> Self {
        RouteMethod::One(method.to_string())
    }
}

impl From<Vec<Method>> for RouteMethod {
    fn from(methods: Vec<Method>) -> Self {
        RouteMethod::Many(methods.iter().map(|m| m.as_str().to_string()).collect())
    }
}

/// Input and output shapes of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    /// Path parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Schema>,
    /// Response schemas keyed by status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<BTreeMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide: bool,
}

/// A single entry of a route's security list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecurityEntry {
    /// Name of a registered scheme, used without scopes
    Name(String),
    /// A full requirement object (`{ scheme: [scopes] }`)
    Requirement(Map<String, Value>),
}

/// A route's `config.security`: one entry or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecurityConfig {
    Many(Vec<Option<SecurityEntry>>),
    One(SecurityEntry),
}

impl SecurityConfig {
    pub fn entries(&self) -> Vec<&SecurityEntry> {
        match self {
            SecurityConfig::One(entry) => vec![entry],
            SecurityConfig::Many(entries) => entries.iter().flatten().collect(),
        }
    }

    /// Append a scheme name, turning a single entry into a list first.
    pub fn push_name(&mut self, name: impl Into<String>) {
        let entry = Some(SecurityEntry::Name(name.into()));
        match self {
            SecurityConfig::Many(entries) => entries.push(entry),
            SecurityConfig::One(single) => {
                let single = single.clone();
                *self = SecurityConfig::Many(vec![Some(single), entry]);
            }
        }
    }
}

impl From<&str> for SecurityConfig {
    fn from(name: &str) -> Self {
        SecurityConfig::One(SecurityEntry::Name(name.to_string()))
    }
}

/// Documentation and registration settings attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    /// Becomes the operation `summary`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityConfig>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide: bool,
    /// Models registered alongside the route during folder discovery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<IndexMap<String, Schema>>,
    /// Schemes registered alongside the route during folder discovery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<IndexMap<String, SecuritySchemeDefinition>>,
    /// Application specific settings, carried but not interpreted
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One HTTP endpoint, before it is turned into OpenAPI operations.
///
/// # Example
///
/// ```rust
/// use oasforge::spec::{RouteDescriptor, RouteConfig};
/// use http::Method;
///
/// let route = RouteDescriptor::new(Method::GET, "/users/:id").with_config(RouteConfig {
///     description: Some("Fetch a user".to_string()),
///     ..Default::default()
/// });
/// assert!(!route.is_hidden());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub method: RouteMethod,
    /// Path template with `:name` placeholders
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RouteSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RouteConfig>,
}

impl RouteDescriptor {
    pub fn new(method: impl Into<RouteMethod>, url: impl Into<String>) -> Self {
        RouteDescriptor {
            method: method.into(),
            url: url.into(),
            schema: None,
            config: None,
        }
    }

    pub fn with_schema(mut self, schema: RouteSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_config(mut self, config: RouteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Hidden routes never reach the generated document.
    pub fn is_hidden(&self) -> bool {
        self.schema.as_ref().is_some_and(|s| s.hide) || self.config.as_ref().is_some_and(|c| c.hide)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Base metadata and initial registrations for a [`Spec`](super::Spec).
///
/// Can be built in code or loaded from YAML/JSON with [`SpecInfo::load`].
/// A missing `license` defaults to `MIT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub author_email: Option<String>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub tags: Vec<Tag>,
    pub servers: Vec<Server>,
    pub models: IndexMap<String, Schema>,
    pub security_schemes: IndexMap<String, SecuritySchemeDefinition>,
    /// Folder scanned for route files at construction
    pub folder: Option<PathBuf>,
    /// Leave the standard error shapes out of `components.schemas`
    pub skip_default_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_method_forms() {
        let one: RouteMethod = serde_json::from_value(json!("get")).unwrap();
        assert_eq!(one.methods(), vec![Method::GET]);

        let many: RouteMethod = serde_json::from_value(json!(["POST", "put"])).unwrap();
        assert_eq!(many.methods(), vec![Method::POST, Method::PUT]);

        let bad = RouteMethod::One("GE T".to_string());
        assert!(bad.methods().is_empty());
    }

    #[test]
    fn test_security_push_name_normalizes() {
        let mut config = SecurityConfig::from("apiKey");
        config.push_name("bearer");
        assert_eq!(
            config,
            SecurityConfig::Many(vec![
                Some(SecurityEntry::Name("apiKey".to_string())),
                Some(SecurityEntry::Name("bearer".to_string())),
            ])
        );
    }

    #[test]
    fn test_route_descriptor_deserializes() {
        let route: RouteDescriptor = serde_json::from_value(json!({
            "method": "GET",
            "url": "/users/:id",
            "schema": { "params": { "type": "object" }, "response": { "200": { "type": "object" } } },
            "config": { "description": "Get user", "security": [null, "bearer"], "owner": "team-a" }
        }))
        .unwrap();

        let config = route.config.as_ref().unwrap();
        assert_eq!(config.description.as_deref(), Some("Get user"));
        assert_eq!(config.security.as_ref().unwrap().entries().len(), 1);
        assert_eq!(config.extra.get("owner"), Some(&json!("team-a")));
        assert!(!route.is_hidden());
    }
}
