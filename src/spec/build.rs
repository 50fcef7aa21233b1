use super::document::{
    Components, Contact, Info, License, MediaType, OpenApiDocument, Operation, Parameter, PathItem,
    RequestBody, Response, SecurityRequirement, OPENAPI_VERSION,
};
use super::errors::error_catalog;
use super::types::{
    ParameterLocation, RouteDescriptor, RouteSchema, SecurityConfig, SecurityEntry, Server,
    SpecInfo, Tag,
};
use super::Schema;
use crate::security::SecuritySchemeDefinition;
use crate::utils::openapi_path;
use http::Method;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

const DEFAULT_LICENSE: &str = "MIT";
const JSON_MEDIA_TYPE: &str = "application/json";
const SCHEMA_POINTER_PREFIX: &str = "#/components/schemas/";

static MODELS_PREFIX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^models[/.]").unwrap()
});

/// Replace a schema carrying a `ref`/`$ref` by a `$ref` pointer.
///
/// Pointers that are not already JSON pointers (`models/user`) are expanded to
/// `#/components/schemas/models.user`. Schemas without a reference are
/// shallow-copied with `ref`, `$ref` and `excluded` keys removed.
///
/// # Example
///
/// ```rust
/// use oasforge::spec::{resolve_reference, Schema};
/// use serde_json::json;
///
/// let schema = Schema::from_value(json!({ "ref": "models/user" })).unwrap();
/// assert_eq!(
///     resolve_reference(&schema, &[]).into_value(),
///     json!({ "$ref": "#/components/schemas/models.user" })
/// );
/// ```
pub fn resolve_reference(schema: &Schema, excluded: &[&str]) -> Schema {
    if let Some(reference) = schema.reference() {
        let pointer = if reference.contains("#/") {
            reference.to_string()
        } else {
            format!("{}{}", SCHEMA_POINTER_PREFIX, reference.replace('/', "."))
        };

        let mut resolved = Schema::new();
        resolved.insert("$ref", Value::String(pointer));
        return resolved;
    }

    let mut keys = vec!["ref", "$ref"];
    keys.extend_from_slice(excluded);
    schema.without(&keys)
}

/// Copy of an object schema without the named properties.
///
/// The names are removed from `properties` and filtered out of `required`.
/// A schema whose `type` is not `object` is returned as it is.
///
/// # Example
///
/// ```rust
/// use oasforge::spec::{omit_from_schema, Schema};
/// use serde_json::json;
///
/// let user = Schema::from_value(json!({
///     "type": "object",
///     "properties": { "id": { "type": "string" }, "name": { "type": "string" } },
///     "required": ["id", "name"]
/// }))
/// .unwrap();
///
/// let create = omit_from_schema(&user, &["id"]);
/// assert_eq!(create.required(), vec!["name"]);
/// ```
pub fn omit_from_schema(schema: &Schema, properties: &[&str]) -> Schema {
    if schema.get("type").and_then(Value::as_str) != Some("object") {
        return schema.clone();
    }

    let mut map = schema.as_map().clone();
    if let Some(Value::Object(declared)) = map.get_mut("properties") {
        for name in properties {
            declared.remove(*name);
        }
    }
    if let Some(Value::Array(required)) = map.get_mut("required") {
        required.retain(|name| !name.as_str().is_some_and(|n| properties.contains(&n)));
    }

    Schema::from(map)
}

/// Case-insensitive URL order, falling back to byte order on ties.
fn compare_urls(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Whether a request body is documented for this verb.
fn carries_body(method: &Method) -> bool {
    [Method::PUT, Method::PATCH, Method::POST].contains(method)
}

/// Accumulates models, security schemes and routes, and renders them as one
/// OpenAPI 3.0.1 document.
///
/// ## Lifecycle
///
/// A `Spec` is created once with base metadata, then filled through
/// [`add_models`](Spec::add_models), [`add_security_schemes`](Spec::add_security_schemes),
/// [`add_routes`](Spec::add_routes) and [`add_folder`](Spec::add_folder).
/// [`generate`](Spec::generate) is a pure read and may be called any number of times.
///
/// ## Ordering
///
/// Each `add_routes` call sorts its own batch by URL, ignoring case, then
/// method. Paths added by earlier calls keep their position; batches are
/// not re-sorted against each other.
///
/// # Example
///
/// ```rust
/// use oasforge::spec::{RouteDescriptor, Spec, SpecInfo};
/// use http::Method;
///
/// let mut spec = Spec::new(SpecInfo {
///     title: Some("Users".to_string()),
///     version: Some("1.0.0".to_string()),
///     ..Default::default()
/// })?;
/// spec.add_route(RouteDescriptor::new(Method::GET, "/users/:id"));
///
/// let doc = spec.generate();
/// assert!(doc.paths["/users/{id}"].contains_key("get"));
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Spec {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub author_email: Option<String>,
    pub license: String,
    pub version: Option<String>,
    pub tags: Vec<Tag>,
    pub servers: Vec<Server>,
    security_schemes: IndexMap<String, SecuritySchemeDefinition>,
    models: IndexMap<String, Schema>,
    parameters: IndexMap<String, Value>,
    responses: IndexMap<String, Value>,
    errors: IndexMap<String, Schema>,
    paths: IndexMap<String, PathItem>,
}

impl Spec {
    /// Create a spec from base metadata.
    ///
    /// Registers `info.models` and `info.security_schemes`, then scans
    /// `info.folder` if one is set. The standard error shapes are loaded
    /// unless `info.skip_default_errors` is set.
    ///
    /// # Errors
    ///
    /// Fails only if the folder scan fails.
    pub fn new(info: SpecInfo) -> anyhow::Result<Self> {
        let SpecInfo {
            title,
            description,
            author_name,
            author_url,
            author_email,
            license,
            version,
            tags,
            servers,
            models,
            security_schemes,
            folder,
            skip_default_errors,
        } = info;

        let errors = if skip_default_errors {
            IndexMap::new()
        } else {
            error_catalog()
                .iter()
                .map(|e| (e.status.as_u16().to_string(), e.schema.without(&["ref"])))
                .collect()
        };

        let mut spec = Spec {
            title,
            description,
            author_name,
            author_url,
            author_email,
            license: license
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
            version,
            tags,
            servers,
            security_schemes: IndexMap::new(),
            models: IndexMap::new(),
            parameters: IndexMap::new(),
            responses: IndexMap::new(),
            errors,
            paths: IndexMap::new(),
        };

        spec.add_models(models);
        spec.add_security_schemes(security_schemes);
        if let Some(folder) = folder {
            spec.add_folder(&folder)?;
        }

        Ok(spec)
    }

    pub fn models(&self) -> &IndexMap<String, Schema> {
        &self.models
    }

    pub fn security_schemes(&self) -> &IndexMap<String, SecuritySchemeDefinition> {
        &self.security_schemes
    }

    /// Error shapes keyed by status code.
    pub fn errors(&self) -> &IndexMap<String, Schema> {
        &self.errors
    }

    pub fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.paths
    }

    /// Register model schemas.
    ///
    /// A schema's `ref` (when present) names it instead of its map key; a
    /// leading `models/` or `models.` is dropped from the name. The `ref`
    /// key itself is not stored.
    pub fn add_models<I, K>(&mut self, models: I)
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        for (key, schema) in models {
            let key = key.into();
            let source = schema
                .get("ref")
                .and_then(Value::as_str)
                .filter(|r| !r.is_empty())
                .unwrap_or(key.as_str());
            let name = MODELS_PREFIX.replace(source, "").into_owned();

            debug!(model = %name, "registered model");
            self.models.insert(name, schema.without(&["ref"]));
        }
    }

    /// Register security schemes by name; a later registration replaces an
    /// earlier one with the same name.
    pub fn add_security_schemes<I, K>(&mut self, schemes: I)
    where
        I: IntoIterator<Item = (K, SecuritySchemeDefinition)>,
        K: Into<String>,
    {
        for (name, scheme) in schemes {
            let name = name.into();
            debug!(scheme = %name, "registered security scheme");
            self.security_schemes.insert(name, scheme);
        }
    }

    /// Register shared `components.parameters` entries.
    pub fn add_parameters<I, K>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.parameters
            .extend(parameters.into_iter().map(|(k, v)| (k.into(), v)));
    }

    /// Register shared `components.responses` entries.
    pub fn add_responses<I, K>(&mut self, responses: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.responses
            .extend(responses.into_iter().map(|(k, v)| (k.into(), v)));
    }

    pub fn add_route(&mut self, route: RouteDescriptor) {
        self.add_routes(std::iter::once(route));
    }

    /// Add a batch of routes to `paths`.
    ///
    /// Hidden routes are dropped. The rest are sorted by URL (ignoring case),
    /// then method, and each (route, method) pair becomes one operation
    /// under the OpenAPI form of the URL. An operation already present for
    /// the same path and method is replaced.
    pub fn add_routes<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = RouteDescriptor>,
    {
        let routes: Vec<RouteDescriptor> =
            routes.into_iter().filter(|r| !r.is_hidden()).collect();

        let mut entries: Vec<(&RouteDescriptor, Method)> = routes
            .iter()
            .flat_map(|route| route.method.methods().into_iter().map(move |m| (route, m)))
            .collect();
        entries.sort_by(|(a, am), (b, bm)| {
            compare_urls(&a.url, &b.url).then_with(|| am.as_str().cmp(bm.as_str()))
        });

        let no_schema = RouteSchema::default();
        for (route, method) in entries {
            let schema = route.schema.as_ref().unwrap_or(&no_schema);
            let config = route.config.as_ref();

            let mut operation = Operation {
                summary: config.and_then(|c| c.description.clone()),
                tags: config.and_then(|c| c.tags.clone()),
                security: parse_security(config.and_then(|c| c.security.as_ref())),
                parameters: parse_parameters(schema),
                responses: parse_responses(schema.response.as_ref()),
                request_body: None,
            };
            if carries_body(&method) {
                operation.request_body = parse_payload(schema);
            }

            let path = openapi_path(&route.url);
            let method = method.as_str().to_ascii_lowercase();
            debug!(%method, %path, "registered route");

            self.paths.entry(path).or_default().insert(method, operation);
        }
    }

    /// Render the accumulated state as an OpenAPI 3.0.1 document.
    pub fn generate(&self) -> OpenApiDocument {
        let mut schemas = schema_objects(&self.models, "models");
        schemas.extend(schema_objects(&self.errors, "errors"));

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                description: self.description.clone(),
                contact: Contact {
                    name: self.author_name.clone(),
                    url: self.author_url.clone(),
                    email: self.author_email.clone(),
                },
                license: License::from_id(&self.license),
                version: self.version.clone(),
            },
            servers: self.servers.clone(),
            tags: self.tags.clone(),
            components: Components {
                security_schemes: self.security_schemes.clone(),
                parameters: self.parameters.clone(),
                responses: self.responses.clone(),
                schemas,
            },
            paths: self.paths.clone(),
        }
    }

    /// [`generate`](Spec::generate) rendered as a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.generate())
    }

    /// [`generate`](Spec::generate) rendered as YAML text.
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(&self.generate())
    }
}

fn schema_objects(source: &IndexMap<String, Schema>, prefix: &str) -> IndexMap<String, Schema> {
    source
        .iter()
        .map(|(name, schema)| (format!("{prefix}.{name}"), schema.without(&["ref", "$ref"])))
        .collect()
}

/// Normalize a route's security setting into requirement objects.
///
/// Bare names become `{ name: [] }`; requirement objects pass through;
/// empty names and nulls are dropped.
pub fn parse_security(security: Option<&SecurityConfig>) -> Vec<SecurityRequirement> {
    let Some(security) = security else {
        return Vec::new();
    };

    security
        .entries()
        .into_iter()
        .filter_map(|entry| match entry {
            SecurityEntry::Name(name) if name.is_empty() => None,
            SecurityEntry::Name(name) => {
                let mut requirement = Map::new();
                requirement.insert(name.clone(), Value::Array(Vec::new()));
                Some(requirement)
            }
            SecurityEntry::Requirement(requirement) => Some(requirement.clone()),
        })
        .collect()
}

/// Build parameter descriptors from the `headers`, `params` and
/// `querystring` sections, in that order.
pub fn parse_parameters(schema: &RouteSchema) -> Vec<Parameter> {
    let sections = [
        (schema.headers.as_ref(), ParameterLocation::Header),
        (schema.params.as_ref(), ParameterLocation::Path),
        (schema.querystring.as_ref(), ParameterLocation::Query),
    ];

    let mut parameters = Vec::new();
    for (section, location) in sections {
        let Some(section) = section else { continue };
        let required = section.required();

        for (name, property) in section.properties().into_iter().flatten() {
            let property = match property {
                Value::Object(map) => Schema::from(map.clone()),
                _ => Schema::new(),
            };

            parameters.push(Parameter {
                name: name.clone(),
                location,
                description: property.description().map(str::to_string),
                required: required.contains(&name.as_str()),
                schema: resolve_reference(&property, &["description", "components"]),
            });
        }
    }

    parameters
}

/// The `requestBody` for a route's `body` schema, if it declares one.
pub fn parse_payload(schema: &RouteSchema) -> Option<RequestBody> {
    let body = schema.body.as_ref()?;

    let mut content = IndexMap::new();
    content.insert(
        JSON_MEDIA_TYPE.to_string(),
        MediaType {
            schema: Some(resolve_reference(body, &["description"])),
        },
    );

    Some(RequestBody {
        description: body.description().map(str::to_string),
        content,
    })
}

/// Build the `responses` map.
///
/// Hidden entries are skipped. A `raw` entry documents its media type with
/// no schema, an `empty` entry documents no content, anything else is an
/// `application/json` schema.
pub fn parse_responses(responses: Option<&BTreeMap<String, Schema>>) -> BTreeMap<String, Response> {
    let mut parsed = BTreeMap::new();

    for (code, original) in responses.into_iter().flatten() {
        if original.is_hidden() {
            continue;
        }

        let content = if let Some(raw) = original.raw() {
            let mut content = IndexMap::new();
            content.insert(raw.to_string(), MediaType::default());
            Some(content)
        } else if original.is_empty_response() {
            None
        } else {
            let mut content = IndexMap::new();
            content.insert(
                JSON_MEDIA_TYPE.to_string(),
                MediaType {
                    schema: Some(resolve_reference(
                        original,
                        &["description", "raw", "empty", "components", "hide"],
                    )),
                },
            );
            Some(content)
        };

        parsed.insert(
            code.clone(),
            Response {
                description: original.description().map(str::to_string),
                content,
            },
        );
    }

    parsed
}
