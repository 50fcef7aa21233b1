use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON Schema fragment.
///
/// Any JSON Schema keywords are kept as-is. Two extension keys are understood
/// on top of them:
///
/// * `ref` / `$ref` - points at a named schema (`models/user` or a full `#/...` pointer)
/// * `hide` - excludes the owning route or response from the generated document
///
/// Response entries additionally understand `raw` (a media type whose body is
/// not JSON) and `empty` (no body at all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

/// JavaScript-style truthiness, used for the boolean-ish extension keys.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

impl Schema {
    pub fn new() -> Self {
        Schema(Map::new())
    }

    /// Wrap a JSON value; `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Schema(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// The `$ref` or `ref` pointer, `$ref` taking precedence.
    pub fn reference(&self) -> Option<&str> {
        self.str_field("$ref").or_else(|| self.str_field("ref"))
    }

    pub fn is_hidden(&self) -> bool {
        truthy(self.0.get("hide"))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    /// Media type of a raw (non-JSON) response.
    pub fn raw(&self) -> Option<&str> {
        self.str_field("raw")
    }

    /// Whether a response is declared without a body.
    pub fn is_empty_response(&self) -> bool {
        truthy(self.0.get("empty"))
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// Names listed under `required`.
    pub fn required(&self) -> Vec<&str> {
        self.0
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Shallow copy with the given top-level keys removed.
    pub fn without(&self, keys: &[&str]) -> Schema {
        Schema(
            self.0
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for Schema {
    fn from(map: Map<String, Value>) -> Self {
        Schema(map)
    }
}

impl From<Schema> for Value {
    fn from(schema: Schema) -> Self {
        schema.into_value()
    }
}
