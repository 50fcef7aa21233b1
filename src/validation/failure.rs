use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The constraint a [`ValidationFailure`] reports as broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Required,
    Dependencies,
    AdditionalProperties,
    MinProperties,
    Type,
    Minimum,
    Maximum,
    Number,
    Enum,
    Pattern,
    Format,
    /// Any keyword the translator has no message for.
    Unknown,
}

impl Keyword {
    pub fn from_name(name: &str) -> Self {
        match name {
            "required" => Keyword::Required,
            "dependencies" => Keyword::Dependencies,
            "additionalProperties" => Keyword::AdditionalProperties,
            "minProperties" => Keyword::MinProperties,
            "type" => Keyword::Type,
            "minimum" => Keyword::Minimum,
            "maximum" => Keyword::Maximum,
            "number" => Keyword::Number,
            "enum" => Keyword::Enum,
            "pattern" => Keyword::Pattern,
            "format" => Keyword::Format,
            _ => Keyword::Unknown,
        }
    }
}

/// One broken constraint, as reported by an external JSON Schema validator.
///
/// The serialized shape is the common validator record:
///
/// ```json
/// { "keyword": "required", "dataPath": ".user", "params": { "missingProperty": "name" } }
/// ```
///
/// `instancePath` is accepted as an alias of `dataPath`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub keyword: String,
    #[serde(default, alias = "instancePath")]
    pub data_path: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationFailure {
    pub fn new(keyword: impl Into<String>, data_path: impl Into<String>, params: Value) -> Self {
        ValidationFailure {
            keyword: keyword.into(),
            data_path: data_path.into(),
            params,
            message: None,
        }
    }

    /// Attach the validator's own message (used as a fallback for `pattern`).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn keyword(&self) -> Keyword {
        Keyword::from_name(&self.keyword)
    }

    /// The failing field as a dotted path.
    ///
    /// A leading `.` is dropped; JSON pointers (`/items/0/name`) are
    /// converted to `items.0.name`.
    pub fn field_path(&self) -> String {
        if let Some(pointer) = self.data_path.strip_prefix('/') {
            return pointer
                .split('/')
                .map(|token| token.replace("~1", "/").replace("~0", "~"))
                .collect::<Vec<_>>()
                .join(".");
        }

        self.data_path
            .strip_prefix('.')
            .unwrap_or(&self.data_path)
            .to_string()
    }

    fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    pub fn missing_property(&self) -> Option<&str> {
        self.param_str("missingProperty")
    }

    pub fn additional_property(&self) -> Option<&str> {
        self.param_str("additionalProperty")
    }

    pub fn type_name(&self) -> Option<&str> {
        self.param_str("type")
    }

    pub fn pattern(&self) -> Option<&str> {
        self.param_str("pattern")
    }

    pub fn format(&self) -> Option<&str> {
        self.param_str("format")
    }

    pub fn limit(&self) -> Option<&Value> {
        self.params.get("limit")
    }

    pub fn allowed_values(&self) -> Option<&Value> {
        self.params.get("allowedValues")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_path_forms() {
        let dotted = ValidationFailure::new("type", ".user.name", json!({}));
        assert_eq!(dotted.field_path(), "user.name");

        let pointer = ValidationFailure::new("type", "/items/0/a~1b", json!({}));
        assert_eq!(pointer.field_path(), "items.0.a/b");

        let root = ValidationFailure::new("required", "", json!({}));
        assert_eq!(root.field_path(), "");
    }

    #[test]
    fn test_deserialize_validator_record() {
        let failure: ValidationFailure = serde_json::from_value(json!({
            "keyword": "required",
            "instancePath": "/user",
            "params": { "missingProperty": "name" },
            "message": "should have required property 'name'"
        }))
        .unwrap();

        assert_eq!(failure.keyword(), Keyword::Required);
        assert_eq!(failure.field_path(), "user");
        assert_eq!(failure.missing_property(), Some("name"));
    }
}
