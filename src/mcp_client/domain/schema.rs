//! Structured view of a tool's JSON input schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Declared primitive kind of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON `null`.
    Null,
    /// No single primitive kind was declared.
    Any,
}

impl PropertyKind {
    /// Returns the canonical string form, matching JSON Schema type names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Any => "any",
        }
    }

    /// Reads the kind declared by a property schema.
    ///
    /// Absent, unknown, or union `type` declarations yield [`Self::Any`].
    #[must_use]
    pub fn from_property_schema(property: &Value) -> Self {
        match property.get("type").and_then(Value::as_str) {
            Some("string") => Self::String,
            Some("number") => Self::Number,
            Some("integer") => Self::Integer,
            Some("boolean") => Self::Boolean,
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            Some("null") => Self::Null,
            _ => Self::Any,
        }
    }

    /// Returns whether `value` has this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null(),
            Self::Any => true,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Required fields and declared property kinds of a tool's input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    required: Vec<String>,
    properties: BTreeMap<String, PropertyKind>,
}

impl InputSchema {
    /// Parses a raw JSON schema leniently.
    ///
    /// Servers publish schemas of varying quality, so anything that is not
    /// understood is ignored rather than rejected: a missing `properties`
    /// object yields no properties and non-string `required` entries are
    /// skipped. Duplicate `required` entries keep their first position.
    #[must_use]
    pub fn from_value(schema: &Value) -> Self {
        let mut required: Vec<String> = Vec::new();
        for field in schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
        {
            if !required.iter().any(|existing| existing == field) {
                required.push(field.to_owned());
            }
        }

        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, property)| {
                        (name.clone(), PropertyKind::from_property_schema(property))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            required,
            properties,
        }
    }

    /// Returns required field names in declared order.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Returns declared property kinds keyed by field name.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, PropertyKind> {
        &self.properties
    }

    /// Returns the declared kind of `field`, if the schema names it.
    #[must_use]
    pub fn kind_of(&self, field: &str) -> Option<PropertyKind> {
        self.properties.get(field).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn parses_required_order_and_kinds() {
        let schema = InputSchema::from_value(&json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "depth": {"type": "integer"},
                "filter": {"type": ["string", "null"]}
            },
            "required": ["path", "depth", "path"]
        }));

        assert_eq!(schema.required(), ["path", "depth"]);
        assert_eq!(schema.kind_of("path"), Some(PropertyKind::String));
        assert_eq!(schema.kind_of("depth"), Some(PropertyKind::Integer));
        assert_eq!(schema.kind_of("filter"), Some(PropertyKind::Any));
        assert_eq!(schema.kind_of("unknown"), None);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!(null))]
    #[case(json!({"required": "path", "properties": []}))]
    fn tolerates_malformed_schemas(#[case] raw: Value) {
        assert_eq!(InputSchema::from_value(&raw), InputSchema::default());
    }

    #[rstest]
    #[case(PropertyKind::Integer, json!(3), true)]
    #[case(PropertyKind::Integer, json!(3.5), false)]
    #[case(PropertyKind::Number, json!(3.5), true)]
    #[case(PropertyKind::String, json!(3), false)]
    #[case(PropertyKind::Any, json!({"a": 1}), true)]
    fn kind_matching(#[case] kind: PropertyKind, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(kind.matches(&value), expected);
    }
}
