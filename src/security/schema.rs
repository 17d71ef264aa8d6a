//! Argument checks against a tool's declared input schema.

use crate::mcp_client::domain::{InputSchema, PropertyKind};
use serde_json::{Map, Value};

/// Outcome of checking call arguments against an input schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCheck {
    missing_fields: Vec<String>,
    mismatched_fields: Vec<(String, PropertyKind)>,
}

impl SchemaCheck {
    /// Returns whether the arguments satisfied every check.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.missing_fields.is_empty() && self.mismatched_fields.is_empty()
    }

    /// Returns required fields that were absent, in declared order.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        &self.missing_fields
    }

    /// Returns present fields whose value does not match the declared kind.
    #[must_use]
    pub fn mismatched_fields(&self) -> &[(String, PropertyKind)] {
        &self.mismatched_fields
    }
}

/// Pluggable argument validator.
///
/// Implementations must be pure: the tool-call path runs them before any
/// network I/O.
pub trait SchemaValidator: Send + Sync {
    /// Checks `args` against `schema`.
    fn check(&self, schema: &InputSchema, args: &Map<String, Value>) -> SchemaCheck;
}

/// Checks only that every required field is present and not `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceValidator;

impl SchemaValidator for PresenceValidator {
    fn check(&self, schema: &InputSchema, args: &Map<String, Value>) -> SchemaCheck {
        SchemaCheck {
            missing_fields: missing_fields(schema, args),
            mismatched_fields: Vec::new(),
        }
    }
}

/// Presence checks plus primitive-kind checks for declared properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedValidator;

impl SchemaValidator for TypedValidator {
    fn check(&self, schema: &InputSchema, args: &Map<String, Value>) -> SchemaCheck {
        let mismatched_fields = schema
            .properties()
            .iter()
            .filter_map(|(name, kind)| {
                let value = args.get(name)?;
                (!value.is_null() && !kind.matches(value)).then(|| (name.clone(), *kind))
            })
            .collect();

        SchemaCheck {
            missing_fields: missing_fields(schema, args),
            mismatched_fields,
        }
    }
}

fn missing_fields(schema: &InputSchema, args: &Map<String, Value>) -> Vec<String> {
    schema
        .required()
        .iter()
        .filter(|field| args.get(field.as_str()).is_none_or(Value::is_null))
        .cloned()
        .collect()
}
