//! Discovered tool metadata.

use super::InputSchema;
use crate::tool_registry::domain::ServerDescriptor;
use serde::Serialize;
use serde_json::Value;

/// A tool advertised by a connected server.
///
/// The raw input schema is kept verbatim for listing; the parsed
/// [`InputSchema`] drives argument validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    id: String,
    server_id: String,
    name: String,
    description: String,
    category: String,
    input_schema: Value,
    #[serde(skip)]
    schema: InputSchema,
}

impl ToolDescriptor {
    /// Creates a descriptor for a tool exposed by `server`.
    ///
    /// The tool inherits the server's tool category.
    #[must_use]
    pub fn new(
        server: &ServerDescriptor,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        let tool_name = name.into();
        let server_id = server.name().as_str().to_owned();
        Self {
            id: format!("{server_id}:{tool_name}"),
            schema: InputSchema::from_value(&input_schema),
            server_id,
            name: tool_name,
            description: description.into(),
            category: server.tool_category().to_owned(),
            input_schema,
        }
    }

    /// Returns the `server:tool` identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owning server's name.
    #[must_use]
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the tool category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the raw input schema as advertised.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns the parsed input schema.
    #[must_use]
    pub const fn schema(&self) -> &InputSchema {
        &self.schema
    }
}
