//! Tool-server descriptor.

use super::{McpServerName, McpTransport};
use serde::{Deserialize, Serialize};

/// Immutable description of a tool server known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    name: McpServerName,
    #[serde(flatten)]
    transport: McpTransport,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl ServerDescriptor {
    /// Creates an enabled descriptor with no category tags.
    #[must_use]
    pub const fn new(name: McpServerName, transport: McpTransport) -> Self {
        Self {
            name,
            transport,
            categories: Vec::new(),
            enabled: true,
        }
    }

    /// Replaces the category tags.
    #[must_use]
    pub fn with_categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the server name.
    #[must_use]
    pub const fn name(&self) -> &McpServerName {
        &self.name
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn transport(&self) -> &McpTransport {
        &self.transport
    }

    /// Returns the category tags.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns whether the server may be connected.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the category assigned to every tool this server exposes.
    ///
    /// This is the first category tag, or the server name when the server
    /// has no tags.
    #[must_use]
    pub fn tool_category(&self) -> &str {
        self.categories
            .first()
            .map_or_else(|| self.name.as_str(), String::as_str)
    }
}
