//! Parsed `server:tool` identifier.

use crate::security::{ToolIdFormatError, validate_tool_id_format};
use std::fmt;

/// Address of a tool exposed by a connected server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolId {
    server: String,
    tool: String,
}

impl ToolId {
    /// Parses the `"<server>:<tool>"` wire format.
    ///
    /// # Errors
    ///
    /// Returns [`ToolIdFormatError`] when the identifier is malformed.
    pub fn parse(raw: &str) -> Result<Self, ToolIdFormatError> {
        let (server, tool) = validate_tool_id_format(raw)?;
        Ok(Self {
            server: server.to_owned(),
            tool: tool.to_owned(),
        })
    }

    /// Returns the server half.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Returns the tool half.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.server, self.tool)
    }
}
