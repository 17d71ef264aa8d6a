//! Tool identifier format check.

use thiserror::Error;

/// Reasons a tool identifier is malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolIdFormatError {
    /// No `:` separator was found.
    #[error("tool id '{0}' must be in format server:tool")]
    MissingSeparator(String),
    /// The server or tool half is empty.
    #[error("tool id '{0}' has an empty server or tool name")]
    EmptyPart(String),
    /// More than one `:` separator was found.
    #[error("tool id '{0}' must contain exactly one ':'")]
    ExtraSeparator(String),
    /// Whitespace or control characters appear in the identifier.
    #[error("tool id '{0}' contains whitespace or control characters")]
    InvalidCharacter(String),
}

/// Splits `tool_id` into its server and tool halves.
///
/// The identifier must be exactly `"<server>:<tool>"` with both halves
/// non-empty and free of colons, whitespace, and control characters.
///
/// # Errors
///
/// Returns [`ToolIdFormatError`] describing the first problem found.
pub fn validate_tool_id_format(tool_id: &str) -> Result<(&str, &str), ToolIdFormatError> {
    let (server, tool) = tool_id
        .split_once(':')
        .ok_or_else(|| ToolIdFormatError::MissingSeparator(tool_id.to_owned()))?;

    if tool.contains(':') {
        return Err(ToolIdFormatError::ExtraSeparator(tool_id.to_owned()));
    }
    if server.is_empty() || tool.is_empty() {
        return Err(ToolIdFormatError::EmptyPart(tool_id.to_owned()));
    }
    if tool_id
        .chars()
        .any(|character| character.is_whitespace() || character.is_control())
    {
        return Err(ToolIdFormatError::InvalidCharacter(tool_id.to_owned()));
    }

    Ok((server, tool))
}
