//! Configuration loading errors.

use crate::agent::domain::{AgentDomainError, ParseAgentStatusError};
use crate::tool_registry::domain::ToolRegistryDomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling [`super::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected layout.
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A setting has a value that cannot be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An `[[agents]]` entry is malformed.
    #[error(transparent)]
    Agent(#[from] AgentDomainError),

    /// An `[[agents]]` entry names an unknown status.
    #[error(transparent)]
    AgentStatus(#[from] ParseAgentStatusError),

    /// An `[[mcp_servers]]` entry has a malformed name.
    #[error(transparent)]
    Server(#[from] ToolRegistryDomainError),
}

impl ConfigError {
    pub(super) fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
