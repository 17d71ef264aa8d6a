//! MCP server transport configuration value objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transport settings for an MCP server hosted over STDIO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioTransportConfig {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default, alias = "cwd")]
    working_directory: Option<String>,
}

impl StdioTransportConfig {
    /// Creates a new STDIO transport configuration.
    ///
    /// The command is trimmed but otherwise accepted as written; see
    /// [`super::validate_server_config`] for the checks applied before use.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into().trim().to_owned(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_directory: None,
        }
    }

    /// Replaces command-line arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = values.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces process environment variables.
    #[must_use]
    pub fn with_env(mut self, values: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env = values.into_iter().collect();
        self
    }

    /// Sets an explicit working directory.
    #[must_use]
    pub fn with_working_directory(mut self, value: impl Into<String>) -> Self {
        self.working_directory = Some(value.into().trim().to_owned());
        self
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns command-line arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns environment variables.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the optional working directory.
    #[must_use]
    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }
}

/// Transport settings for an MCP server reachable over streamable HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    url: String,
}

impl HttpTransportConfig {
    /// Creates a new HTTP transport configuration.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_owned(),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Supported MCP transport configuration variants.
///
/// In configuration files the variant is selected by a `transport` key next
/// to the variant's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "transport")]
pub enum McpTransport {
    /// MCP over local process STDIO.
    Stdio(StdioTransportConfig),
    /// MCP over streamable HTTP.
    Http(HttpTransportConfig),
}

impl McpTransport {
    /// Creates a `stdio` transport.
    #[must_use]
    pub fn stdio(command: impl Into<String>) -> Self {
        Self::Stdio(StdioTransportConfig::new(command))
    }

    /// Creates an `http` transport.
    #[must_use]
    pub fn http(url: impl Into<String>) -> Self {
        Self::Http(HttpTransportConfig::new(url))
    }

    /// Returns the canonical transport kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stdio(_) => "stdio",
            Self::Http(_) => "http",
        }
    }
}
