//! On-disk TOML layout.

use crate::tool_registry::domain::McpTransport;
use serde::Deserialize;

/// Top-level file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub agents: Vec<AgentEntry>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServerEntry>,
}

/// `[server]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ServerSection {
    pub bind: Option<String>,
    pub demo_mode: Option<bool>,
    pub connect_timeout_secs: Option<u64>,
    pub call_timeout_secs: Option<u64>,
    pub blocked_operations: Option<Vec<String>>,
}

/// One `[[agents]]` entry.
#[derive(Debug, Deserialize)]
pub(super) struct AgentEntry {
    pub id: String,
    pub role: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One `[[mcp_servers]]` entry; transport fields sit beside the
/// `transport` discriminator.
#[derive(Debug, Deserialize)]
pub(super) struct McpServerEntry {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub transport: McpTransport,
}

const fn enabled_by_default() -> bool {
    true
}
