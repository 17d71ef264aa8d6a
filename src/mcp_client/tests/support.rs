//! Shared builders for MCP client tests.

use crate::mcp_client::adapters::InMemoryMcpConnector;
use crate::mcp_client::ports::DiscoveredTool;
use crate::tool_registry::domain::{McpServerName, McpTransport, ServerDescriptor};
use serde_json::{Map, Value, json};

pub(super) fn server(raw_name: &str) -> ServerDescriptor {
    let name = McpServerName::new(raw_name).expect("valid server name");
    ServerDescriptor::new(name, McpTransport::stdio("npx")).with_categories(["files"])
}

pub(super) fn tool(name: &str, required: &[&str]) -> DiscoveredTool {
    DiscoveredTool::new(
        name,
        format!("{name} tool"),
        json!({"type": "object", "required": required}),
    )
}

/// Connector scripting an `fs` server with `read_file` and `write_file`.
pub(super) fn fs_connector() -> InMemoryMcpConnector {
    InMemoryMcpConnector::new()
        .with_tools(
            "fs",
            [tool("read_file", &["path"]), tool("write_file", &["path", "content"])],
        )
        .with_tools("git", [tool("status", &[])])
}

pub(super) fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
