//! Shared fixtures for in-memory integration tests.

use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use switchboard::agent::domain::{Agent, AgentId};
use switchboard::context::{ContextSettings, ServiceContext};
use switchboard::mcp_client::adapters::InMemoryMcpConnector;
use switchboard::mcp_client::ports::DiscoveredTool;
use switchboard::security::SecurityGate;
use switchboard::tool_registry::domain::{
    McpServerName, McpTransport, ServerDescriptor, StdioTransportConfig,
};

pub type TestContext = ServiceContext<InMemoryMcpConnector>;

/// Builds an idle agent.
pub fn agent(id: &str, role: &str) -> Agent {
    let agent_id = AgentId::new(id).expect("valid agent id");
    Agent::new(agent_id, role, format!("Agent {id}")).expect("valid agent")
}

/// Builds a stdio server descriptor tagged `files`.
pub fn server(name: &str) -> ServerDescriptor {
    let server_name = McpServerName::new(name).expect("valid server name");
    ServerDescriptor::new(
        server_name,
        McpTransport::Stdio(StdioTransportConfig::new("npx").with_args(["-y", "fs-server"])),
    )
    .with_categories(["files"])
}

/// Builds a tool whose schema requires `required`.
pub fn tool(name: &str, required: &[&str]) -> DiscoveredTool {
    DiscoveredTool::new(
        name,
        format!("{name} tool"),
        json!({"type": "object", "required": required}),
    )
}

/// Connector scripting an `fs` server with `read_file` and `write_file`.
#[fixture]
pub fn connector() -> InMemoryMcpConnector {
    InMemoryMcpConnector::new().with_tools(
        "fs",
        [tool("read_file", &["path"]), tool("write_file", &["path", "content"])],
    )
}

/// Services over a planner, an executor, and the `fs` server.
#[fixture]
pub fn context(connector: InMemoryMcpConnector) -> Arc<TestContext> {
    build_context(connector, SecurityGate::new(false))
}

pub fn build_context(connector: InMemoryMcpConnector, gate: SecurityGate) -> Arc<TestContext> {
    let context = ServiceContext::new(
        vec![agent("a1", "planner"), agent("a2", "executor")],
        vec![server("fs")],
        Arc::new(connector),
        ContextSettings {
            gate,
            connect_timeout: Duration::from_secs(5),
            call_timeout: Duration::from_secs(5),
        },
    )
    .expect("context should build");
    Arc::new(context)
}

/// Connects `name` through the registry, as the HTTP surface does.
pub async fn connect(context: &TestContext, name: &str) {
    let descriptor = context
        .servers()
        .resolve_for_connect(name)
        .await
        .expect("server should resolve");
    context
        .client()
        .connect(&descriptor, &switchboard::deadline::Deadline::unbounded())
        .await
        .expect("connect should succeed");
}

/// Extracts the object map from a JSON literal.
pub fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
