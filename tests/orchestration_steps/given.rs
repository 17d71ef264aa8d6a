//! Given steps for orchestration scenarios.

use super::world::{OrchestrationWorld, connect};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use switchboard::agent::domain::{Agent, AgentId};
use switchboard::mcp_client::ports::DiscoveredTool;
use switchboard::tool_registry::domain::{
    McpServerName, McpTransport, ServerDescriptor, StdioTransportConfig,
};

#[given(r#"an agent "{id}" with role "{role}""#)]
fn agent_with_role(world: &mut OrchestrationWorld, id: String, role: String) -> Result<(), eyre::Report> {
    let agent_id = AgentId::new(id.as_str()).wrap_err("agent id")?;
    let agent = Agent::new(agent_id, role, id).wrap_err("agent")?;
    world.agents.push(agent);
    Ok(())
}

#[given(r#"a tool server "{server}" offering "{tool}" requiring "{field}""#)]
fn tool_server(
    world: &mut OrchestrationWorld,
    server: String,
    tool: String,
    field: String,
) -> Result<(), eyre::Report> {
    if !world
        .servers
        .iter()
        .any(|descriptor| descriptor.name().as_str() == server)
    {
        let name = McpServerName::new(server.as_str()).wrap_err("server name")?;
        world.servers.push(
            ServerDescriptor::new(
                name,
                McpTransport::Stdio(
                    StdioTransportConfig::new("npx").with_args(["-y", "fs-server"]),
                ),
            )
            .with_categories(["files"]),
        );
    }

    let schema = json!({
        "type": "object",
        "properties": {(field.as_str()): {"type": "string"}},
        "required": [field],
    });
    world
        .tools
        .push((server, DiscoveredTool::new(tool.as_str(), format!("{tool} tool"), schema)));
    Ok(())
}

#[given(r#"demo mode blocks "{operation}""#)]
fn demo_mode_blocks(world: &mut OrchestrationWorld, operation: String) {
    world.blocked.push(operation);
}

#[given(r#"server "{server}" has been connected"#)]
fn server_connected(world: &mut OrchestrationWorld, server: String) -> Result<(), eyre::Report> {
    connect(world, &server)
}
