//! Integration tests for assembling services from configuration.

use super::helpers::{agent, build_context, connect, connector, server};
use rstest::rstest;
use std::io::Write;
use std::sync::Arc;
use switchboard::config::AppConfig;
use switchboard::context::{ContextError, ContextSettings, ServiceContext};
use switchboard::mcp_client::adapters::InMemoryMcpConnector;
use switchboard::security::SecurityGate;
use switchboard::tool_registry::services::ToolRegistryServiceError;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[server]
demo_mode = true
blocked_operations = ["fs:write_file"]

[[agents]]
id = "lead"
role = "planner"
display_name = "Lead Planner"

[[agents]]
id = "runner"
role = "executor"
display_name = "Runner"

[[mcp_servers]]
name = "fs"
transport = "stdio"
command = "npx"
categories = ["files"]

[[mcp_servers]]
name = "remote"
transport = "http"
url = "http://127.0.0.1:9/mcp"
enabled = false
"#;

fn load(contents: &str) -> AppConfig {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("temp file should be written");
    AppConfig::load(Some(file.path()), |_| None).expect("config should load")
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_roster_and_servers_reach_the_services() {
    let config = load(CONFIG);
    let context = ServiceContext::from_config(&config, Arc::new(InMemoryMcpConnector::new()))
        .expect("context should build");

    let agents = context
        .orchestrator()
        .list_agents()
        .await
        .expect("agents should list");
    let ids: Vec<&str> = agents.iter().map(|each| each.id().as_str()).collect();
    assert_eq!(ids, ["lead", "runner"]);

    let servers = context
        .servers()
        .list_servers()
        .await
        .expect("servers should list");
    let names: Vec<&str> = servers.iter().map(|each| each.name().as_str()).collect();
    assert_eq!(names, ["fs", "remote"]);

    let gate = context.client().security_gate();
    assert!(gate.demo_mode());
    assert!(gate.is_blocked("fs:write_file"));
    assert!(!gate.is_blocked("filesystem:delete_file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn disabled_server_is_refused_before_connecting() {
    let config = load(CONFIG);
    let connector = InMemoryMcpConnector::new();
    let context = ServiceContext::from_config(&config, Arc::new(connector.clone()))
        .expect("context should build");

    let result = context.servers().resolve_for_connect("remote").await;

    assert!(matches!(
        result,
        Err(ToolRegistryServiceError::InvalidServerConfig { .. })
    ));
    assert_eq!(connector.connect_count("remote"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_configuration_uses_builtin_defaults() {
    let config = AppConfig::load(None, |_| None).expect("defaults should load");
    let context = ServiceContext::from_config(&config, Arc::new(InMemoryMcpConnector::new()))
        .expect("context should build");

    let planner = context
        .orchestrator()
        .agents()
        .resolve_role("planner")
        .await
        .expect("default planner should exist");
    assert_eq!(planner.id().as_str(), "agent-planner");

    let fetch = context
        .servers()
        .get_server_by_name("fetch")
        .await
        .expect("lookup should succeed")
        .expect("fetch should be configured");
    assert!(!fetch.is_enabled());
    assert!(!context.client().security_gate().demo_mode());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_closes_every_live_session(connector: InMemoryMcpConnector) {
    let context = build_context(connector.clone(), SecurityGate::new(false));
    connect(&context, "fs").await;
    assert!(context.client().is_connected("fs"));

    let closed = context.shutdown().await;

    assert_eq!(closed, ["fs"]);
    assert_eq!(connector.close_count("fs"), 1);
    assert!(!context.client().is_connected("fs"));
    assert!(context.client().list_tools().is_empty());
}

#[test]
fn duplicate_agent_ids_are_rejected() {
    let result = ServiceContext::new(
        vec![agent("a1", "planner"), agent("a1", "reviewer")],
        vec![server("fs")],
        Arc::new(InMemoryMcpConnector::new()),
        ContextSettings {
            gate: SecurityGate::new(false),
            connect_timeout: std::time::Duration::from_secs(1),
            call_timeout: std::time::Duration::from_secs(1),
        },
    );

    assert!(matches!(result, Err(ContextError::Agents(_))));
}
