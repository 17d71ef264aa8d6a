//! Tests for layered configuration resolution.

use crate::agent::domain::AgentStatus;
use crate::config::{
    AppConfig, BIND_ENV, CALL_TIMEOUT_ENV, CONNECT_TIMEOUT_ENV, ConfigError, DEFAULT_BIND,
    DEFAULT_TIMEOUT, DEMO_MODE_ENV,
};
use crate::tool_registry::domain::McpTransport;
use rstest::rstest;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"
[server]
bind = "0.0.0.0:8080"
demo_mode = true
connect_timeout_secs = 5
blocked_operations = ["fs:write_file"]

[[agents]]
id = "a1"
role = "planner"
display_name = "Planner"
capabilities = ["planning"]

[[agents]]
id = "a2"
role = "executor"
name = "Executor"
status = "offline"

[[mcp_servers]]
name = "fs"
transport = "stdio"
command = "npx"
args = ["-y", "@modelcontextprotocol/server-filesystem", "/srv"]
categories = ["files"]

[[mcp_servers]]
name = "search"
transport = "http"
url = "https://mcp.example.com/mcp"
enabled = false
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("temp file should be written");
    file
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    move |key| values.get(key).cloned()
}

#[rstest]
fn defaults_apply_without_file_or_environment() {
    let config = AppConfig::load(None, env(&[("HOME", "/home/ada")])).expect("defaults should load");

    assert_eq!(config.bind(), DEFAULT_BIND);
    assert!(!config.demo_mode());
    assert_eq!(config.connect_timeout(), DEFAULT_TIMEOUT);
    assert_eq!(config.call_timeout(), DEFAULT_TIMEOUT);
    let roles: Vec<&str> = config.agents().iter().map(|agent| agent.role()).collect();
    assert_eq!(
        roles,
        ["planner", "executor", "reviewer", "researcher", "coordinator"]
    );
    let names: Vec<&str> = config
        .servers()
        .iter()
        .map(|server| server.name().as_str())
        .collect();
    assert_eq!(
        names,
        ["filesystem", "git", "fetch", "github", "brave-search", "slack"]
    );
}

#[rstest]
fn file_sections_are_parsed() {
    let file = write_config(SAMPLE);

    let config = AppConfig::load(Some(file.path()), env(&[])).expect("file should load");

    assert_eq!(config.bind().to_string(), "0.0.0.0:8080");
    assert!(config.demo_mode());
    assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    assert_eq!(config.call_timeout(), DEFAULT_TIMEOUT);
    assert_eq!(config.security_gate().blocked_operations(), ["fs:write_file"]);

    let agents = config.agents();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents.first().map(|agent| agent.capabilities().len()), Some(1));
    assert_eq!(
        agents.get(1).map(|agent| (agent.display_name(), agent.status())),
        Some(("Executor", AgentStatus::Offline))
    );

    let servers = config.servers();
    assert_eq!(servers.len(), 2);
    let fs = servers.first().expect("fs server should be present");
    assert!(matches!(fs.transport(), McpTransport::Stdio(stdio) if stdio.args().len() == 3));
    assert_eq!(fs.tool_category(), "files");
    let search = servers.get(1).expect("search server should be present");
    assert!(matches!(search.transport(), McpTransport::Http(_)));
    assert!(!search.is_enabled());
}

#[rstest]
fn environment_overrides_file_values() {
    let file = write_config(SAMPLE);
    let lookup = env(&[
        (BIND_ENV, "127.0.0.1:9999"),
        (DEMO_MODE_ENV, "false"),
        (CONNECT_TIMEOUT_ENV, "12"),
        (CALL_TIMEOUT_ENV, "90"),
    ]);

    let config = AppConfig::load(Some(file.path()), lookup).expect("file should load");

    assert_eq!(config.bind().to_string(), "127.0.0.1:9999");
    assert!(!config.demo_mode());
    assert_eq!(config.connect_timeout(), Duration::from_secs(12));
    assert_eq!(config.call_timeout(), Duration::from_secs(90));
}

#[rstest]
#[case("true", true)]
#[case("TRUE", true)]
#[case("1", false)]
#[case("yes", false)]
fn demo_mode_requires_literal_true(#[case] value: &str, #[case] expected: bool) {
    let config = AppConfig::load(None, env(&[(DEMO_MODE_ENV, value)])).expect("defaults should load");
    assert_eq!(config.demo_mode(), expected);
    assert_eq!(config.security_gate().demo_mode(), expected);
}

#[rstest]
#[case(BIND_ENV, "not-an-address")]
#[case(CONNECT_TIMEOUT_ENV, "soon")]
#[case(CALL_TIMEOUT_ENV, "0")]
fn malformed_overrides_are_rejected(#[case] key: &str, #[case] value: &str) {
    let error = AppConfig::load(None, env(&[(key, value)])).expect_err("override should fail");
    assert!(matches!(error, ConfigError::InvalidValue { key: ref reported, .. } if reported == key));
}

#[rstest]
#[case("[[agents]]\nid = \"a1\"\nrole = \"\"\ndisplay_name = \"Nobody\"\n")]
#[case("[[agents]]\nid = \"a1\"\nrole = \"planner\"\ndisplay_name = \"P\"\nstatus = \"asleep\"\n")]
#[case("[[mcp_servers]]\nname = \"Bad Name\"\ntransport = \"http\"\nurl = \"http://x\"\n")]
#[case("[server]\nport = 3100\n")]
fn invalid_entries_fail_loading(#[case] contents: &str) {
    let file = write_config(contents);
    let result = AppConfig::load(Some(file.path()), env(&[]));
    assert!(result.is_err(), "expected failure for {contents:?}");
}

#[rstest]
fn missing_file_is_a_read_error() {
    let directory = tempfile::tempdir().expect("temp dir should be created");
    let path = directory.path().join("absent.toml");

    let error = AppConfig::load(Some(&path), env(&[])).expect_err("missing file should fail");

    assert!(matches!(error, ConfigError::Read { .. }));
}
