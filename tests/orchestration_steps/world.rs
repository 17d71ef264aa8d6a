//! World state for orchestration scenarios.

use eyre::{WrapErr, eyre};
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use switchboard::agent::domain::Agent;
use switchboard::context::{ContextSettings, ServiceContext};
use switchboard::deadline::Deadline;
use switchboard::mcp_client::adapters::InMemoryMcpConnector;
use switchboard::mcp_client::domain::{ConnectOutcome, McpClientError};
use switchboard::mcp_client::ports::DiscoveredTool;
use switchboard::orchestrator::OrchestratorError;
use switchboard::security::SecurityGate;
use switchboard::task::domain::Task;
use switchboard::tool_registry::domain::ServerDescriptor;

pub type TestContext = ServiceContext<InMemoryMcpConnector>;

/// Scenario state. The service context is assembled on first use so that
/// `Given` steps can shape the roster, servers, and gate beforehand.
#[derive(Default)]
pub struct OrchestrationWorld {
    pub connector: InMemoryMcpConnector,
    pub agents: Vec<Agent>,
    pub servers: Vec<ServerDescriptor>,
    pub tools: Vec<(String, DiscoveredTool)>,
    pub blocked: Vec<String>,
    pub context: Option<Arc<TestContext>>,
    pub task: Option<Task>,
    pub assignment_error: Option<OrchestratorError>,
    pub last_connect: Option<ConnectOutcome>,
    pub last_call: Option<Result<Value, McpClientError>>,
}

impl OrchestrationWorld {
    /// Returns the service context, building it on first use.
    pub fn context(&mut self) -> Result<Arc<TestContext>, eyre::Report> {
        if let Some(existing) = &self.context {
            return Ok(Arc::clone(existing));
        }

        let mut connector = self.connector.clone();
        for server in &self.servers {
            let name = server.name().as_str();
            let catalog: Vec<DiscoveredTool> = self
                .tools
                .iter()
                .filter(|(owner, _)| owner == name)
                .map(|(_, tool)| tool.clone())
                .collect();
            connector = connector.with_tools(name, catalog);
        }

        let gate = if self.blocked.is_empty() {
            SecurityGate::new(false)
        } else {
            SecurityGate::new(true).with_blocked_operations(self.blocked.iter().cloned())
        };
        let built = ServiceContext::new(
            self.agents.clone(),
            self.servers.clone(),
            Arc::new(connector),
            ContextSettings {
                gate,
                connect_timeout: Duration::from_secs(5),
                call_timeout: Duration::from_secs(5),
            },
        )
        .wrap_err("build service context")?;

        let shared = Arc::new(built);
        self.context = Some(Arc::clone(&shared));
        Ok(shared)
    }

    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task.as_ref().ok_or_else(|| eyre!("no task recorded"))
    }
}

#[fixture]
pub fn world() -> OrchestrationWorld {
    OrchestrationWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Connects `server` through the registry and client, recording the outcome.
pub fn connect(world: &mut OrchestrationWorld, server: &str) -> Result<(), eyre::Report> {
    let context = world.context()?;
    let descriptor = run_async(context.servers().resolve_for_connect(server))
        .wrap_err_with(|| format!("resolve server {server}"))?;
    let outcome = run_async(
        context
            .client()
            .connect(&descriptor, &Deadline::after(context.connect_timeout())),
    )
    .wrap_err_with(|| format!("connect server {server}"))?;
    world.last_connect = Some(outcome);
    Ok(())
}
