//! Composition root shared by every request handler.

use crate::agent::adapters::memory::InMemoryAgentRoster;
use crate::agent::domain::Agent;
use crate::agent::ports::AgentRosterError;
use crate::config::AppConfig;
use crate::handoff::adapters::memory::InMemoryHandoffRepository;
use crate::handoff::services::HandoffService;
use crate::mcp_client::ports::McpConnector;
use crate::mcp_client::services::McpClient;
use crate::message::adapters::memory::InMemoryMessageRepository;
use crate::orchestrator::{Orchestrator, ToolCallExecutor};
use crate::security::SecurityGate;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::tool_registry::adapters::memory::InMemoryServerRegistry;
use crate::tool_registry::domain::ServerDescriptor;
use crate::tool_registry::ports::ServerRegistryError;
use crate::tool_registry::services::ToolRegistry;
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Orchestrator over the in-memory roster, task store, and message log.
pub type InMemoryOrchestrator = Orchestrator<
    InMemoryAgentRoster,
    InMemoryTaskRepository,
    InMemoryMessageRepository,
    DefaultClock,
>;

/// Handoff service over the in-memory store and roster.
pub type InMemoryHandoffService =
    HandoffService<InMemoryHandoffRepository, InMemoryAgentRoster, DefaultClock>;

/// Errors raised while assembling a [`ServiceContext`].
#[derive(Debug, Error)]
pub enum ContextError {
    /// The agent roster could not be built.
    #[error(transparent)]
    Agents(#[from] AgentRosterError),
    /// The server registry could not be built.
    #[error(transparent)]
    Servers(#[from] ServerRegistryError),
}

/// Policy and time limits applied by the services.
#[derive(Debug, Clone)]
pub struct ContextSettings {
    /// Demo-mode gate consulted before every tool call.
    pub gate: SecurityGate,
    /// Bound on connect handshakes and discovery.
    pub connect_timeout: Duration,
    /// Bound on each tool call.
    pub call_timeout: Duration,
}

/// Services built once at startup and shared by every request.
pub struct ServiceContext<C>
where
    C: McpConnector,
{
    orchestrator: Arc<InMemoryOrchestrator>,
    handoffs: InMemoryHandoffService,
    servers: ToolRegistry<InMemoryServerRegistry>,
    client: Arc<McpClient<C>>,
    executor: Arc<ToolCallExecutor<C>>,
    connect_timeout: Duration,
    call_timeout: Duration,
}

impl<C> ServiceContext<C>
where
    C: McpConnector + 'static,
{
    /// Builds the services from an explicit roster and server list.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when agent ids or server names repeat.
    pub fn new(
        agents: Vec<Agent>,
        servers: Vec<ServerDescriptor>,
        connector: Arc<C>,
        settings: ContextSettings,
    ) -> Result<Self, ContextError> {
        let roster = Arc::new(InMemoryAgentRoster::from_agents(agents)?);
        let registry = InMemoryServerRegistry::from_descriptors(servers)?;
        let client = Arc::new(McpClient::new(connector, settings.gate));
        let executor = Arc::new(ToolCallExecutor::new(
            Arc::clone(&client),
            settings.call_timeout,
        ));
        let clock = Arc::new(DefaultClock);
        let orchestrator = Orchestrator::new(
            Arc::clone(&roster),
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
            Arc::clone(&clock),
        );
        let handoffs =
            HandoffService::new(Arc::new(InMemoryHandoffRepository::new()), roster, clock);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            handoffs,
            servers: ToolRegistry::new(Arc::new(registry)),
            client,
            executor,
            connect_timeout: settings.connect_timeout,
            call_timeout: settings.call_timeout,
        })
    }

    /// Builds the services described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when agent ids or server names repeat.
    pub fn from_config(config: &AppConfig, connector: Arc<C>) -> Result<Self, ContextError> {
        Self::new(
            config.agents().to_vec(),
            config.servers().to_vec(),
            connector,
            ContextSettings {
                gate: config.security_gate(),
                connect_timeout: config.connect_timeout(),
                call_timeout: config.call_timeout(),
            },
        )
    }

    /// Returns the orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &Arc<InMemoryOrchestrator> {
        &self.orchestrator
    }

    /// Returns the handoff service.
    #[must_use]
    pub const fn handoffs(&self) -> &InMemoryHandoffService {
        &self.handoffs
    }

    /// Returns the configured tool servers.
    #[must_use]
    pub const fn servers(&self) -> &ToolRegistry<InMemoryServerRegistry> {
        &self.servers
    }

    /// Returns the MCP client.
    #[must_use]
    pub const fn client(&self) -> &Arc<McpClient<C>> {
        &self.client
    }

    /// Returns the executor that runs tasks as tool calls.
    #[must_use]
    pub const fn executor(&self) -> &Arc<ToolCallExecutor<C>> {
        &self.executor
    }

    /// Returns the bound on connect operations.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the bound on tool calls.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Closes every live tool-server session.
    pub async fn shutdown(&self) -> Vec<String> {
        let closed = self.client.disconnect_all().await;
        info!(servers = closed.len(), "closed tool-server sessions");
        closed
    }
}
