//! Resolved application settings.

use super::file::{AgentEntry, ConfigFile, McpServerEntry};
use super::{Cli, ConfigError};
use crate::agent::domain::{Agent, AgentId, AgentStatus, default_roster};
use crate::security::SecurityGate;
use crate::tool_registry::domain::{McpServerName, ServerDescriptor, default_servers};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default listen address.
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3100));

/// Default bound on connect and call operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Overrides the listen address.
pub const BIND_ENV: &str = "SWITCHBOARD_BIND";

/// `true` enables demo mode.
pub const DEMO_MODE_ENV: &str = "DEMO_MODE";

/// Overrides the connect timeout, in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "SWITCHBOARD_CONNECT_TIMEOUT_SECS";

/// Overrides the tool-call timeout, in seconds.
pub const CALL_TIMEOUT_ENV: &str = "SWITCHBOARD_CALL_TIMEOUT_SECS";

/// Settings the binary needs to build its services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    bind: SocketAddr,
    demo_mode: bool,
    connect_timeout: Duration,
    call_timeout: Duration,
    blocked_operations: Option<Vec<String>>,
    agents: Vec<Agent>,
    servers: Vec<ServerDescriptor>,
}

impl AppConfig {
    /// Loads settings from the optional file at `path`, then applies
    /// environment overrides resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when any setting is invalid.
    pub fn load(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(config_path) => {
                let raw = std::fs::read_to_string(config_path).map_err(|source| {
                    ConfigError::Read {
                        path: config_path.to_path_buf(),
                        source,
                    }
                })?;
                debug!(path = %config_path.display(), "loaded config file");
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                })?
            }
            None => ConfigFile::default(),
        };
        Self::resolve(file, &lookup)
    }

    fn resolve(
        file: ConfigFile,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let section = file.server;

        let bind_source = read(BIND_ENV)
            .map(|value| (BIND_ENV, value))
            .or_else(|| section.bind.map(|value| ("server.bind", value)));
        let bind = match bind_source {
            Some((key, value)) => value
                .trim()
                .parse()
                .map_err(|err| ConfigError::invalid_value(key, value.as_str(), err))?,
            None => DEFAULT_BIND,
        };

        let demo_mode = read(DEMO_MODE_ENV).map_or(section.demo_mode.unwrap_or(false), |value| {
            value.trim().eq_ignore_ascii_case("true")
        });

        let connect_timeout = timeout(
            read(CONNECT_TIMEOUT_ENV),
            CONNECT_TIMEOUT_ENV,
            section.connect_timeout_secs,
            "server.connect_timeout_secs",
        )?;
        let call_timeout = timeout(
            read(CALL_TIMEOUT_ENV),
            CALL_TIMEOUT_ENV,
            section.call_timeout_secs,
            "server.call_timeout_secs",
        )?;

        let agents = if file.agents.is_empty() {
            default_roster()?
        } else {
            file.agents
                .into_iter()
                .map(agent_from_entry)
                .collect::<Result<_, _>>()?
        };

        let servers = if file.mcp_servers.is_empty() {
            default_servers(lookup)
        } else {
            file.mcp_servers
                .into_iter()
                .map(server_from_entry)
                .collect::<Result<_, _>>()?
        };

        Ok(Self {
            bind,
            demo_mode,
            connect_timeout,
            call_timeout,
            blocked_operations: section.blocked_operations,
            agents,
            servers,
        })
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(bind) = cli.bind {
            self.bind = bind;
        }
        if cli.demo {
            self.demo_mode = true;
        }
        self
    }

    /// Returns the listen address.
    #[must_use]
    pub const fn bind(&self) -> SocketAddr {
        self.bind
    }

    /// Returns whether demo mode is on.
    #[must_use]
    pub const fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Returns the bound on connect handshakes and discovery.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the bound on tool calls.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Returns the configured agents.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Returns the configured tool servers.
    #[must_use]
    pub fn servers(&self) -> &[ServerDescriptor] {
        &self.servers
    }

    /// Builds the security gate for these settings.
    #[must_use]
    pub fn security_gate(&self) -> SecurityGate {
        let gate = SecurityGate::new(self.demo_mode);
        match &self.blocked_operations {
            Some(operations) => gate.with_blocked_operations(operations.iter().cloned()),
            None => gate,
        }
    }
}

fn timeout(
    env_value: Option<String>,
    env_key: &str,
    file_value: Option<u64>,
    file_key: &str,
) -> Result<Duration, ConfigError> {
    let (key, secs) = match (env_value, file_value) {
        (Some(raw), _) => {
            let parsed = raw
                .trim()
                .parse::<u64>()
                .map_err(|err| ConfigError::invalid_value(env_key, raw.as_str(), err))?;
            (env_key, parsed)
        }
        (None, Some(configured)) => (file_key, configured),
        (None, None) => return Ok(DEFAULT_TIMEOUT),
    };
    if secs == 0 {
        return Err(ConfigError::invalid_value(key, "0", "must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}

fn agent_from_entry(entry: AgentEntry) -> Result<Agent, ConfigError> {
    let id = AgentId::new(entry.id)?;
    let mut agent = Agent::new(id, entry.role, entry.display_name)?
        .with_capabilities(entry.capabilities);
    if let Some(description) = entry.description {
        agent = agent.with_description(description);
    }
    if let Some(raw_status) = entry.status {
        agent = agent.with_status(AgentStatus::try_from(raw_status.as_str())?);
    }
    Ok(agent)
}

fn server_from_entry(entry: McpServerEntry) -> Result<ServerDescriptor, ConfigError> {
    let name = McpServerName::new(entry.name)?;
    Ok(ServerDescriptor::new(name, entry.transport)
        .with_categories(entry.categories)
        .with_enabled(entry.enabled))
}
