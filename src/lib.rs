//! Switchboard: agent orchestration over Model Context Protocol tool servers.
//!
//! The crate coordinates a fixed roster of named agents that perform tasks by
//! invoking tools exposed by independently running MCP servers. Tools are
//! addressed as `server:tool`.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores,
//!   stdio and HTTP transports)
//!
//! # Modules
//!
//! - [`agent`]: Agent roster and role resolution
//! - [`task`]: Task records and their lifecycle
//! - [`orchestrator`]: Assignment, agent availability, task dispatch,
//!   messaging, and lifecycle events
//! - [`message`]: Agent-to-agent message log
//! - [`handoff`]: Handoffs between agents and multi-step handoff plans
//! - [`tool_registry`]: Configured tool servers and their validation
//! - [`mcp_client`]: Connections, tool discovery, and validated tool calls
//! - [`security`]: Demo-mode blocklist and argument validation
//! - [`http`]: JSON API over the services
//! - [`config`], [`telemetry`], [`deadline`], [`error`]: ambient support

pub mod agent;
pub mod config;
pub mod context;
pub mod deadline;
pub mod error;
pub mod handoff;
pub mod http;
pub mod mcp_client;
pub mod message;
pub mod orchestrator;
pub mod security;
pub mod task;
pub mod telemetry;
pub mod tool_registry;
