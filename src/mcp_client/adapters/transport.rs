//! Connector selecting the transport from a server descriptor.

use super::http::HttpRpc;
use super::protocol::{ProtocolSession, RpcTransport};
use super::stdio::StdioRpc;
use crate::mcp_client::ports::{McpConnector, McpSessionResult};
use crate::tool_registry::domain::{McpTransport, ServerDescriptor};
use async_trait::async_trait;
use serde_json::Value;

/// Either supported transport.
pub enum AnyTransport {
    /// Spawned child process.
    Stdio(StdioRpc),
    /// Remote HTTP endpoint.
    Http(HttpRpc),
}

#[async_trait]
impl RpcTransport for AnyTransport {
    async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value> {
        match self {
            Self::Stdio(transport) => transport.request(method, params).await,
            Self::Http(transport) => transport.request(method, params).await,
        }
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()> {
        match self {
            Self::Stdio(transport) => transport.notify(method, params).await,
            Self::Http(transport) => transport.notify(method, params).await,
        }
    }

    async fn shutdown(&self) -> McpSessionResult<()> {
        match self {
            Self::Stdio(transport) => transport.shutdown().await,
            Self::Http(transport) => transport.shutdown().await,
        }
    }
}

/// Production connector for stdio and HTTP tool servers.
#[derive(Debug, Clone, Default)]
pub struct TransportConnector {
    http: reqwest::Client,
}

impl TransportConnector {
    /// Creates a connector with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the HTTP client used for remote servers.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }
}

#[async_trait]
impl McpConnector for TransportConnector {
    type Session = ProtocolSession<AnyTransport>;

    async fn connect(&self, server: &ServerDescriptor) -> McpSessionResult<Self::Session> {
        let name = server.name().as_str();
        let transport = match server.transport() {
            McpTransport::Stdio(config) => AnyTransport::Stdio(StdioRpc::spawn(name, config)?),
            McpTransport::Http(config) => {
                AnyTransport::Http(HttpRpc::new(name, config.url(), self.http.clone()))
            }
        };
        ProtocolSession::initialize(name, transport).await
    }
}
