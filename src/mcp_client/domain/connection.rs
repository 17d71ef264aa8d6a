//! Connection state and summaries.

use serde::Serialize;
use std::fmt;

/// Lifecycle state of the connection slot for one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No live session.
    Disconnected,
    /// A handshake is in flight.
    Connecting,
    /// A live session is available for calls.
    Connected,
}

impl ConnectionState {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of a successful connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new session was opened and its catalog discovered.
    Connected {
        /// Number of tools discovered.
        tool_count: usize,
    },
    /// The server already had a live session; nothing was opened.
    AlreadyConnected,
}

impl ConnectOutcome {
    /// Returns whether the server was already connected.
    #[must_use]
    pub const fn already_connected(self) -> bool {
        matches!(self, Self::AlreadyConnected)
    }
}

/// Summary of one connected server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedServer {
    /// Server name.
    pub server_name: String,
    /// Category tags from the server descriptor.
    pub categories: Vec<String>,
    /// Number of tools in the server's catalog.
    pub tool_count: usize,
}
