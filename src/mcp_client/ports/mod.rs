//! Port contracts for MCP transports.

mod session;

pub use session::{DiscoveredTool, McpConnector, McpSession, McpSessionError, McpSessionResult};
