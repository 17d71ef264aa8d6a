//! Domain model for MCP tool discovery and invocation.

mod connection;
mod error;
mod schema;
mod tool;
mod tool_id;

pub use connection::{ConnectOutcome, ConnectedServer, ConnectionState};
pub use error::{McpClientError, McpClientResult};
pub use schema::{InputSchema, PropertyKind};
pub use tool::ToolDescriptor;
pub use tool_id::ToolId;
