//! Adapter implementations for MCP client ports.

pub mod http;
pub mod jsonrpc;
pub mod memory;
pub mod protocol;
pub mod stdio;
pub mod transport;

pub use http::HttpRpc;
pub use memory::{InMemoryMcpConnector, InMemorySession, RecordedCall};
pub use protocol::{PROTOCOL_VERSION, ProtocolSession, RpcTransport};
pub use stdio::StdioRpc;
pub use transport::{AnyTransport, TransportConnector};
