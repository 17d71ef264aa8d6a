//! Connection management, catalog, and tool invocation services.

mod catalog;
mod client;
mod connections;

pub use catalog::ToolCatalog;
pub use client::McpClient;
pub use connections::{ConnectAttempt, ConnectionManager};
