//! Domain model for tool-server descriptors.
//!
//! Descriptors carry a validated server name, transport settings, category
//! tags, and an enabled flag. Transport settings are accepted as written and
//! checked by [`validate_server_config`] so that a misconfigured server can
//! be listed and diagnosed instead of failing startup.

mod defaults;
mod error;
mod ids;
mod server;
mod transport;
mod validation;

pub use defaults::default_servers;
pub use error::ToolRegistryDomainError;
pub use ids::McpServerName;
pub use server::ServerDescriptor;
pub use transport::{HttpTransportConfig, McpTransport, StdioTransportConfig};
pub use validation::{ConfigValidation, validate_server_config};
