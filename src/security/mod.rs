//! Safety checks applied before a tool call leaves the process.
//!
//! - [`SecurityGate`] enforces the demo-mode operation blocklist.
//! - [`validate_tool_id_format`] checks the `server:tool` wire format.
//! - [`SchemaValidator`] implementations check call arguments against a
//!   tool's declared input schema.

mod gate;
mod schema;
mod tool_id;

pub use gate::{DEFAULT_BLOCKED_OPERATIONS, SecurityGate};
pub use schema::{PresenceValidator, SchemaCheck, SchemaValidator, TypedValidator};
pub use tool_id::{ToolIdFormatError, validate_tool_id_format};
