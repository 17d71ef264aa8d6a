//! Process configuration.
//!
//! Settings are layered, later layers winning: built-in defaults, an
//! optional TOML file, then environment variables. Environment access goes
//! through an injected lookup so callers decide whether it is the real
//! process environment (after `dotenvy` has loaded `.env`) or a fixture.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:3100"
//! demo_mode = true
//! connect_timeout_secs = 10
//! blocked_operations = ["fs:write_file"]
//!
//! [[agents]]
//! id = "a1"
//! role = "planner"
//! display_name = "Planner"
//!
//! [[mcp_servers]]
//! name = "fs"
//! transport = "stdio"
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-filesystem", "/srv"]
//! categories = ["files"]
//! ```

mod app;
mod cli;
mod error;
mod file;

pub use app::{
    AppConfig, BIND_ENV, CALL_TIMEOUT_ENV, CONNECT_TIMEOUT_ENV, DEFAULT_BIND, DEFAULT_TIMEOUT,
    DEMO_MODE_ENV,
};
pub use cli::{CONFIG_PATH_ENV, Cli};
pub use error::ConfigError;

#[cfg(test)]
mod tests;
