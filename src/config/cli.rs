//! Command-line arguments for the `switchboard` binary.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "SWITCHBOARD_CONFIG";

/// Agent orchestrator and MCP tool client.
#[derive(Debug, Parser)]
#[command(name = "switchboard", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Listen address; overrides configuration and `SWITCHBOARD_BIND`.
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Enable demo mode regardless of configuration.
    #[arg(long)]
    pub demo: bool,
}
