//! Child-process transport speaking line-delimited JSON-RPC over stdio.

use super::jsonrpc::JsonRpcChannel;
use super::protocol::RpcTransport;
use crate::mcp_client::ports::{McpSessionError, McpSessionResult};
use crate::tool_registry::domain::StdioTransportConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Grace period between closing stdin and killing the child.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A spawned tool-server process and its JSON-RPC channel.
pub struct StdioRpc {
    server: String,
    channel: JsonRpcChannel,
    child: Mutex<Option<Child>>,
}

impl StdioRpc {
    /// Spawns the server process with piped stdio.
    ///
    /// The child is killed if this value is dropped without
    /// [`RpcTransport::shutdown`].
    ///
    /// # Errors
    ///
    /// Returns [`McpSessionError::Spawn`] when the process cannot be started.
    pub fn spawn(server: &str, config: &StdioTransportConfig) -> McpSessionResult<Self> {
        let mut command = Command::new(config.command());
        command
            .args(config.args())
            .envs(config.env())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = config.working_directory() {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(McpSessionError::spawn)?;
        let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_stderr(server.to_owned(), stderr));
        }

        info!(
            server = %server,
            command = %config.command(),
            pid = child.id().unwrap_or_default(),
            "spawned MCP server process"
        );

        Ok(Self {
            server: server.to_owned(),
            channel: JsonRpcChannel::start(server, stdout, stdin),
            child: Mutex::new(Some(child)),
        })
    }
}

fn missing_pipe(name: &str) -> McpSessionError {
    McpSessionError::spawn(std::io::Error::other(format!("child {name} was not piped")))
}

async fn forward_stderr(server: String, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => debug!(server = %server, stderr = %line, "MCP server stderr"),
            Ok(None) => break,
            Err(err) => {
                debug!(server = %server, error = %err, "stopped reading MCP server stderr");
                break;
            }
        }
    }
}

#[async_trait]
impl RpcTransport for StdioRpc {
    async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value> {
        self.channel.request(method, params).await
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()> {
        self.channel.notify(method, params).await
    }

    async fn shutdown(&self) -> McpSessionResult<()> {
        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };

        if let Err(err) = self.channel.close_input().await {
            debug!(server = %self.server, error = %err, "closing MCP server stdin failed");
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(server = %self.server, %status, "MCP server exited");
                Ok(())
            }
            Ok(Err(err)) => Err(McpSessionError::io(err)),
            Err(_) => {
                warn!(
                    server = %self.server,
                    grace_ms = SHUTDOWN_GRACE.as_millis(),
                    "MCP server ignored end of input; killing"
                );
                child.kill().await.map_err(McpSessionError::io)
            }
        }
    }
}
