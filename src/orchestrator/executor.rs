//! Task execution port and the MCP tool-call executor.

use crate::deadline::Deadline;
use crate::mcp_client::domain::McpClientError;
use crate::mcp_client::ports::McpConnector;
use crate::mcp_client::services::McpClient;
use crate::task::domain::Task;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Task parameter naming the tool to invoke.
pub const TOOL_ID_PARAMETER: &str = "toolId";

/// Task parameter carrying the tool arguments.
pub const ARGS_PARAMETER: &str = "args";

/// Reasons a task execution failed.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    /// A required task parameter is absent.
    #[error("task parameter '{0}' is required")]
    MissingParameter(&'static str),

    /// A task parameter has the wrong JSON type.
    #[error("task parameter '{name}' must be {expected}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// The tool call failed.
    #[error(transparent)]
    ToolCall(#[from] McpClientError),

    /// Executor-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Runs the work a task describes and produces its result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Executes `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutionError`] when the work fails; the orchestrator
    /// records its message on the task.
    async fn execute(&self, task: &Task) -> Result<Value, TaskExecutionError>;
}

/// Executor that invokes the tool named by the task's `toolId` parameter
/// with the task's `args` parameter.
pub struct ToolCallExecutor<C>
where
    C: McpConnector,
{
    client: Arc<McpClient<C>>,
    call_timeout: Duration,
}

impl<C> ToolCallExecutor<C>
where
    C: McpConnector,
{
    /// Creates an executor bounding each call by `call_timeout`.
    #[must_use]
    pub const fn new(client: Arc<McpClient<C>>, call_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
        }
    }
}

#[async_trait]
impl<C> TaskExecutor for ToolCallExecutor<C>
where
    C: McpConnector,
{
    async fn execute(&self, task: &Task) -> Result<Value, TaskExecutionError> {
        let parameters = task.parameters();
        let tool_id = match parameters.get(TOOL_ID_PARAMETER) {
            Some(Value::String(tool_id)) => tool_id.as_str(),
            Some(_) => {
                return Err(TaskExecutionError::InvalidParameter {
                    name: TOOL_ID_PARAMETER,
                    expected: "a string",
                });
            }
            None => return Err(TaskExecutionError::MissingParameter(TOOL_ID_PARAMETER)),
        };
        let arguments = match parameters.get(ARGS_PARAMETER) {
            Some(Value::Object(arguments)) => arguments.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(_) => {
                return Err(TaskExecutionError::InvalidParameter {
                    name: ARGS_PARAMETER,
                    expected: "an object",
                });
            }
        };

        debug!(task_id = %task.id(), tool_id = %tool_id, "executing task as tool call");
        let deadline = Deadline::after(self.call_timeout);
        Ok(self.client.call_tool(tool_id, arguments, &deadline).await?)
    }
}
