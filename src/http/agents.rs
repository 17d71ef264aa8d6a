//! Agent roster and task routes.

use super::ApiError;
use crate::agent::domain::Agent;
use crate::context::ServiceContext;
use crate::mcp_client::ports::McpConnector;
use crate::orchestrator::TOOL_ID_PARAMETER;
use crate::task::domain::Task;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
pub(super) struct AgentsResponse {
    agents: Vec<Agent>,
}

#[derive(Serialize)]
pub(super) struct TasksResponse {
    tasks: Vec<Task>,
}

#[derive(Serialize)]
pub(super) struct TaskResponse {
    task: Task,
}

#[derive(Debug, Deserialize)]
pub(super) struct TaskQuery {
    #[serde(default)]
    active: bool,
    agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssignTaskRequest {
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    parameters: Option<Map<String, Value>>,
}

// GET /api/agents
pub(super) async fn list_agents<C>(
    State(context): State<Arc<ServiceContext<C>>>,
) -> Result<Json<AgentsResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let agents = context.orchestrator().list_agents().await?;
    Ok(Json(AgentsResponse { agents }))
}

// GET /api/agents/tasks[?active=true][&agent=<id>]
pub(super) async fn list_tasks<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<TasksResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let orchestrator = context.orchestrator();
    let tasks = match (query.agent.as_deref(), query.active) {
        (Some(agent_id), active) => orchestrator
            .list_tasks_for_agent(agent_id)
            .await?
            .into_iter()
            .filter(|task| !active || task.status().is_active())
            .collect(),
        (None, true) => orchestrator.list_active_tasks().await?,
        (None, false) => orchestrator.list_tasks().await?,
    };
    Ok(Json(TasksResponse { tasks }))
}

// POST /api/agents/tasks {agent, task, parameters?}
pub(super) async fn assign_task<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<AssignTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let (Some(role), Some(description)) = (non_blank(request.agent), non_blank(request.task)) else {
        return Err(ApiError::bad_request(
            "Agent role and task description are required",
        ));
    };
    let parameters = request.parameters.unwrap_or_default();
    let runs_tool = parameters.contains_key(TOOL_ID_PARAMETER);

    let orchestrator = context.orchestrator();
    let task = orchestrator
        .resolve_role_and_assign(&role, description, parameters)
        .await?;

    if runs_tool {
        info!(task_id = %task.id(), "dispatching task to tool-call executor");
        drop(orchestrator.dispatch(task.id(), Arc::clone(context.executor())));
    }
    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
