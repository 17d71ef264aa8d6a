//! Handoff, handoff plan, and workflow routes.

use super::ApiError;
use super::agents::non_blank;
use crate::context::ServiceContext;
use crate::handoff::domain::{
    Handoff, HandoffId, HandoffPlan, HandoffStep, PlanId, WorkflowKind,
};
use crate::handoff::services::CreateHandoff;
use crate::mcp_client::ports::McpConnector;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct HandoffResponse {
    handoff: Handoff,
}

#[derive(Serialize)]
pub(super) struct HandoffsResponse {
    handoffs: Vec<Handoff>,
}

#[derive(Serialize)]
pub(super) struct PlanResponse {
    plan: HandoffPlan,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AdvanceResponse {
    plan: HandoffPlan,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_step: Option<HandoffStep>,
}

#[derive(Serialize)]
pub(super) struct WorkflowResponse {
    workflow: WorkflowKind,
    steps: Vec<HandoffStep>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AgentQuery {
    agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WorkflowQuery {
    task: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateHandoffRequest {
    #[serde(default)]
    from_agent: Option<String>,
    #[serde(default)]
    to_agent: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    instructions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatePlanRequest {
    #[serde(default)]
    steps: Option<Vec<HandoffStep>>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    context: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AdvancePlanRequest {
    #[serde(default)]
    output: Option<Value>,
}

fn handoff_id(raw: &str) -> Result<HandoffId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Handoff '{raw}' not found")))
}

fn plan_id(raw: &str) -> Result<PlanId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Handoff plan '{raw}' not found")))
}

// POST /api/agents/handoffs {fromAgent, toAgent, data?, instructions?}
pub(super) async fn create_handoff<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<CreateHandoffRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<HandoffResponse>), ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let (Some(from_agent), Some(to_agent)) =
        (non_blank(request.from_agent), non_blank(request.to_agent))
    else {
        return Err(ApiError::bad_request("Source and target agents are required"));
    };

    let handoff = context
        .handoffs()
        .create(CreateHandoff {
            from_agent,
            to_agent,
            data: request.data.unwrap_or(Value::Null),
            instructions: request.instructions,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(HandoffResponse { handoff })))
}

// GET /api/agents/handoffs?agent=<id>
pub(super) async fn pending_handoffs<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Query(query): Query<AgentQuery>,
) -> Result<Json<HandoffsResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let agent_id =
        non_blank(query.agent).ok_or_else(|| ApiError::bad_request("Agent id is required"))?;
    let handoffs = context.handoffs().pending_for_agent(&agent_id).await?;
    Ok(Json(HandoffsResponse { handoffs }))
}

// POST /api/agents/handoffs/:id/accept
pub(super) async fn accept_handoff<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<HandoffResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let handoff = context.handoffs().accept(handoff_id(&raw_id)?).await?;
    Ok(Json(HandoffResponse { handoff }))
}

// POST /api/agents/handoffs/:id/reject
pub(super) async fn reject_handoff<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<HandoffResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let handoff = context.handoffs().reject(handoff_id(&raw_id)?).await?;
    Ok(Json(HandoffResponse { handoff }))
}

// POST /api/agents/handoff-plans {steps? | task?, context?}
pub(super) async fn create_plan<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<CreatePlanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let initial = request.context.unwrap_or_default();
    let handoffs = context.handoffs();
    let plan = match (request.steps, non_blank(request.task)) {
        (Some(steps), _) => handoffs.create_plan(steps, initial).await?,
        (None, Some(task)) => handoffs.plan_for_task(&task, initial).await?,
        (None, None) => {
            return Err(ApiError::bad_request("Plan steps or a task description are required"));
        }
    };
    Ok((StatusCode::CREATED, Json(PlanResponse { plan })))
}

// POST /api/agents/handoff-plans/:id/advance {output?}
pub(super) async fn advance_plan<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AdvancePlanRequest>, JsonRejection>,
) -> Result<Json<AdvanceResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let (plan, progress) = context
        .handoffs()
        .advance_plan(plan_id(&raw_id)?, request.output.unwrap_or(Value::Null))
        .await?;
    Ok(Json(AdvanceResponse {
        plan,
        completed: progress.completed,
        next_step: progress.next_step,
    }))
}

// GET /api/agents/workflows?task=<description>
pub(super) async fn recommend_workflow(Query(query): Query<WorkflowQuery>) -> Json<WorkflowResponse> {
    let workflow = query
        .task
        .as_deref()
        .map_or(WorkflowKind::Standard, WorkflowKind::recommend);
    Json(WorkflowResponse {
        workflow,
        steps: workflow.steps(),
    })
}
