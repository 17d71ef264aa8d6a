//! Then steps for orchestration scenarios.

use super::world::{OrchestrationWorld, run_async};
use eyre::{WrapErr, ensure, eyre};
use rstest_bdd_macros::then;
use switchboard::error::Classify;
use switchboard::mcp_client::domain::McpClientError;

#[then(r#"the task belongs to agent "{agent_id}""#)]
fn task_belongs_to(world: &mut OrchestrationWorld, agent_id: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    ensure!(
        task.agent_id().as_str() == agent_id,
        "task assigned to {}, expected {agent_id}",
        task.agent_id()
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status(world: &mut OrchestrationWorld, status: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    ensure!(
        task.status().as_str() == status,
        "task is {}, expected {status}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task error mentions "{text}""#)]
fn task_error_mentions(world: &mut OrchestrationWorld, text: String) -> Result<(), eyre::Report> {
    let error = world
        .task()?
        .error()
        .ok_or_else(|| eyre!("task has no error"))?;
    ensure!(error.contains(&text), "task error {error:?} lacks {text:?}");
    Ok(())
}

#[then(r#"agent "{agent_id}" is "{status}""#)]
fn agent_status(
    world: &mut OrchestrationWorld,
    agent_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let context = world.context()?;
    let agent = run_async(context.orchestrator().agents().require(&agent_id))
        .wrap_err("look up agent")?;
    ensure!(
        agent.status().as_str() == status,
        "agent {agent_id} is {}, expected {status}",
        agent.status()
    );
    Ok(())
}

#[then(r#"the assignment fails as "{class}""#)]
fn assignment_fails(world: &mut OrchestrationWorld, class: String) -> Result<(), eyre::Report> {
    let error = world
        .assignment_error
        .as_ref()
        .ok_or_else(|| eyre!("assignment unexpectedly succeeded"))?;
    ensure!(
        error.classify().as_str() == class,
        "assignment failed as {}, expected {class}",
        error.classify()
    );
    Ok(())
}

#[then("the last connect reports an existing session")]
fn connect_reused_session(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_connect
        .ok_or_else(|| eyre!("no connect attempt recorded"))?;
    ensure!(outcome.already_connected(), "expected an existing session, got {outcome:?}");
    Ok(())
}

#[then(r#"the connector opened {count:usize} session for "{server}""#)]
fn sessions_opened(
    world: &mut OrchestrationWorld,
    count: usize,
    server: String,
) -> Result<(), eyre::Report> {
    let opened = world.connector.connect_count(&server);
    ensure!(opened == count, "opened {opened} sessions for {server}, expected {count}");
    Ok(())
}

fn call_error(world: &OrchestrationWorld) -> Result<&McpClientError, eyre::Report> {
    match world.last_call.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(value)) => Err(eyre!("call unexpectedly succeeded with {value}")),
        None => Err(eyre!("no call recorded")),
    }
}

#[then(r#"the call fails as "{class}""#)]
fn call_fails_as(world: &mut OrchestrationWorld, class: String) -> Result<(), eyre::Report> {
    let error = call_error(world)?;
    ensure!(
        error.classify().as_str() == class,
        "call failed as {}, expected {class}: {error}",
        error.classify()
    );
    Ok(())
}

#[then(r#"the call reports missing field "{field}""#)]
fn call_missing_field(world: &mut OrchestrationWorld, field: String) -> Result<(), eyre::Report> {
    match call_error(world)? {
        McpClientError::MissingRequiredField { field: missing, .. } if *missing == field => Ok(()),
        other => Err(eyre!("expected missing field {field}, got {other}")),
    }
}

#[then("no call reached the connector")]
fn no_calls_recorded(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    let calls = world.connector.calls();
    ensure!(calls.is_empty(), "unexpected calls: {calls:?}");
    Ok(())
}

#[then(r#"the connector recorded a "{tool}" call on "{server}""#)]
fn call_recorded(
    world: &mut OrchestrationWorld,
    tool: String,
    server: String,
) -> Result<(), eyre::Report> {
    let calls = world.connector.calls();
    ensure!(
        calls.iter().any(|call| call.tool == tool && call.server == server),
        "no {server}:{tool} call among {calls:?}"
    );
    Ok(())
}
