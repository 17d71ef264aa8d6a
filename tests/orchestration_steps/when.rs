//! When steps for orchestration scenarios.

use super::world::{OrchestrationWorld, connect, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use switchboard::deadline::Deadline;
use switchboard::orchestrator::{ARGS_PARAMETER, TOOL_ID_PARAMETER};

#[when(r#"a "{role}" task "{description}" is assigned"#)]
fn assign_by_role(
    world: &mut OrchestrationWorld,
    role: String,
    description: String,
) -> Result<(), eyre::Report> {
    let context = world.context()?;
    match run_async(
        context
            .orchestrator()
            .resolve_role_and_assign(&role, description, Map::new()),
    ) {
        Ok(task) => world.task = Some(task),
        Err(err) => world.assignment_error = Some(err),
    }
    Ok(())
}

#[when(r#"server "{server}" is connected"#)]
fn connect_server(world: &mut OrchestrationWorld, server: String) -> Result<(), eyre::Report> {
    connect(world, &server)
}

#[when(r#"server "{server}" is connected again"#)]
fn reconnect_server(world: &mut OrchestrationWorld, server: String) -> Result<(), eyre::Report> {
    connect(world, &server)
}

#[when(r#"tool "{tool_id}" is called without arguments"#)]
fn call_without_arguments(world: &mut OrchestrationWorld, tool_id: String) -> Result<(), eyre::Report> {
    let context = world.context()?;
    let outcome = run_async(context.client().call_tool(
        &tool_id,
        Map::new(),
        &Deadline::after(context.call_timeout()),
    ));
    world.last_call = Some(outcome);
    Ok(())
}

#[when(r#"a "{role}" task calling "{tool_id}" with path "{path}" is dispatched"#)]
fn dispatch_with_path(
    world: &mut OrchestrationWorld,
    role: String,
    tool_id: String,
    path: String,
) -> Result<(), eyre::Report> {
    let mut parameters = Map::new();
    parameters.insert(TOOL_ID_PARAMETER.to_owned(), Value::String(tool_id));
    parameters.insert(ARGS_PARAMETER.to_owned(), json!({"path": path}));
    dispatch(world, &role, parameters)
}

#[when(r#"a "{role}" task calling "{tool_id}" without arguments is dispatched"#)]
fn dispatch_without_arguments(
    world: &mut OrchestrationWorld,
    role: String,
    tool_id: String,
) -> Result<(), eyre::Report> {
    let mut parameters = Map::new();
    parameters.insert(TOOL_ID_PARAMETER.to_owned(), Value::String(tool_id));
    dispatch(world, &role, parameters)
}

fn dispatch(
    world: &mut OrchestrationWorld,
    role: &str,
    parameters: Map<String, Value>,
) -> Result<(), eyre::Report> {
    let context = world.context()?;
    let orchestrator = context.orchestrator();
    let assigned = run_async(orchestrator.resolve_role_and_assign(role, "run tool", parameters))
        .wrap_err("assign tool task")?;

    let handle = orchestrator.dispatch(assigned.id(), Arc::clone(context.executor()));
    let finished = run_async(handle)
        .map_err(|err| eyre!("dispatch task panicked: {err}"))?
        .wrap_err("dispatch tool task")?;
    world.task = Some(finished);
    Ok(())
}
