//! Orchestrator service: role resolution, assignment, task dispatch, and
//! agent messaging.

use super::error::OrchestratorResult;
use super::events::{EventBus, OrchestratorEvent};
use super::executor::TaskExecutor;
use crate::agent::domain::{Agent, AgentId, AgentStatus};
use crate::agent::ports::AgentRoster;
use crate::agent::services::AgentRegistry;
use crate::message::domain::AgentMessage;
use crate::message::ports::MessageRepository;
use crate::message::services::MessageLog;
use crate::task::domain::{Task, TaskId};
use crate::task::ports::TaskRepository;
use crate::task::services::TaskLifecycleService;
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Coordinates the agent roster, the task store, and the message log.
///
/// Agent status follows task activity: assignment marks an idle agent busy,
/// and the agent returns to idle once its last active task turns terminal.
/// Offline agents accept assignments but keep their status. Every assignment,
/// terminal transition, status change, and message is published as an
/// [`OrchestratorEvent`].
pub struct Orchestrator<A, T, M, C>
where
    A: AgentRoster,
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    agents: AgentRegistry<A>,
    tasks: TaskLifecycleService<T, C>,
    messages: MessageLog<M, C>,
    events: EventBus,
    availability: Mutex<()>,
}

impl<A, T, M, C> Orchestrator<A, T, M, C>
where
    A: AgentRoster,
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator over the given roster, task store, and
    /// message log.
    #[must_use]
    pub fn new(roster: Arc<A>, repository: Arc<T>, messages: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            agents: AgentRegistry::new(roster),
            tasks: TaskLifecycleService::new(repository, Arc::clone(&clock)),
            messages: MessageLog::new(messages, clock),
            events: EventBus::default(),
            availability: Mutex::new(()),
        }
    }

    /// Returns the agent registry service.
    #[must_use]
    pub const fn agents(&self) -> &AgentRegistry<A> {
        &self.agents
    }

    /// Subscribes to lifecycle events published from now on.
    ///
    /// Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    /// Returns every agent in roster order.
    ///
    /// # Errors
    ///
    /// Returns an error when the roster cannot be read.
    pub async fn list_agents(&self) -> OrchestratorResult<Vec<Agent>> {
        Ok(self.agents.list_all().await?)
    }

    /// Records a pending task for the agent with `agent_id`.
    ///
    /// The task is not executed; see [`Self::dispatch`].
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agent does not exist, or a
    /// validation error when the description is blank.
    pub async fn assign_task(
        &self,
        agent_id: &str,
        description: impl Into<String> + Send,
        parameters: Map<String, Value>,
    ) -> OrchestratorResult<Task> {
        let _availability = self.availability.lock().await;
        let agent = self.agents.require(agent_id).await?;
        let task = self
            .tasks
            .create(agent.id().clone(), description, parameters)
            .await?;

        info!(
            task_id = %task.id(),
            agent_id = %agent.id(),
            role = %agent.role(),
            "task assigned"
        );
        self.events.publish(OrchestratorEvent::TaskAssigned { task: task.clone() });
        if agent.status() == AgentStatus::Idle {
            self.change_status(agent.id(), AgentStatus::Busy).await?;
        }
        Ok(task)
    }

    /// Assigns a task to the first agent in roster order holding `role`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no agent has the role, plus the errors
    /// of [`Self::assign_task`].
    pub async fn resolve_role_and_assign(
        &self,
        role: &str,
        description: impl Into<String> + Send,
        parameters: Map<String, Value>,
    ) -> OrchestratorResult<Task> {
        let agent = self.agents.resolve_role(role).await?;
        debug!(role = %role, agent_id = %agent.id(), "resolved role");
        self.assign_task(agent.id().as_str(), description, parameters)
            .await
    }

    /// Returns every task in assignment order.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store cannot be read.
    pub async fn list_tasks(&self) -> OrchestratorResult<Vec<Task>> {
        Ok(self.tasks.list_all().await?)
    }

    /// Returns pending and running tasks in assignment order.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store cannot be read.
    pub async fn list_active_tasks(&self) -> OrchestratorResult<Vec<Task>> {
        Ok(self.tasks.list_active().await?)
    }

    /// Returns the tasks assigned to the agent with `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agent does not exist.
    pub async fn list_tasks_for_agent(&self, agent_id: &str) -> OrchestratorResult<Vec<Task>> {
        let agent = self.agents.require(agent_id).await?;
        Ok(self.tasks.list_for_agent(agent.id()).await?)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store cannot be read.
    pub async fn find_task(&self, task_id: TaskId) -> OrchestratorResult<Option<Task>> {
        Ok(self.tasks.find(task_id).await?)
    }

    /// Moves a pending task to running.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown tasks and an invalid-transition
    /// error unless the task is pending.
    pub async fn mark_running(&self, task_id: TaskId) -> OrchestratorResult<Task> {
        Ok(self.tasks.start(task_id).await?)
    }

    /// Completes a running task with `result` and releases its agent.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown tasks and an invalid-transition
    /// error unless the task is running.
    pub async fn mark_completed(&self, task_id: TaskId, result: Value) -> OrchestratorResult<Task> {
        let task = self.tasks.complete(task_id, result).await?;
        self.events.publish(OrchestratorEvent::TaskCompleted { task: task.clone() });
        self.release(task.agent_id()).await?;
        Ok(task)
    }

    /// Fails a running task with `error` and releases its agent.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown tasks and an invalid-transition
    /// error unless the task is running.
    pub async fn mark_failed(
        &self,
        task_id: TaskId,
        error: impl Into<String> + Send,
    ) -> OrchestratorResult<Task> {
        let task = self.tasks.fail(task_id, error.into()).await?;
        self.events.publish(OrchestratorEvent::TaskFailed { task: task.clone() });
        self.release(task.agent_id()).await?;
        Ok(task)
    }

    /// Records a message from `from` to `to` and announces it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when either agent does not exist, or a
    /// validation error when the content is blank.
    pub async fn send_message(
        &self,
        from: &str,
        to: &str,
        content: impl Into<String> + Send,
        metadata: Map<String, Value>,
    ) -> OrchestratorResult<AgentMessage> {
        let sender = self.agents.require(from).await?;
        let recipient = self.agents.require(to).await?;
        let message = self
            .messages
            .record(sender.id().clone(), recipient.id().clone(), content, metadata)
            .await?;
        info!(
            message_id = %message.id(),
            from = %sender.id(),
            to = %recipient.id(),
            "message sent"
        );
        self.events.publish(OrchestratorEvent::MessageSent {
            message: message.clone(),
        });
        Ok(message)
    }

    /// Returns every message in send order.
    ///
    /// # Errors
    ///
    /// Returns an error when the message log cannot be read.
    pub async fn list_messages(&self) -> OrchestratorResult<Vec<AgentMessage>> {
        Ok(self.messages.list_all().await?)
    }

    /// Returns the messages the agent with `agent_id` sent or received.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agent does not exist.
    pub async fn list_messages_for_agent(
        &self,
        agent_id: &str,
    ) -> OrchestratorResult<Vec<AgentMessage>> {
        let agent = self.agents.require(agent_id).await?;
        Ok(self.messages.list_for_agent(agent.id()).await?)
    }

    async fn change_status(
        &self,
        agent_id: &AgentId,
        status: AgentStatus,
    ) -> OrchestratorResult<()> {
        self.agents.set_status(agent_id, status).await?;
        self.events.publish(OrchestratorEvent::AgentStatusChanged {
            agent_id: agent_id.clone(),
            status,
        });
        Ok(())
    }

    async fn release(&self, agent_id: &AgentId) -> OrchestratorResult<()> {
        let _availability = self.availability.lock().await;
        let Some(agent) = self.agents.find_by_id(agent_id.as_str()).await? else {
            return Ok(());
        };
        if agent.status() != AgentStatus::Busy {
            return Ok(());
        }

        let still_active = self
            .tasks
            .list_for_agent(agent_id)
            .await?
            .iter()
            .any(|task| task.status().is_active());
        if !still_active {
            self.change_status(agent_id, AgentStatus::Idle).await?;
            debug!(agent_id = %agent_id, "agent returned to idle");
        }
        Ok(())
    }

    async fn execute<E>(&self, task_id: TaskId, executor: &E) -> OrchestratorResult<Task>
    where
        E: TaskExecutor + ?Sized,
    {
        let running = self.mark_running(task_id).await?;
        match executor.execute(&running).await {
            Ok(result) => {
                info!(task_id = %task_id, agent_id = %running.agent_id(), "task completed");
                self.mark_completed(task_id, result).await
            }
            Err(err) => {
                warn!(
                    task_id = %task_id,
                    agent_id = %running.agent_id(),
                    error = %err,
                    "task failed"
                );
                self.mark_failed(task_id, err.to_string()).await
            }
        }
    }
}

impl<A, T, M, C> Orchestrator<A, T, M, C>
where
    A: AgentRoster + 'static,
    T: TaskRepository + 'static,
    M: MessageRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Runs `task_id` on `executor` in the background.
    ///
    /// The spawned task marks the task running, awaits the executor, and
    /// records the outcome as completed or failed. The handle resolves to the
    /// terminal task, or to the error that stopped the run.
    pub fn dispatch<E>(
        self: &Arc<Self>,
        task_id: TaskId,
        executor: Arc<E>,
    ) -> JoinHandle<OrchestratorResult<Task>>
    where
        E: TaskExecutor + ?Sized + 'static,
    {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = orchestrator.execute(task_id, executor.as_ref()).await;
            if let Err(err) = &outcome {
                warn!(task_id = %task_id, error = %err, "task dispatch stopped");
            }
            outcome
        })
    }
}
