//! Service layer for task creation, lookup, and guarded transitions.

use crate::agent::domain::AgentId;
use crate::error::{Classify, ErrorClass};
use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// No task has the requested identifier.
    #[error("Task '{0}' not found")]
    NotFound(TaskId),
}

impl Classify for TaskLifecycleError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Domain(TaskDomainError::InvalidStateTransition { .. })
            | Self::Repository(TaskRepositoryError::Conflict { .. }) => {
                ErrorClass::InvalidStateTransition
            }
            Self::Domain(_) => ErrorClass::Validation,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorClass::NotFound
            }
            Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and stores a pending task for `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the description is blank
    /// or [`TaskLifecycleError::Repository`] when storage fails.
    pub async fn create(
        &self,
        agent_id: AgentId,
        description: impl Into<String> + Send,
        parameters: Map<String, Value>,
    ) -> TaskLifecycleResult<Task> {
        let task = Task::new(agent_id, description, parameters, &*self.clock)?;
        self.repository.store(&task).await?;
        debug!(task_id = %task.id(), agent_id = %task.agent_id(), "stored pending task");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Returns the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when it does not exist.
    pub async fn require(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.find(id).await?.ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Returns every task in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when listing fails.
    pub async fn list_all(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns pending and running tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when listing fails.
    pub async fn list_active(&self) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.list_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.status().is_active())
            .collect())
    }

    /// Returns the tasks assigned to `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when listing fails.
    pub async fn list_for_agent(&self, agent_id: &AgentId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_by_agent(agent_id).await?)
    }

    /// Moves a pending task to `Running`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or an
    /// [`ErrorClass::InvalidStateTransition`]-classified error.
    pub async fn start(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, |task, clock| task.start(clock)).await
    }

    /// Moves a running task to `Completed` with `result`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or an
    /// [`ErrorClass::InvalidStateTransition`]-classified error.
    pub async fn complete(&self, id: TaskId, result: Value) -> TaskLifecycleResult<Task> {
        self.transition(id, |task, clock| task.complete(result, clock))
            .await
    }

    /// Moves a running task to `Failed` with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or an
    /// [`ErrorClass::InvalidStateTransition`]-classified error.
    pub async fn fail(&self, id: TaskId, error: String) -> TaskLifecycleResult<Task> {
        self.transition(id, |task, clock| task.fail(error, clock))
            .await
    }

    /// Applies `change` to the stored task and writes it back only if no
    /// other writer moved the task in between.
    async fn transition<F>(&self, id: TaskId, change: F) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError> + Send,
    {
        let mut task = self.require(id).await?;
        let previous = task.status();
        if let Err(err) = change(&mut task, &*self.clock) {
            warn!(task_id = %id, error = %err, "rejected task transition");
            return Err(err.into());
        }

        match self.repository.replace(&task, previous).await {
            Ok(()) => {
                debug!(task_id = %id, from = %previous, to = %task.status(), "task transitioned");
                Ok(task)
            }
            Err(TaskRepositoryError::Conflict { actual, .. }) => {
                let err = TaskDomainError::InvalidStateTransition {
                    task_id: id,
                    from: actual,
                    to: task.status(),
                };
                warn!(task_id = %id, error = %err, "lost task transition race");
                Err(err.into())
            }
            Err(other) => Err(other.into()),
        }
    }
}
