//! Multi-step handoff plans.

use super::{HandoffDomainError, PlanId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One leg of a plan: which role passes work to which, and what to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffStep {
    /// Role handing the work off.
    pub from: String,
    /// Role receiving the work.
    pub to: String,
    /// What the receiving role should do.
    pub action: String,
    /// Context flags that must hold for the step to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl HandoffStep {
    /// Creates an unconditional step.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            action: action.into(),
            conditions: Vec::new(),
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    fn is_complete(&self) -> bool {
        [&self.from, &self.to, &self.action]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Outcome of advancing a plan by one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProgress {
    /// Whether every step has now run.
    pub completed: bool,
    /// The step to run next, when the plan is not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<HandoffStep>,
}

/// An ordered chain of handoff steps with accumulated context.
///
/// Each advance stores the finished step's output in the context under
/// `step_<n>_output` and moves to the next step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffPlan {
    id: PlanId,
    steps: Vec<HandoffStep>,
    current_step: usize,
    context: Map<String, Value>,
    created_at: DateTime<Utc>,
}

impl HandoffPlan {
    /// Creates a plan positioned at its first step.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffDomainError::EmptyPlan`] when `steps` is empty and
    /// [`HandoffDomainError::IncompleteStep`] when a step has a blank role
    /// or action.
    pub fn new(
        steps: Vec<HandoffStep>,
        context: Map<String, Value>,
        clock: &impl Clock,
    ) -> Result<Self, HandoffDomainError> {
        if steps.is_empty() {
            return Err(HandoffDomainError::EmptyPlan);
        }
        if let Some(position) = steps.iter().position(|step| !step.is_complete()) {
            return Err(HandoffDomainError::IncompleteStep(position));
        }

        Ok(Self {
            id: PlanId::new(),
            steps,
            current_step: 0,
            context,
            created_at: clock.utc(),
        })
    }

    /// Returns the plan identifier.
    #[must_use]
    pub const fn id(&self) -> PlanId {
        self.id
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn steps(&self) -> &[HandoffStep] {
        &self.steps
    }

    /// Returns the index of the step to run next.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the step to run next, or `None` once the plan is complete.
    #[must_use]
    pub fn next_step(&self) -> Option<&HandoffStep> {
        self.steps.get(self.current_step)
    }

    /// Returns the accumulated context.
    #[must_use]
    pub const fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Returns when the plan was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether every step has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    /// Records `output` for the current step and moves to the next one.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffDomainError::PlanFinished`] when every step has
    /// already run.
    pub fn advance(&mut self, output: Value) -> Result<PlanProgress, HandoffDomainError> {
        if self.is_complete() {
            return Err(HandoffDomainError::PlanFinished(self.id));
        }

        self.context
            .insert(format!("step_{}_output", self.current_step), output);
        self.current_step = self.current_step.saturating_add(1);

        let next_step = self.next_step().cloned();
        Ok(PlanProgress {
            completed: next_step.is_none(),
            next_step,
        })
    }
}
