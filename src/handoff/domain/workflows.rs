//! Built-in handoff chains over the default roster roles.

use super::HandoffStep;
use serde::{Deserialize, Serialize};

const RESEARCH_KEYWORDS: [&str; 3] = ["research", "analyze", "investigate"];
const EXECUTION_KEYWORDS: [&str; 3] = ["execute", "build", "create"];

/// Named workflow templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Plan, research, execute, review, report.
    Standard,
    /// Research first, then plan, dig deeper, and validate.
    Research,
    /// Break down, execute, review, and fix until clean.
    Execution,
}

impl WorkflowKind {
    /// Picks a template from keywords in a task description.
    ///
    /// Research keywords win over execution keywords; anything else gets
    /// the standard chain. Matching ignores case.
    #[must_use]
    pub fn recommend(description: &str) -> Self {
        let lowered = description.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|word| lowered.contains(word));
        if mentions(RESEARCH_KEYWORDS.as_slice()) {
            Self::Research
        } else if mentions(EXECUTION_KEYWORDS.as_slice()) {
            Self::Execution
        } else {
            Self::Standard
        }
    }

    /// Returns the template's steps.
    #[must_use]
    pub fn steps(self) -> Vec<HandoffStep> {
        match self {
            Self::Standard => vec![
                HandoffStep::new("coordinator", "planner", "Create execution plan"),
                HandoffStep::new("planner", "researcher", "Gather necessary information")
                    .when("requires_research"),
                HandoffStep::new("researcher", "executor", "Execute plan steps"),
                HandoffStep::new("executor", "reviewer", "Review execution results"),
                HandoffStep::new("reviewer", "coordinator", "Report final results"),
            ],
            Self::Research => vec![
                HandoffStep::new("coordinator", "researcher", "Initial information gathering"),
                HandoffStep::new("researcher", "planner", "Plan analysis approach"),
                HandoffStep::new("planner", "researcher", "Deep dive research"),
                HandoffStep::new("researcher", "reviewer", "Validate findings"),
                HandoffStep::new("reviewer", "coordinator", "Present research report"),
            ],
            Self::Execution => vec![
                HandoffStep::new("coordinator", "planner", "Create task breakdown"),
                HandoffStep::new("planner", "executor", "Execute tasks sequentially"),
                HandoffStep::new("executor", "reviewer", "Quality check"),
                HandoffStep::new("reviewer", "executor", "Fix issues").when("has_issues"),
                HandoffStep::new("reviewer", "coordinator", "Deliver final output"),
            ],
        }
    }
}
