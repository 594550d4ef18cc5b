//! Report types printed by the CLI subcommands.

use serde::{Deserialize, Serialize};

use plan_io::TerminationReason;
use sas_task::{Cost, StateRegistry, Task};
use search::DependencyGraph;

/// How a CLI run ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A plan was found, or the validated plan reaches the goal.
    Success,
    /// The search space was exhausted without a plan.
    Unsolvable,
    /// The step or time limit stopped the search.
    Incomplete,
    /// The validated plan does not reach the goal.
    InvalidPlan,
}

/// Exit status for unreadable input or an unusable configuration.
pub const INPUT_ERROR_EXIT_CODE: u8 = 31;

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::InvalidPlan => 1,
            Self::Unsolvable => 11,
            Self::Incomplete => 12,
        }
    }

    pub fn from_termination(reason: TerminationReason) -> Self {
        match reason {
            TerminationReason::Solved => Self::Success,
            TerminationReason::Exhausted | TerminationReason::InitialDeadEnd => Self::Unsolvable,
            TerminationReason::StepLimit | TerminationReason::Timeout => Self::Incomplete,
        }
    }
}

/// Outcome of replaying a plan against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Steps applied before the replay stopped.
    pub steps_applied: usize,
    pub plan_length: usize,
    pub cost: Cost,
    /// Why the plan is invalid, if it is.
    #[serde(default)]
    pub failure: Option<String>,
}

/// Replay `plan` (operator names) from the initial state of `task`.
pub fn validate_plan(task: &Task, plan: &[String]) -> ValidationReport {
    let mut registry = StateRegistry::new();
    let mut state = registry.get_initial_state(task);
    let mut cost: Cost = 0;
    let fail = |steps_applied: usize, cost: Cost, reason: String| ValidationReport {
        valid: false,
        steps_applied,
        plan_length: plan.len(),
        cost,
        failure: Some(reason),
    };

    for (i, name) in plan.iter().enumerate() {
        let Some(op) = task.find_operator(name) else {
            return fail(i, cost, format!("step {}: unknown operator '{name}'", i + 1));
        };
        let operator = task.operator(op);
        if !operator.is_applicable(registry.lookup(state)) {
            return fail(i, cost, format!("step {}: '{name}' is not applicable", i + 1));
        }
        state = registry.get_successor_state(state, operator);
        cost += operator.cost;
    }

    if !task.is_goal_state(registry.lookup(state)) {
        return fail(plan.len(), cost, "final state does not satisfy the goal".to_string());
    }
    ValidationReport {
        valid: true,
        steps_applied: plan.len(),
        plan_length: plan.len(),
        cost,
        failure: None,
    }
}

/// Dependency-graph statistics for one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub task: String,
    pub operators: usize,
    pub edges: usize,
    pub goal_relevant: usize,
    /// Operators with the most dependents, largest first.
    pub top_fan_out: Vec<FanOut>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanOut {
    pub operator: String,
    pub dependents: usize,
}

impl GraphSummary {
    pub fn build(task: &Task, graph: &DependencyGraph, top: usize) -> Self {
        let mut fan_out: Vec<FanOut> = task
            .operators_with_ids()
            .map(|(id, op)| FanOut {
                operator: op.name.clone(),
                dependents: graph.dependents(id).len(),
            })
            .collect();
        // Stable sort keeps id order among equal counts.
        fan_out.sort_by(|a, b| b.dependents.cmp(&a.dependents));
        fan_out.truncate(top);
        Self {
            task: task.name.clone(),
            operators: graph.num_operators(),
            edges: graph.num_edges(),
            goal_relevant: graph.num_goal_relevant(),
            top_fan_out: fan_out,
        }
    }
}
