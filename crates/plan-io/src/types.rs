//! Data types for search results, statistics and plans.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors from reading or writing plan files.
#[derive(Debug, thiserror::Error)]
pub enum PlanIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A non-comment line that is not a parenthesised operator name.
    #[error("line {line}: expected '(operator name)', got '{text}'")]
    Malformed { line: usize, text: String },
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// A goal state was reached.
    Solved,
    /// The open list ran empty without reaching a goal.
    Exhausted,
    /// The step budget ran out.
    StepLimit,
    /// The wall-clock limit ran out.
    Timeout,
    /// The evaluator judged the initial state a dead end.
    InitialDeadEnd,
}

impl TerminationReason {
    /// True if the search space was proven to contain no plan (within the bound).
    pub fn is_unsolvable(self) -> bool {
        matches!(self, Self::Exhausted | Self::InitialDeadEnd)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved => write!(f, "solved"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::StepLimit => write!(f, "step_limit"),
            Self::Timeout => write!(f, "timeout"),
            Self::InitialDeadEnd => write!(f, "initial_dead_end"),
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Frontier entries popped and processed.
    pub expanded: u64,
    /// States handed to the evaluator.
    pub evaluated: u64,
    /// Successor states computed (new or not).
    pub generated: u64,
    /// States the evaluator judged dead ends.
    pub dead_ends: u64,
    /// Forward entries processed.
    pub forward_steps: u64,
    /// Backward entries processed.
    pub backward_steps: u64,
    /// Forward entries inserted into the open list.
    pub forward_entries: u64,
    /// Backward entries inserted into the open list.
    pub backward_entries: u64,
    /// Backward chains that bottomed out at the operator-stack root.
    pub chains_resolved: u64,
    /// Nodes in the operator stack, root included.
    pub op_stack_nodes: u64,
    /// Largest open list size observed.
    pub peak_open_list_size: usize,
    /// Calls to `step`.
    pub steps: u64,
}

/// Result of searching one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub task_name: String,
    pub solved: bool,
    /// Operator names in execution order; empty unless solved.
    pub plan: Vec<String>,
    /// Sum of real operator costs along the plan.
    pub plan_cost: i64,
    pub termination: TerminationReason,
    pub wall_time_ms: u64,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn plan_len(&self) -> usize {
        self.plan.len()
    }
}
