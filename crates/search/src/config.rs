use std::fmt;
use std::str::FromStr;

use sas_task::Cost;

use crate::engine::SearchError;
use crate::evaluator::build_evaluator;

/// How operator costs enter the g-values used for parent relaxation.
///
/// The bound is always checked against real costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// Use the operator's own cost.
    #[default]
    Normal,
    /// Every operator costs 1.
    One,
    /// Every operator costs its cost plus 1.
    PlusOne,
}

impl CostType {
    pub fn adjust(self, cost: Cost) -> Cost {
        match self {
            Self::Normal => cost,
            Self::One => 1,
            Self::PlusOne => cost + 1,
        }
    }
}

/// Evaluators available by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Blind,
    #[default]
    GoalCount,
    Hmax,
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blind => write!(f, "blind"),
            Self::GoalCount => write!(f, "goal_count"),
            Self::Hmax => write!(f, "hmax"),
        }
    }
}

impl FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blind" => Ok(Self::Blind),
            "goal_count" => Ok(Self::GoalCount),
            "hmax" => Ok(Self::Hmax),
            other => Err(format!(
                "unknown evaluator '{other}' (expected blind, goal_count or hmax)"
            )),
        }
    }
}

/// Search configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchConfig {
    /// Cost ceiling: transitions with `g + cost >= bound` are pruned.
    /// `None` means unbounded.
    #[serde(default)]
    pub bound: Option<Cost>,

    /// Maximum number of `step` calls. 0 disables the limit.
    #[serde(default)]
    pub max_steps: u64,

    /// Maximum wall-clock seconds. 0 disables the limit.
    #[serde(default)]
    pub max_time_secs: u64,

    #[serde(default)]
    pub cost_type: CostType,

    /// Evaluator used for dead-end detection and progress reporting.
    #[serde(default)]
    pub evaluator: EvaluatorKind,

    /// Evaluator re-run on every popped entry. Must cache its estimates.
    #[serde(default)]
    pub lazy_evaluator: Option<EvaluatorKind>,

    /// Log a line whenever the best heuristic value improves.
    #[serde(default = "default_progress_log")]
    pub progress_log: bool,
}

fn default_progress_log() -> bool {
    true
}

impl SearchConfig {
    /// Effective bound, `Cost::MAX` when unbounded.
    pub fn effective_bound(&self) -> Cost {
        self.bound.unwrap_or(Cost::MAX)
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if let Some(kind) = self.lazy_evaluator {
            if !build_evaluator(kind).does_cache_estimates() {
                return Err(SearchError::Config(format!(
                    "lazy_evaluator must cache its estimates ('{kind}' does not)"
                )));
            }
        }
        if let Some(bound) = self.bound {
            if bound <= 0 {
                tracing::warn!(bound, "bound <= 0, no transition can be applied");
            }
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bound: None,
            max_steps: 0,
            max_time_secs: 0,
            cost_type: CostType::default(),
            evaluator: EvaluatorKind::default(),
            lazy_evaluator: None,
            progress_log: default_progress_log(),
        }
    }
}
