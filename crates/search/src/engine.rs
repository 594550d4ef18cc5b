//! Search driver: runs a [`FwdbwdSearch`] under step and time limits and
//! packages the outcome as a [`SearchResult`].

use std::time::Instant;

use plan_io::{SearchResult, TerminationReason};
use sas_task::{Cost, Task};

use crate::config::SearchConfig;
use crate::fwdbwd::FwdbwdSearch;

/// Errors that can occur while setting up a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The configuration cannot be run.
    #[error("Invalid search configuration: {0}")]
    Config(String),
}

/// Result of one `step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    InProgress,
    Solved,
    Failed,
}

/// Fwdbwd best-first planner.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    /// Create an engine; fails on configurations the search cannot run.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for a plan for `task`.
    ///
    /// Running out of steps or time is not an error: the result reports it
    /// through its termination reason.
    pub fn search(&self, task: &Task) -> Result<SearchResult, SearchError> {
        let start_time = Instant::now();
        let mut search = FwdbwdSearch::new(task, self.config.clone())?;

        let termination = if search.initialize() {
            self.run(&mut search, start_time)
        } else {
            TerminationReason::InitialDeadEnd
        };

        let wall_time_ms = start_time.elapsed().as_millis() as u64;
        let plan_ids = search.plan().unwrap_or_default();
        let plan: Vec<String> = plan_ids
            .iter()
            .map(|&op| task.operator(op).name.clone())
            .collect();
        let plan_cost: Cost = plan_ids.iter().map(|&op| task.operator(op).cost).sum();
        let stats = search.stats().clone();

        match termination {
            TerminationReason::Solved => tracing::info!(
                task = %task.name,
                plan_length = plan.len(),
                plan_cost,
                expanded = stats.expanded,
                generated = stats.generated,
                time_ms = wall_time_ms,
                "Search finished"
            ),
            reason => tracing::info!(
                task = %task.name,
                %reason,
                expanded = stats.expanded,
                generated = stats.generated,
                time_ms = wall_time_ms,
                "Search stopped without a plan"
            ),
        }

        Ok(SearchResult {
            task_name: task.name.clone(),
            solved: termination == TerminationReason::Solved,
            plan,
            plan_cost,
            termination,
            wall_time_ms,
            stats,
        })
    }

    fn run(&self, search: &mut FwdbwdSearch<'_>, start_time: Instant) -> TerminationReason {
        let max_steps = self.config.max_steps;
        let max_time_secs = self.config.max_time_secs;
        let mut steps: u64 = 0;
        loop {
            if max_steps > 0 && steps >= max_steps {
                tracing::info!(steps, "Step limit reached");
                return TerminationReason::StepLimit;
            }
            if max_time_secs > 0 && start_time.elapsed().as_secs() >= max_time_secs {
                tracing::info!(
                    elapsed_s = start_time.elapsed().as_secs(),
                    "Search timed out"
                );
                return TerminationReason::Timeout;
            }
            steps += 1;
            match search.step() {
                SearchStatus::InProgress => {}
                SearchStatus::Solved => return TerminationReason::Solved,
                SearchStatus::Failed => return TerminationReason::Exhausted,
            }
        }
    }
}
