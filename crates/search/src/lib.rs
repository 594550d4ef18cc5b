//! Forward/backward ("fwdbwd") best-first search for SAS+ planning tasks.
//!
//! Forward expansion is restricted by an operator dependency graph; related
//! operators that are not yet applicable become tentative regression chains
//! in an operator stack, which backward steps resolve into real transitions.
//! Both kinds of work share one open list.
//!
//! # Key types
//!
//! - [`SearchEngine`] — runs a search under step/time limits
//! - [`FwdbwdSearch`] — the stepping engine (`initialize`, `step`, ...)
//! - [`SearchConfig`] — configuration loaded from TOML
//! - [`DependencyGraph`] — per-task operator dependencies and goal relevance
//! - [`OpStack`] — arena-backed regression trie
//! - [`FrontierEntry`] — forward or backward unit of work
//! - [`OpenList`] / [`Evaluator`] — traits at the queue and heuristic seams

pub mod config;
pub mod context;
pub mod dependency;
pub mod engine;
pub mod evaluator;
pub mod frontier;
pub mod fwdbwd;
pub mod mocks;
pub mod op_stack;
pub mod open_list;
pub mod progress;
pub mod search_space;

pub use config::{CostType, EvaluatorKind, SearchConfig};
pub use context::{ForwardEdgeRegistry, SearchContext};
pub use dependency::{DependencyGraph, FactEntry};
pub use engine::{SearchEngine, SearchError, SearchStatus};
pub use evaluator::{
    build_evaluator, BlindEvaluator, EvaluationContext, Estimate, Evaluator, GoalCountEvaluator,
    HMaxEvaluator,
};
pub use frontier::FrontierEntry;
pub use fwdbwd::FwdbwdSearch;
pub use op_stack::{NodeIdx, OpStack, OpStackNode};
pub use open_list::{FwdbwdOpenList, OpenList};
pub use plan_io::{SearchResult, SearchStats, TerminationReason};
pub use progress::SearchProgress;
pub use search_space::{NodeStatus, SearchNodeInfo, SearchSpace};
