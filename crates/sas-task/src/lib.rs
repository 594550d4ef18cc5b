//! Finite-domain (SAS+) planning tasks.
//!
//! Provides the task model consumed by the search crate: typed operator and
//! state handles, JSON loading with structural validation, a state registry
//! that interns states by value, and applicable-operator generation.
//!
//! # Key types
//!
//! - [`Task`] / [`Operator`] / [`Fact`] — the loaded task
//! - [`OperatorId`] / [`StateId`] — compact handles, with sentinels
//! - [`StateRegistry`] — interns [`State`]s to [`StateId`]s
//! - [`SuccessorGenerator`] — applicable operators of a state

pub mod state;
pub mod successor;
pub mod types;

pub use state::{State, StateRegistry};
pub use successor::SuccessorGenerator;
pub use types::{Cost, Fact, Operator, OperatorId, StateId, Task, TaskError, Value, VarId, Variable};
