//! State owned by one fwdbwd search: the read-only dependency graph plus
//! the structures that grow while searching.

use std::collections::{HashMap, HashSet};

use sas_task::{OperatorId, StateId, Task};

use crate::dependency::DependencyGraph;
use crate::op_stack::OpStack;

/// (state, reaching operator) pairs that already have a forward entry.
///
/// Only grows during a search.
#[derive(Debug, Default)]
pub struct ForwardEdgeRegistry {
    edges: HashMap<StateId, HashSet<OperatorId>>,
    len: usize,
}

impl ForwardEdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pair; false if it was already present.
    pub fn insert(&mut self, state: StateId, op: OperatorId) -> bool {
        let fresh = self.edges.entry(state).or_default().insert(op);
        if fresh {
            self.len += 1;
        }
        fresh
    }

    pub fn contains(&self, state: StateId, op: OperatorId) -> bool {
        self.edges.get(&state).is_some_and(|ops| ops.contains(&op))
    }

    /// Operators registered as reaching `state`, in ascending order.
    pub fn operators(&self, state: StateId) -> Vec<OperatorId> {
        let mut ops: Vec<OperatorId> = self
            .edges
            .get(&state)
            .map(|ops| ops.iter().copied().collect())
            .unwrap_or_default();
        ops.sort();
        ops
    }

    /// Total number of registered pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Everything the stepping procedures share for one search.
#[derive(Debug)]
pub struct SearchContext {
    pub graph: DependencyGraph,
    pub forward_nodes: ForwardEdgeRegistry,
    pub op_stack: OpStack,
}

impl SearchContext {
    pub fn new(task: &Task) -> Self {
        Self {
            graph: DependencyGraph::build(task),
            forward_nodes: ForwardEdgeRegistry::new(),
            op_stack: OpStack::new(),
        }
    }
}
