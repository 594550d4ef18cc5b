//! Per-state search bookkeeping: status, g-values and parent pointers.

use sas_task::{Cost, OperatorId, StateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    New,
    Open,
    Closed,
    DeadEnd,
}

/// Search information attached to one registered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNodeInfo {
    pub status: NodeStatus,
    /// g under the configured cost type; used for parent relaxation.
    pub g: Cost,
    /// g under real operator costs; used for the bound and plan cost.
    pub real_g: Cost,
    pub parent: StateId,
    pub creating_operator: OperatorId,
}

impl Default for SearchNodeInfo {
    fn default() -> Self {
        Self {
            status: NodeStatus::New,
            g: 0,
            real_g: 0,
            parent: StateId::NO_STATE,
            creating_operator: OperatorId::NO_OPERATOR,
        }
    }
}

impl SearchNodeInfo {
    pub fn is_new(&self) -> bool {
        self.status == NodeStatus::New
    }

    pub fn is_open(&self) -> bool {
        self.status == NodeStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }

    pub fn is_dead_end(&self) -> bool {
        self.status == NodeStatus::DeadEnd
    }
}

/// Dense table of [`SearchNodeInfo`] indexed by `StateId`.
///
/// States never touched read back as `New`.
#[derive(Debug, Default)]
pub struct SearchSpace {
    nodes: Vec<SearchNodeInfo>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: StateId) -> SearchNodeInfo {
        self.nodes.get(id.index()).copied().unwrap_or_default()
    }

    fn slot(&mut self, id: StateId) -> &mut SearchNodeInfo {
        let idx = id.index();
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, SearchNodeInfo::default());
        }
        &mut self.nodes[idx]
    }

    pub fn open_initial(&mut self, id: StateId) {
        let node = self.slot(id);
        node.status = NodeStatus::Open;
        node.g = 0;
        node.real_g = 0;
        node.parent = StateId::NO_STATE;
        node.creating_operator = OperatorId::NO_OPERATOR;
    }

    /// Open `id` as a child of `parent` reached via `op`.
    ///
    /// `adjusted_cost` feeds `g`, `real_cost` feeds `real_g`.
    pub fn open(
        &mut self,
        id: StateId,
        parent: StateId,
        op: OperatorId,
        adjusted_cost: Cost,
        real_cost: Cost,
    ) {
        let parent_node = self.get(parent);
        let node = self.slot(id);
        node.status = NodeStatus::Open;
        node.g = parent_node.g + adjusted_cost;
        node.real_g = parent_node.real_g + real_cost;
        node.parent = parent;
        node.creating_operator = op;
    }

    /// Re-point `id` at `parent` via `op`, taking the parent's g-values.
    ///
    /// A closed node is reopened.
    pub fn update_parent(
        &mut self,
        id: StateId,
        parent: StateId,
        op: OperatorId,
        adjusted_cost: Cost,
        real_cost: Cost,
    ) {
        let parent_node = self.get(parent);
        let node = self.slot(id);
        node.g = parent_node.g + adjusted_cost;
        node.real_g = parent_node.real_g + real_cost;
        node.parent = parent;
        node.creating_operator = op;
        if node.status == NodeStatus::Closed {
            node.status = NodeStatus::Open;
        }
    }

    pub fn close(&mut self, id: StateId) {
        self.slot(id).status = NodeStatus::Closed;
    }

    pub fn mark_as_dead_end(&mut self, id: StateId) {
        self.slot(id).status = NodeStatus::DeadEnd;
    }

    /// Operators from the initial state to `goal`, in execution order.
    ///
    /// Stops after one step per known state, so a corrupted parent cycle
    /// cannot loop forever.
    pub fn trace_path(&self, goal: StateId) -> Vec<OperatorId> {
        let mut path = Vec::new();
        let mut current = goal;
        for _ in 0..=self.nodes.len() {
            let node = self.get(current);
            if node.creating_operator.is_none() {
                break;
            }
            path.push(node.creating_operator);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Number of states with a slot, whatever their status.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
