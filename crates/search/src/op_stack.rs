//! Operator stack: a trie of tentative regression chains.
//!
//! Each node stands for one operator appended to a backward chain. Walking
//! from a node up to the root gives the chain in execution order: a node's
//! operator is applied first, then its parent's, and so on. Nodes live in a
//! flat arena owned by the search and reference each other by index; the
//! whole trie is dropped with the search.

use std::collections::{HashMap, HashSet};

use sas_task::{Cost, OperatorId, StateId};

/// Index of a node in the [`OpStack`] arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);

impl NodeIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One position in a regression chain.
#[derive(Debug, Clone)]
pub struct OpStackNode {
    operator: OperatorId,
    /// `None` only for the root.
    parent: Option<NodeIdx>,
    children: HashMap<OperatorId, NodeIdx>,
    depth: u32,
    /// Sum of operator costs from the root down to this node.
    cost: Cost,
    /// State at which this node was first requested.
    origin: StateId,
    /// States already explored through this chain position.
    states: HashSet<StateId>,
}

impl OpStackNode {
    pub fn operator(&self) -> OperatorId {
        self.operator
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn origin(&self) -> StateId {
        self.origin
    }

    pub fn child(&self, op: OperatorId) -> Option<NodeIdx> {
        self.children.get(&op).copied()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn has_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }
}

/// Arena-backed regression trie rooted at a `NO_OPERATOR` node.
#[derive(Debug, Clone)]
pub struct OpStack {
    nodes: Vec<OpStackNode>,
}

impl Default for OpStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OpStack {
    const ROOT: NodeIdx = NodeIdx(0);

    pub fn new() -> Self {
        let root = OpStackNode {
            operator: OperatorId::NO_OPERATOR,
            parent: None,
            children: HashMap::new(),
            depth: 0,
            cost: 0,
            origin: StateId::NO_STATE,
            states: HashSet::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeIdx {
        Self::ROOT
    }

    pub fn is_root(&self, idx: NodeIdx) -> bool {
        idx == Self::ROOT
    }

    pub fn node(&self, idx: NodeIdx) -> &OpStackNode {
        &self.nodes[idx.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the child of `parent` for `op`, creating it if absent.
    ///
    /// The flag is true only when the child was created by this call;
    /// repeated calls return the same node with `false`, whatever `state`
    /// and `op_cost` are passed.
    pub fn gen_child(
        &mut self,
        parent: NodeIdx,
        op: OperatorId,
        state: StateId,
        op_cost: Cost,
    ) -> (NodeIdx, bool) {
        if let Some(existing) = self.nodes[parent.index()].child(op) {
            return (existing, false);
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        let parent_node = &self.nodes[parent.index()];
        let child = OpStackNode {
            operator: op,
            parent: Some(parent),
            children: HashMap::new(),
            depth: parent_node.depth + 1,
            cost: parent_node.cost + op_cost,
            origin: state,
            states: HashSet::new(),
        };
        self.nodes.push(child);
        self.nodes[parent.index()].children.insert(op, idx);
        (idx, true)
    }

    /// Record that `state` was explored at `idx`. False if it already was.
    pub fn store_state(&mut self, idx: NodeIdx, state: StateId) -> bool {
        self.nodes[idx.index()].states.insert(state)
    }

    /// Pending operators from `idx` up to the root, in execution order.
    pub fn chain(&self, idx: NodeIdx) -> Vec<OperatorId> {
        let mut ops = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            if self.is_root(i) {
                break;
            }
            let node = self.node(i);
            ops.push(node.operator);
            current = node.parent;
        }
        ops
    }
}
