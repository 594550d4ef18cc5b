//! Frontier entries and their priority order.

use std::cmp::Ordering;

use sas_task::{Cost, OperatorId, StateId};

use crate::op_stack::NodeIdx;

/// One unit of work in the open list.
///
/// Forward entries are states known to be reachable, tagged with the
/// operator used to reach them. Backward entries point at a position in
/// the operator stack that still has to be resolved at `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierEntry {
    Forward {
        state: StateId,
        operator: OperatorId,
        g: Cost,
    },
    Backward {
        state: StateId,
        node: NodeIdx,
        /// Depth of `node`, copied in so ordering needs no stack lookup.
        depth: u32,
        g: Cost,
    },
}

impl FrontierEntry {
    pub fn state(&self) -> StateId {
        match *self {
            Self::Forward { state, .. } | Self::Backward { state, .. } => state,
        }
    }

    pub fn g(&self) -> Cost {
        match *self {
            Self::Forward { g, .. } | Self::Backward { g, .. } => g,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward { .. })
    }

    /// Priority comparison: `Less` means "pop first".
    ///
    /// Forward before backward; forward by g, backward by chain depth.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Forward { g: a, .. }, Self::Forward { g: b, .. }) => a.cmp(b),
            (Self::Backward { depth: a, .. }, Self::Backward { depth: b, .. }) => a.cmp(b),
            (Self::Forward { .. }, Self::Backward { .. }) => Ordering::Less,
            (Self::Backward { .. }, Self::Forward { .. }) => Ordering::Greater,
        }
    }
}

/// A frontier entry with its insertion sequence number.
///
/// `BinaryHeap` is a max-heap, so `Ord` is reversed: the entry that should
/// pop first compares greatest. Equal priorities pop in insertion order.
#[derive(Debug, Clone, Copy)]
pub struct QueuedEntry {
    pub entry: FrontierEntry,
    pub seq: u64,
}

impl PartialEq for QueuedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEntry {}

impl PartialOrd for QueuedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entry
            .priority_cmp(&self.entry)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
