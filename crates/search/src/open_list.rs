//! Open list holding frontier entries.

use std::collections::BinaryHeap;

use sas_task::{OperatorId, State, Task};

use crate::evaluator::{EvaluationContext, Estimate, Evaluator};
use crate::frontier::{FrontierEntry, QueuedEntry};

/// Priority queue of frontier entries plus the evaluator used to judge
/// dead ends.
pub trait OpenList {
    fn insert(&mut self, entry: FrontierEntry);

    fn remove_min(&mut self) -> Option<FrontierEntry>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    /// Estimate for a state; [`Estimate::DeadEnd`] marks a dead end.
    fn evaluate(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate;

    fn notify_initial_state(&mut self, state: &State);

    fn notify_state_transition(&mut self, parent: &State, op: OperatorId, succ: &State);
}

/// Binary-heap open list ordered by [`FrontierEntry::priority_cmp`].
///
/// Entries of equal priority pop in insertion order.
pub struct FwdbwdOpenList {
    heap: BinaryHeap<QueuedEntry>,
    next_seq: u64,
    evaluator: Box<dyn Evaluator>,
}

impl FwdbwdOpenList {
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            evaluator,
        }
    }

    pub fn evaluator_name(&self) -> &'static str {
        self.evaluator.name()
    }
}

impl OpenList for FwdbwdOpenList {
    fn insert(&mut self, entry: FrontierEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedEntry { entry, seq });
    }

    fn remove_min(&mut self) -> Option<FrontierEntry> {
        self.heap.pop().map(|q| q.entry)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn evaluate(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate {
        self.evaluator.compute(task, ctx)
    }

    fn notify_initial_state(&mut self, state: &State) {
        if self.evaluator.is_path_dependent() {
            self.evaluator.notify_initial_state(state);
        }
    }

    fn notify_state_transition(&mut self, parent: &State, op: OperatorId, succ: &State) {
        if self.evaluator.is_path_dependent() {
            self.evaluator.notify_state_transition(parent, op, succ);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use sas_task::{Cost, StateId};

    use super::*;
    use crate::evaluator::{BlindEvaluator, GoalCountEvaluator};
    use crate::mocks::{RecordingEvaluator, TaskBuilder};
    use crate::op_stack::OpStack;

    fn fwd(state: usize, g: Cost) -> FrontierEntry {
        FrontierEntry::Forward {
            state: StateId::new(state),
            operator: OperatorId::NO_OPERATOR,
            g,
        }
    }

    #[test]
    fn test_insert_and_remove_in_priority_order() {
        let mut open = FwdbwdOpenList::new(Box::new(BlindEvaluator));
        let root = OpStack::new().root();
        open.insert(FrontierEntry::Backward {
            state: StateId::new(9),
            node: root,
            depth: 1,
            g: 0,
        });
        open.insert(fwd(1, 7));
        open.insert(fwd(2, 3));
        assert_eq!(open.len(), 3);

        let order: Vec<StateId> = std::iter::from_fn(|| open.remove_min())
            .map(|e| e.state())
            .collect();
        assert_eq!(
            order,
            vec![StateId::new(2), StateId::new(1), StateId::new(9)]
        );
        assert!(open.is_empty());
        assert_eq!(open.remove_min(), None);
    }

    #[test]
    fn test_equal_priority_is_fifo() {
        let mut open = FwdbwdOpenList::new(Box::new(BlindEvaluator));
        for s in 0..5 {
            open.insert(fwd(s, 2));
        }
        for s in 0..5 {
            assert_eq!(open.remove_min().map(|e| e.state()), Some(StateId::new(s)));
        }
    }

    #[test]
    fn test_dead_end_uses_evaluator() {
        let task = TaskBuilder::new("g")
            .variable("x", 2)
            .initial(&[0])
            .goal(&[(0, 1)])
            .build();
        let mut open = FwdbwdOpenList::new(Box::new(GoalCountEvaluator::default()));
        let state = State::new(vec![0]);
        let ctx = EvaluationContext::new(StateId::new(0), &state, 0);
        assert_eq!(open.evaluate(&task, &ctx), Estimate::Finite(1));
        assert!(!open.evaluate(&task, &ctx).is_dead_end());
    }

    #[test]
    fn test_notifications_only_for_path_dependent() {
        let initial = Rc::new(Cell::new(0));
        let transitions = Rc::new(Cell::new(0));
        let recorder = RecordingEvaluator::new(initial.clone(), transitions.clone());
        let mut open = FwdbwdOpenList::new(Box::new(recorder));
        let s = State::new(vec![0]);
        let t = State::new(vec![1]);
        open.notify_initial_state(&s);
        open.notify_state_transition(&s, OperatorId::new(0), &t);
        open.notify_state_transition(&s, OperatorId::new(0), &t);
        assert_eq!(initial.get(), 1);
        assert_eq!(transitions.get(), 2);

        // A path-independent evaluator is never told.
        let mut plain = FwdbwdOpenList::new(Box::new(BlindEvaluator));
        plain.notify_initial_state(&s);
        assert_eq!(plain.evaluator_name(), "blind");
    }
}
