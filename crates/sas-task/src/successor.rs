//! Applicable-operator generation.

use std::collections::HashMap;

use crate::state::State;
use crate::types::{Fact, OperatorId, Task};

/// Finds the operators applicable in a state.
///
/// Each operator is filed under its first precondition fact, so a lookup
/// only tests operators whose first precondition already holds. Operators
/// without preconditions are always candidates.
#[derive(Debug, Clone)]
pub struct SuccessorGenerator {
    by_first_fact: HashMap<Fact, Vec<OperatorId>>,
    unconditional: Vec<OperatorId>,
}

impl SuccessorGenerator {
    pub fn new(task: &Task) -> Self {
        let mut by_first_fact: HashMap<Fact, Vec<OperatorId>> = HashMap::new();
        let mut unconditional = Vec::new();
        for (id, op) in task.operators_with_ids() {
            match op.preconditions.first() {
                Some(fact) => by_first_fact.entry(*fact).or_default().push(id),
                None => unconditional.push(id),
            }
        }
        Self {
            by_first_fact,
            unconditional,
        }
    }

    /// Append every operator applicable in `state` to `out`, in ascending id order.
    pub fn generate_applicable_ops(&self, task: &Task, state: &State, out: &mut Vec<OperatorId>) {
        let start = out.len();
        out.extend(self.unconditional.iter().copied());
        for (var, &value) in state.values().iter().enumerate() {
            if let Some(ops) = self.by_first_fact.get(&Fact::new(var, value)) {
                out.extend(
                    ops.iter()
                        .copied()
                        .filter(|&id| task.operator(id).is_applicable(state)),
                );
            }
        }
        out[start..].sort_unstable();
    }
}
