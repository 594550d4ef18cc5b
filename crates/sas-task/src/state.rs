//! Fully-assigned states and the registry that interns them.

use std::collections::HashMap;
use std::ops::Index;

use crate::types::{Operator, StateId, Task, Value, VarId};

/// A complete assignment of one value to every state variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    values: Vec<Value>,
}

impl State {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Successor after applying `op`'s effects. Applicability is not checked.
    pub fn apply(&self, op: &Operator) -> State {
        let mut values = self.values.clone();
        for eff in &op.effects {
            values[eff.var] = eff.value;
        }
        State { values }
    }
}

impl Index<VarId> for State {
    type Output = Value;

    fn index(&self, var: VarId) -> &Value {
        &self.values[var]
    }
}

/// Interns states by value and hands out dense, stable [`StateId`]s.
///
/// States are stored in a flat arena; a state's id is its arena index.
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: Vec<State>,
    ids: HashMap<State, StateId>,
    initial: Option<StateId>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `state`, returning the existing id if it was seen before.
    pub fn insert(&mut self, state: State) -> StateId {
        if let Some(&id) = self.ids.get(&state) {
            return id;
        }
        let id = StateId::new(self.states.len());
        self.ids.insert(state.clone(), id);
        self.states.push(state);
        id
    }

    /// Intern the task's initial state.
    pub fn get_initial_state(&mut self, task: &Task) -> StateId {
        if let Some(id) = self.initial {
            return id;
        }
        let id = self.insert(State::new(task.initial_state.clone()));
        self.initial = Some(id);
        id
    }

    /// Apply `op` to the state behind `id` and intern the result.
    pub fn get_successor_state(&mut self, id: StateId, op: &Operator) -> StateId {
        let succ = self.states[id.index()].apply(op);
        self.insert(succ)
    }

    /// Resolve a handle. Panics on ids from another registry.
    pub fn lookup(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn get_id(&self, state: &State) -> Option<StateId> {
        self.ids.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
