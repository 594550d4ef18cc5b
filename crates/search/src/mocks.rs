//! Test helpers: a fluent task builder and evaluators with observable
//! behavior.

use std::cell::Cell;
use std::rc::Rc;

use sas_task::{Cost, Fact, Operator, OperatorId, State, Task, Value, VarId, Variable};

use crate::evaluator::{EvaluationContext, Estimate, Evaluator};

// ---------------------------------------------------------------------------
// TaskBuilder
// ---------------------------------------------------------------------------

/// Builds small validated tasks inline.
///
/// Variables are numbered in the order they are added; facts are given as
/// `(variable, value)` pairs.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            task: Task {
                name: name.to_string(),
                variables: Vec::new(),
                operators: Vec::new(),
                initial_state: Vec::new(),
                goal: Vec::new(),
            },
        }
    }

    pub fn variable(mut self, name: &str, domain_size: usize) -> Self {
        self.task.variables.push(Variable {
            name: name.to_string(),
            domain_size,
            fact_names: Vec::new(),
        });
        self
    }

    /// Add a unit-cost operator.
    pub fn operator(self, name: &str, pre: &[(VarId, Value)], eff: &[(VarId, Value)]) -> Self {
        self.operator_with_cost(name, pre, eff, 1)
    }

    pub fn operator_with_cost(
        mut self,
        name: &str,
        pre: &[(VarId, Value)],
        eff: &[(VarId, Value)],
        cost: Cost,
    ) -> Self {
        self.task.operators.push(Operator {
            name: name.to_string(),
            preconditions: facts(pre),
            effects: facts(eff),
            cost,
        });
        self
    }

    pub fn initial(mut self, values: &[Value]) -> Self {
        self.task.initial_state = values.to_vec();
        self
    }

    pub fn goal(mut self, goal: &[(VarId, Value)]) -> Self {
        self.task.goal = facts(goal);
        self
    }

    /// Validate and return the task. Panics on an inconsistent task.
    pub fn build(self) -> Task {
        if let Err(e) = self.task.validate() {
            panic!("TaskBuilder produced an invalid task: {e}");
        }
        self.task
    }
}

fn facts(pairs: &[(VarId, Value)]) -> Vec<Fact> {
    pairs.iter().map(|&(var, value)| Fact::new(var, value)).collect()
}

// ---------------------------------------------------------------------------
// RecordingEvaluator
// ---------------------------------------------------------------------------

/// Path-dependent evaluator that counts the notifications it receives.
///
/// Always estimates 0.
pub struct RecordingEvaluator {
    initial: Rc<Cell<usize>>,
    transitions: Rc<Cell<usize>>,
}

impl RecordingEvaluator {
    pub fn new(initial: Rc<Cell<usize>>, transitions: Rc<Cell<usize>>) -> Self {
        Self {
            initial,
            transitions,
        }
    }
}

impl Evaluator for RecordingEvaluator {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn compute(&mut self, _task: &Task, _ctx: &EvaluationContext<'_>) -> Estimate {
        Estimate::Finite(0)
    }

    fn is_path_dependent(&self) -> bool {
        true
    }

    fn notify_initial_state(&mut self, _state: &State) {
        self.initial.set(self.initial.get() + 1);
    }

    fn notify_state_transition(&mut self, _parent: &State, _op: OperatorId, _succ: &State) {
        self.transitions.set(self.transitions.get() + 1);
    }
}

// ---------------------------------------------------------------------------
// DeadEndEvaluator
// ---------------------------------------------------------------------------

/// Judges the listed states dead ends and everything else at distance 0.
///
/// Claims to cache so it can stand in as a lazy evaluator.
pub struct DeadEndEvaluator {
    dead: Vec<State>,
}

impl DeadEndEvaluator {
    pub fn new(dead: Vec<Vec<Value>>) -> Self {
        Self {
            dead: dead.into_iter().map(State::new).collect(),
        }
    }
}

impl Evaluator for DeadEndEvaluator {
    fn name(&self) -> &'static str {
        "dead_end"
    }

    fn compute(&mut self, _task: &Task, ctx: &EvaluationContext<'_>) -> Estimate {
        if self.dead.contains(ctx.state) {
            Estimate::DeadEnd
        } else {
            Estimate::Finite(0)
        }
    }

    fn does_cache_estimates(&self) -> bool {
        true
    }
}
