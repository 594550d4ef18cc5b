//! Operator dependency graph.
//!
//! Built once per task before the search starts and read-only afterwards.
//! Three structures are derived from the operators, in this order:
//!
//! 1. the fact table: per operator and variable, the precondition value (if
//!    any) and whether the operator's effect moves the variable away from it;
//! 2. goal relevance: operators that require a non-goal value on a goal
//!    variable and change it;
//! 3. dependency edges `op1 -> op2` ("op2 depends on op1") over shared
//!    precondition variables, stored forward and inverted.

use std::collections::HashMap;

use sas_task::{OperatorId, Task, Value, VarId};

/// Fact-table entry of one operator on one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactEntry {
    /// Required value, `None` for effect-only variables.
    pub precondition: Option<Value>,
    /// The operator's effect assigns a value other than `precondition`.
    ///
    /// Always true for effect-only variables. Neither goal relevance nor
    /// dependency edges consult entries without a precondition.
    pub changes_value: bool,
}

/// Causal relation between the operators of one task.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    facts: Vec<HashMap<VarId, FactEntry>>,
    goal_relevant: Vec<bool>,
    dependency_map: Vec<Vec<OperatorId>>,
    inverse_map: Vec<Vec<OperatorId>>,
}

impl DependencyGraph {
    pub fn build(task: &Task) -> Self {
        let facts = build_fact_table(task);
        let goal_relevant = task
            .operators_with_ids()
            .map(|(id, _)| is_goal_relevant(task, &facts, id))
            .collect();
        let (dependency_map, inverse_map) = build_edges(task, &facts);

        let graph = Self {
            facts,
            goal_relevant,
            dependency_map,
            inverse_map,
        };
        tracing::info!(
            operators = task.num_operators(),
            edges = graph.num_edges(),
            goal_relevant = graph.num_goal_relevant(),
            "Built operator dependency graph"
        );
        graph
    }

    pub fn num_operators(&self) -> usize {
        self.facts.len()
    }

    pub fn fact_entry(&self, op: OperatorId, var: VarId) -> Option<&FactEntry> {
        self.facts[op.index()].get(&var)
    }

    pub fn changes_value(&self, op: OperatorId, var: VarId) -> bool {
        self.fact_entry(op, var).is_some_and(|e| e.changes_value)
    }

    pub fn is_goal_relevant(&self, op: OperatorId) -> bool {
        self.goal_relevant[op.index()]
    }

    /// Operators that depend on `op`.
    pub fn dependents(&self, op: OperatorId) -> &[OperatorId] {
        &self.dependency_map[op.index()]
    }

    /// Operators `op` depends on.
    pub fn inverse(&self, op: OperatorId) -> &[OperatorId] {
        &self.inverse_map[op.index()]
    }

    /// True if `op2` depends on `op1`.
    pub fn depends(&self, op1: OperatorId, op2: OperatorId) -> bool {
        self.dependents(op1).binary_search(&op2).is_ok()
    }

    pub fn num_edges(&self) -> usize {
        self.dependency_map.iter().map(Vec::len).sum()
    }

    pub fn num_goal_relevant(&self) -> usize {
        self.goal_relevant.iter().filter(|&&g| g).count()
    }
}

fn build_fact_table(task: &Task) -> Vec<HashMap<VarId, FactEntry>> {
    task.operators
        .iter()
        .map(|op| {
            let mut entries: HashMap<VarId, FactEntry> = op
                .preconditions
                .iter()
                .map(|pre| {
                    let entry = FactEntry {
                        precondition: Some(pre.value),
                        changes_value: false,
                    };
                    (pre.var, entry)
                })
                .collect();
            for eff in &op.effects {
                let entry = entries.entry(eff.var).or_insert(FactEntry {
                    precondition: None,
                    changes_value: true,
                });
                if let Some(pre) = entry.precondition {
                    if pre != eff.value {
                        entry.changes_value = true;
                    }
                }
            }
            entries
        })
        .collect()
}

fn is_goal_relevant(task: &Task, facts: &[HashMap<VarId, FactEntry>], id: OperatorId) -> bool {
    task.operator(id).preconditions.iter().any(|pre| {
        task.goal
            .iter()
            .any(|goal| goal.var == pre.var && goal.value != pre.value)
            && facts[id.index()][&pre.var].changes_value
    })
}

/// `op2` depends on `op1` if they share a precondition variable on which
/// either the values differ and `op1` changes it, or the values agree and
/// `op1` leaves it alone.
fn is_dependent(
    facts: &[HashMap<VarId, FactEntry>],
    op1: OperatorId,
    value1: Value,
    var: VarId,
    value2: Value,
) -> bool {
    let changes = facts[op1.index()][&var].changes_value;
    if value1 != value2 {
        changes
    } else {
        !changes
    }
}

fn build_edges(
    task: &Task,
    facts: &[HashMap<VarId, FactEntry>],
) -> (Vec<Vec<OperatorId>>, Vec<Vec<OperatorId>>) {
    let n = task.num_operators();

    // Only operators sharing a precondition variable can be related.
    let mut by_var: Vec<Vec<(OperatorId, Value)>> = vec![Vec::new(); task.variables.len()];
    for (id, op) in task.operators_with_ids() {
        for pre in &op.preconditions {
            by_var[pre.var].push((id, pre.value));
        }
    }

    let mut dependency_map = vec![Vec::new(); n];
    let mut inverse_map = vec![Vec::new(); n];
    let mut marked = vec![false; n];
    for (op1, op) in task.operators_with_ids() {
        let mut targets = Vec::new();
        for pre in &op.preconditions {
            for &(op2, value2) in &by_var[pre.var] {
                if op2 == op1 || marked[op2.index()] {
                    continue;
                }
                if is_dependent(facts, op1, pre.value, pre.var, value2) {
                    marked[op2.index()] = true;
                    targets.push(op2);
                }
            }
        }
        targets.sort_unstable();
        for &op2 in &targets {
            marked[op2.index()] = false;
            inverse_map[op2.index()].push(op1);
        }
        dependency_map[op1.index()] = targets;
    }
    (dependency_map, inverse_map)
}
