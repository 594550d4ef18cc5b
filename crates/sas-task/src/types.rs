//! Core data types for finite-domain planning tasks.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::State;

/// Index of a state variable.
pub type VarId = usize;

/// Value in a variable's domain.
pub type Value = usize;

/// Operator and path cost.
pub type Cost = i64;

/// Errors raised while loading or validating a task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The task file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The task file is not valid task JSON.
    #[error("Task parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fact refers to a variable that does not exist.
    #[error("{context}: unknown variable {var} (task has {num_variables})")]
    UnknownVariable {
        context: String,
        var: VarId,
        num_variables: usize,
    },

    /// A fact assigns a value outside the variable's domain.
    #[error("{context}: value {value} out of range for variable {var} (domain size {domain_size})")]
    ValueOutOfRange {
        context: String,
        var: VarId,
        value: Value,
        domain_size: usize,
    },

    /// The initial state does not assign exactly one value per variable.
    #[error("initial state has {got} values, expected {expected}")]
    InitialStateLength { got: usize, expected: usize },

    /// An operator mentions the same variable twice in its preconditions or effects.
    #[error("operator '{operator}': duplicate {kind} on variable {var}")]
    DuplicateVariable {
        operator: String,
        kind: &'static str,
        var: VarId,
    },

    /// An operator has a negative cost.
    #[error("operator '{operator}': negative cost {cost}")]
    NegativeCost { operator: String, cost: Cost },
}

/// Compact handle for an operator of one task.
///
/// Handles carry no reference to their task; mixing ids of different
/// tasks is a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId(u32);

impl OperatorId {
    /// Marks "no operator", e.g. for the initial state.
    pub const NO_OPERATOR: OperatorId = OperatorId(u32::MAX);

    pub fn new(index: usize) -> Self {
        OperatorId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self == Self::NO_OPERATOR
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "op#none")
        } else {
            write!(f, "op#{}", self.0)
        }
    }
}

/// Handle of an interned state in a [`StateRegistry`](crate::StateRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(u32);

impl StateId {
    pub const NO_STATE: StateId = StateId(u32::MAX);

    pub fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s#{}", self.0)
    }
}

/// A variable/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub var: VarId,
    pub value: Value,
}

impl Fact {
    pub fn new(var: VarId, value: Value) -> Self {
        Self { var, value }
    }
}

/// A finite-domain state variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
    /// Optional human-readable names, one per value.
    #[serde(default)]
    pub fact_names: Vec<String>,
}

/// An action with preconditions, unconditional effects and a cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Fact>,
    #[serde(default = "default_cost")]
    pub cost: Cost,
}

fn default_cost() -> Cost {
    1
}

impl Operator {
    /// Precondition value on `var`, if the operator has one.
    pub fn precondition_on(&self, var: VarId) -> Option<Value> {
        self.preconditions
            .iter()
            .find(|f| f.var == var)
            .map(|f| f.value)
    }

    /// True if every precondition holds in `state`.
    pub fn is_applicable(&self, state: &State) -> bool {
        self.preconditions
            .iter()
            .all(|pre| state[pre.var] == pre.value)
    }
}

/// A complete planning task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub name: String,
    pub variables: Vec<Variable>,
    pub operators: Vec<Operator>,
    pub initial_state: Vec<Value>,
    pub goal: Vec<Fact>,
}

impl Task {
    /// Load and validate a task from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self, TaskError> {
        let contents = std::fs::read_to_string(path)?;
        let mut task = Self::from_json_str(&contents)?;
        if task.name.is_empty() {
            task.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        tracing::info!(
            path = %path.display(),
            variables = task.variables.len(),
            operators = task.operators.len(),
            "Loaded task"
        );
        Ok(task)
    }

    /// Parse and validate a task from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TaskError> {
        let task: Task = serde_json::from_str(json)?;
        task.validate()?;
        Ok(task)
    }

    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id.index()]
    }

    /// Iterate `(id, operator)` pairs in id order.
    pub fn operators_with_ids(&self) -> impl Iterator<Item = (OperatorId, &Operator)> {
        self.operators
            .iter()
            .enumerate()
            .map(|(i, op)| (OperatorId::new(i), op))
    }

    /// Goal value required on `var`, if any.
    pub fn goal_on(&self, var: VarId) -> Option<Value> {
        self.goal.iter().find(|f| f.var == var).map(|f| f.value)
    }

    pub fn is_goal_state(&self, state: &State) -> bool {
        self.goal.iter().all(|g| state[g.var] == g.value)
    }

    /// Smallest operator cost, 0 for a task without operators.
    pub fn min_operator_cost(&self) -> Cost {
        self.operators.iter().map(|op| op.cost).min().unwrap_or(0)
    }

    /// True if every operator costs exactly 1.
    pub fn is_unit_cost(&self) -> bool {
        self.operators.iter().all(|op| op.cost == 1)
    }

    /// Look up an operator by name.
    pub fn find_operator(&self, name: &str) -> Option<OperatorId> {
        self.operators
            .iter()
            .position(|op| op.name == name)
            .map(OperatorId::new)
    }

    /// Check the structural invariants the search relies on.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.initial_state.len() != self.variables.len() {
            return Err(TaskError::InitialStateLength {
                got: self.initial_state.len(),
                expected: self.variables.len(),
            });
        }
        for (var, &value) in self.initial_state.iter().enumerate() {
            self.check_fact("initial state", Fact::new(var, value))?;
        }
        for fact in &self.goal {
            self.check_fact("goal", *fact)?;
        }
        for op in &self.operators {
            if op.cost < 0 {
                return Err(TaskError::NegativeCost {
                    operator: op.name.clone(),
                    cost: op.cost,
                });
            }
            for (kind, facts) in [("precondition", &op.preconditions), ("effect", &op.effects)] {
                let mut seen = vec![false; self.variables.len()];
                for fact in facts {
                    self.check_fact(&format!("operator '{}'", op.name), *fact)?;
                    if std::mem::replace(&mut seen[fact.var], true) {
                        return Err(TaskError::DuplicateVariable {
                            operator: op.name.clone(),
                            kind,
                            var: fact.var,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_fact(&self, context: &str, fact: Fact) -> Result<(), TaskError> {
        let Some(variable) = self.variables.get(fact.var) else {
            return Err(TaskError::UnknownVariable {
                context: context.to_string(),
                var: fact.var,
                num_variables: self.variables.len(),
            });
        };
        if fact.value >= variable.domain_size {
            return Err(TaskError::ValueOutOfRange {
                context: context.to_string(),
                var: fact.var,
                value: fact.value,
                domain_size: variable.domain_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_json() -> &'static str {
        r#"{
            "name": "toy",
            "variables": [
                {"name": "at", "domain_size": 2},
                {"name": "holding", "domain_size": 2, "fact_names": ["no", "yes"]}
            ],
            "operators": [
                {"name": "move", "preconditions": [{"var": 0, "value": 0}], "effects": [{"var": 0, "value": 1}]},
                {"name": "pick", "preconditions": [{"var": 0, "value": 1}], "effects": [{"var": 1, "value": 1}], "cost": 3}
            ],
            "initial_state": [0, 0],
            "goal": [{"var": 1, "value": 1}]
        }"#
    }

    #[test]
    fn test_parse_task() {
        let task = Task::from_json_str(two_var_json()).unwrap();
        assert_eq!(task.name, "toy");
        assert_eq!(task.num_operators(), 2);
        assert_eq!(task.operators[0].cost, 1, "cost defaults to 1");
        assert_eq!(task.operators[1].cost, 3);
        assert_eq!(task.variables[1].fact_names, vec!["no", "yes"]);
        assert_eq!(task.goal_on(1), Some(1));
        assert_eq!(task.goal_on(0), None);
    }

    #[test]
    fn test_operator_lookup() {
        let task = Task::from_json_str(two_var_json()).unwrap();
        assert_eq!(task.find_operator("pick"), Some(OperatorId::new(1)));
        assert_eq!(task.find_operator("drop"), None);
        assert_eq!(task.operator(OperatorId::new(0)).name, "move");
        assert_eq!(task.min_operator_cost(), 1);
        assert!(!task.is_unit_cost());
    }

    #[test]
    fn test_precondition_on() {
        let task = Task::from_json_str(two_var_json()).unwrap();
        let pick = &task.operators[1];
        assert_eq!(pick.precondition_on(0), Some(1));
        assert_eq!(pick.precondition_on(1), None);
    }

    #[test]
    fn test_goal_and_applicability() {
        let task = Task::from_json_str(two_var_json()).unwrap();
        let s0 = State::new(vec![0, 0]);
        let s1 = State::new(vec![1, 1]);
        assert!(!task.is_goal_state(&s0));
        assert!(task.is_goal_state(&s1));
        assert!(task.operators[0].is_applicable(&s0));
        assert!(!task.operators[1].is_applicable(&s0));
    }

    #[test]
    fn test_no_operator_sentinel() {
        assert!(OperatorId::NO_OPERATOR.is_none());
        assert!(!OperatorId::new(0).is_none());
        assert_eq!(OperatorId::NO_OPERATOR.to_string(), "op#none");
        assert_eq!(OperatorId::new(7).to_string(), "op#7");
    }

    #[test]
    fn test_validate_initial_state_length() {
        let mut task = Task::from_json_str(two_var_json()).unwrap();
        task.initial_state.pop();
        assert!(matches!(
            task.validate(),
            Err(TaskError::InitialStateLength { got: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_validate_value_out_of_range() {
        let mut task = Task::from_json_str(two_var_json()).unwrap();
        task.goal.push(Fact::new(0, 5));
        let err = task.validate().unwrap_err();
        assert!(matches!(err, TaskError::ValueOutOfRange { value: 5, .. }));
        assert!(err.to_string().contains("goal"));
    }

    #[test]
    fn test_validate_unknown_variable() {
        let mut task = Task::from_json_str(two_var_json()).unwrap();
        task.operators[0].effects.push(Fact::new(9, 0));
        assert!(matches!(
            task.validate(),
            Err(TaskError::UnknownVariable { var: 9, .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_precondition() {
        let mut task = Task::from_json_str(two_var_json()).unwrap();
        task.operators[0].preconditions.push(Fact::new(0, 1));
        assert!(matches!(
            task.validate(),
            Err(TaskError::DuplicateVariable { kind: "precondition", var: 0, .. })
        ));
    }

    #[test]
    fn test_validate_negative_cost() {
        let mut task = Task::from_json_str(two_var_json()).unwrap();
        task.operators[1].cost = -2;
        assert!(matches!(task.validate(), Err(TaskError::NegativeCost { cost: -2, .. })));
    }

    #[test]
    fn test_from_json_file_names_task_after_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gripper-01.json");
        let json = two_var_json().replace("\"name\": \"toy\",", "");
        std::fs::write(&path, json).unwrap();
        let task = Task::from_json(&path).unwrap();
        assert_eq!(task.name, "gripper-01");
    }

    #[test]
    fn test_from_json_missing_file() {
        let err = Task::from_json(Path::new("/nonexistent/task.json")).unwrap_err();
        assert!(matches!(err, TaskError::Io(_)));
    }
}
