//! State evaluators used for dead-end detection and progress reporting.

use std::collections::HashMap;

use sas_task::{Cost, OperatorId, State, StateId, Task};

use crate::config::EvaluatorKind;

/// Heuristic estimate of a state's distance to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    Finite(Cost),
    /// The goal is unreachable from the state.
    DeadEnd,
}

impl Estimate {
    pub fn is_dead_end(self) -> bool {
        matches!(self, Self::DeadEnd)
    }

    pub fn value(self) -> Option<Cost> {
        match self {
            Self::Finite(h) => Some(h),
            Self::DeadEnd => None,
        }
    }
}

/// What an evaluator gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub state_id: StateId,
    pub state: &'a State,
    pub g: Cost,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(state_id: StateId, state: &'a State, g: Cost) -> Self {
        Self { state_id, state, g }
    }
}

/// A state evaluator.
///
/// Path-dependent evaluators additionally observe the initial state and
/// every transition the search generates.
pub trait Evaluator {
    fn name(&self) -> &'static str;

    fn compute(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate;

    /// True if repeated `compute` calls for a state are served from a cache.
    fn does_cache_estimates(&self) -> bool {
        false
    }

    fn is_path_dependent(&self) -> bool {
        false
    }

    fn notify_initial_state(&mut self, _state: &State) {}

    fn notify_state_transition(&mut self, _parent: &State, _op: OperatorId, _succ: &State) {}
}

/// Construct a boxed evaluator by kind.
pub fn build_evaluator(kind: EvaluatorKind) -> Box<dyn Evaluator> {
    match kind {
        EvaluatorKind::Blind => Box::new(BlindEvaluator),
        EvaluatorKind::GoalCount => Box::new(GoalCountEvaluator::default()),
        EvaluatorKind::Hmax => Box::new(HMaxEvaluator::default()),
    }
}

/// 0 for goal states, the cheapest operator cost otherwise.
#[derive(Debug, Default)]
pub struct BlindEvaluator;

impl Evaluator for BlindEvaluator {
    fn name(&self) -> &'static str {
        "blind"
    }

    fn compute(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate {
        if task.is_goal_state(ctx.state) {
            Estimate::Finite(0)
        } else {
            Estimate::Finite(task.min_operator_cost())
        }
    }
}

/// Number of unsatisfied goal facts.
#[derive(Debug, Default)]
pub struct GoalCountEvaluator {
    cache: HashMap<StateId, Estimate>,
}

impl Evaluator for GoalCountEvaluator {
    fn name(&self) -> &'static str {
        "goal_count"
    }

    fn compute(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate {
        *self.cache.entry(ctx.state_id).or_insert_with(|| {
            let unsatisfied = task
                .goal
                .iter()
                .filter(|g| ctx.state[g.var] != g.value)
                .count();
            Estimate::Finite(unsatisfied as Cost)
        })
    }

    fn does_cache_estimates(&self) -> bool {
        true
    }
}

/// Delete-relaxation h^max with real operator costs.
///
/// A goal fact that is unreachable even under the relaxation makes the
/// state a dead end.
#[derive(Debug, Default)]
pub struct HMaxEvaluator {
    cache: HashMap<StateId, Estimate>,
}

impl HMaxEvaluator {
    fn relaxed_cost(task: &Task, state: &State) -> Estimate {
        let mut fact_cost: Vec<Vec<Option<Cost>>> = task
            .variables
            .iter()
            .map(|v| vec![None; v.domain_size])
            .collect();
        for (var, &value) in state.values().iter().enumerate() {
            fact_cost[var][value] = Some(0);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for op in &task.operators {
                let mut pre_cost = 0;
                let mut reachable = true;
                for pre in &op.preconditions {
                    match fact_cost[pre.var][pre.value] {
                        Some(c) => pre_cost = pre_cost.max(c),
                        None => {
                            reachable = false;
                            break;
                        }
                    }
                }
                if !reachable {
                    continue;
                }
                let reached = pre_cost + op.cost;
                for eff in &op.effects {
                    let slot = &mut fact_cost[eff.var][eff.value];
                    if slot.map_or(true, |c| reached < c) {
                        *slot = Some(reached);
                        changed = true;
                    }
                }
            }
        }

        let mut h = 0;
        for goal in &task.goal {
            match fact_cost[goal.var][goal.value] {
                Some(c) => h = h.max(c),
                None => return Estimate::DeadEnd,
            }
        }
        Estimate::Finite(h)
    }
}

impl Evaluator for HMaxEvaluator {
    fn name(&self) -> &'static str {
        "hmax"
    }

    fn compute(&mut self, task: &Task, ctx: &EvaluationContext<'_>) -> Estimate {
        *self
            .cache
            .entry(ctx.state_id)
            .or_insert_with(|| Self::relaxed_cost(task, ctx.state))
    }

    fn does_cache_estimates(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::TaskBuilder;

    fn chain_task() -> Task {
        // x: 0 -> 1 -> 2, goal x = 2; y is never reachable at 1
        TaskBuilder::new("chain")
            .variable("x", 3)
            .variable("y", 2)
            .operator_with_cost("step-a", &[(0, 0)], &[(0, 1)], 2)
            .operator_with_cost("step-b", &[(0, 1)], &[(0, 2)], 3)
            .initial(&[0, 0])
            .goal(&[(0, 2)])
            .build()
    }

    fn eval(e: &mut dyn Evaluator, task: &Task, id: usize, values: Vec<usize>) -> Estimate {
        let state = State::new(values);
        e.compute(task, &EvaluationContext::new(StateId::new(id), &state, 0))
    }

    #[test]
    fn test_blind() {
        let task = chain_task();
        let mut e = BlindEvaluator;
        assert_eq!(eval(&mut e, &task, 0, vec![0, 0]), Estimate::Finite(2));
        assert_eq!(eval(&mut e, &task, 1, vec![2, 0]), Estimate::Finite(0));
        assert!(!e.does_cache_estimates());
    }

    #[test]
    fn test_goal_count() {
        let task = TaskBuilder::new("two-goals")
            .variable("a", 2)
            .variable("b", 2)
            .initial(&[0, 0])
            .goal(&[(0, 1), (1, 1)])
            .build();
        let mut e = GoalCountEvaluator::default();
        assert_eq!(eval(&mut e, &task, 0, vec![0, 0]), Estimate::Finite(2));
        assert_eq!(eval(&mut e, &task, 1, vec![1, 0]), Estimate::Finite(1));
        assert_eq!(eval(&mut e, &task, 2, vec![1, 1]), Estimate::Finite(0));
    }

    #[test]
    fn test_goal_count_is_cached_by_state_id() {
        let task = chain_task();
        let mut e = GoalCountEvaluator::default();
        assert_eq!(eval(&mut e, &task, 0, vec![0, 0]), Estimate::Finite(1));
        // Same id, different values: the cached estimate wins.
        assert_eq!(eval(&mut e, &task, 0, vec![2, 0]), Estimate::Finite(1));
        assert!(e.does_cache_estimates());
    }

    #[test]
    fn test_hmax_chain() {
        let task = chain_task();
        let mut e = HMaxEvaluator::default();
        assert_eq!(eval(&mut e, &task, 0, vec![0, 0]), Estimate::Finite(5));
        assert_eq!(eval(&mut e, &task, 1, vec![1, 0]), Estimate::Finite(3));
        assert_eq!(eval(&mut e, &task, 2, vec![2, 0]), Estimate::Finite(0));
    }

    #[test]
    fn test_hmax_dead_end() {
        let task = TaskBuilder::new("stuck")
            .variable("x", 3)
            .operator("forward", &[(0, 0)], &[(0, 1)])
            .initial(&[0])
            .goal(&[(0, 2)])
            .build();
        let mut e = HMaxEvaluator::default();
        let est = eval(&mut e, &task, 0, vec![0]);
        assert!(est.is_dead_end());
        assert_eq!(est.value(), None);
    }

    #[test]
    fn test_hmax_takes_max_over_goals() {
        let task = TaskBuilder::new("max")
            .variable("a", 2)
            .variable("b", 2)
            .operator_with_cost("set-a", &[], &[(0, 1)], 4)
            .operator_with_cost("set-b", &[], &[(1, 1)], 7)
            .initial(&[0, 0])
            .goal(&[(0, 1), (1, 1)])
            .build();
        let mut e = HMaxEvaluator::default();
        assert_eq!(eval(&mut e, &task, 0, vec![0, 0]), Estimate::Finite(7));
    }

    #[test]
    fn test_build_evaluator_names() {
        assert_eq!(build_evaluator(EvaluatorKind::Blind).name(), "blind");
        assert_eq!(build_evaluator(EvaluatorKind::GoalCount).name(), "goal_count");
        assert_eq!(build_evaluator(EvaluatorKind::Hmax).name(), "hmax");
        assert!(!build_evaluator(EvaluatorKind::Hmax).is_path_dependent());
    }
}
