//! Integration tests for the search crate: tasks loaded from JSON and run
//! end-to-end through `SearchEngine`, plus checks on the public stepping API.

use sas_task::{OperatorId, State, StateRegistry, Task};
use search::{
    DependencyGraph, FwdbwdSearch, SearchConfig, SearchEngine, SearchStatus, TerminationReason,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Two-block stacking: move A from the table onto B while the hand is free.
const BLOCKS_JSON: &str = r#"{
    "name": "blocks-2",
    "variables": [
        {"name": "a-on", "domain_size": 3, "fact_names": ["table", "b", "hand"]},
        {"name": "hand-free", "domain_size": 2}
    ],
    "operators": [
        {"name": "pick-a", "preconditions": [{"var": 0, "value": 0}, {"var": 1, "value": 1}],
         "effects": [{"var": 0, "value": 2}, {"var": 1, "value": 0}]},
        {"name": "stack-a-b", "preconditions": [{"var": 0, "value": 2}],
         "effects": [{"var": 0, "value": 1}, {"var": 1, "value": 1}]},
        {"name": "put-a", "preconditions": [{"var": 0, "value": 2}],
         "effects": [{"var": 0, "value": 0}, {"var": 1, "value": 1}]}
    ],
    "initial_state": [0, 1],
    "goal": [{"var": 0, "value": 1}]
}"#;

/// Counter over three bits with a goal needing all of them.
fn counter_task() -> Task {
    let json = r#"{
        "name": "bits",
        "variables": [
            {"name": "b0", "domain_size": 2},
            {"name": "b1", "domain_size": 2},
            {"name": "b2", "domain_size": 2}
        ],
        "operators": [
            {"name": "set-b0", "preconditions": [{"var": 0, "value": 0}], "effects": [{"var": 0, "value": 1}]},
            {"name": "set-b1", "preconditions": [{"var": 0, "value": 1}, {"var": 1, "value": 0}], "effects": [{"var": 1, "value": 1}]},
            {"name": "set-b2", "preconditions": [{"var": 1, "value": 1}, {"var": 2, "value": 0}], "effects": [{"var": 2, "value": 1}], "cost": 2}
        ],
        "initial_state": [0, 0, 0],
        "goal": [{"var": 0, "value": 1}, {"var": 1, "value": 1}, {"var": 2, "value": 1}]
    }"#;
    Task::from_json_str(json).unwrap()
}

/// Replay `plan` from the initial state; true if it ends in a goal state.
fn replays_to_goal(task: &Task, plan: &[String]) -> bool {
    let mut registry = StateRegistry::new();
    let mut id = registry.get_initial_state(task);
    for name in plan {
        let Some(op) = task.find_operator(name) else {
            return false;
        };
        let operator = task.operator(op);
        if !operator.is_applicable(registry.lookup(id)) {
            return false;
        }
        id = registry.get_successor_state(id, operator);
    }
    task.is_goal_state(registry.lookup(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_blocks_plan_is_valid() {
    let task = Task::from_json_str(BLOCKS_JSON).unwrap();
    let engine = SearchEngine::new(SearchConfig::default()).unwrap();
    let result = engine.search(&task).unwrap();
    assert!(result.solved);
    assert_eq!(result.plan, vec!["pick-a", "stack-a-b"]);
    assert_eq!(result.plan_cost, 2);
    assert!(replays_to_goal(&task, &result.plan));
}

#[test]
fn test_counter_plan_with_every_evaluator() {
    let task = counter_task();
    for evaluator in ["blind", "goal_count", "hmax"] {
        let config = SearchConfig {
            evaluator: evaluator.parse().unwrap(),
            ..Default::default()
        };
        let result = SearchEngine::new(config).unwrap().search(&task).unwrap();
        assert!(result.solved, "{evaluator} did not solve");
        assert_eq!(result.plan, vec!["set-b0", "set-b1", "set-b2"]);
        assert_eq!(result.plan_cost, 4);
        assert!(replays_to_goal(&task, &result.plan));
    }
}

#[test]
fn test_lazy_evaluator_run() {
    let task = counter_task();
    let config: SearchConfig = toml::from_str(
        r#"
            evaluator = "blind"
            lazy_evaluator = "hmax"
        "#,
    )
    .unwrap();
    let result = SearchEngine::new(config).unwrap().search(&task).unwrap();
    assert!(result.solved);
    assert!(replays_to_goal(&task, &result.plan));
}

#[test]
fn test_bound_below_plan_cost_exhausts() {
    let task = counter_task();
    let config = SearchConfig {
        bound: Some(4),
        ..Default::default()
    };
    let result = SearchEngine::new(config).unwrap().search(&task).unwrap();
    assert!(!result.solved);
    assert_eq!(result.termination, TerminationReason::Exhausted);

    let config = SearchConfig {
        bound: Some(5),
        ..Default::default()
    };
    let result = SearchEngine::new(config).unwrap().search(&task).unwrap();
    assert!(result.solved);
}

#[test]
fn test_stats_are_consistent() {
    let task = Task::from_json_str(BLOCKS_JSON).unwrap();
    let result = SearchEngine::new(SearchConfig::default())
        .unwrap()
        .search(&task)
        .unwrap();
    let stats = &result.stats;
    assert_eq!(stats.steps, stats.forward_steps + stats.backward_steps);
    assert!(stats.expanded <= stats.steps);
    assert!(stats.evaluated <= stats.generated + 1);
    assert!(stats.peak_open_list_size >= 1);
    assert_eq!(stats.op_stack_nodes, 0, "no pending operator in this task");
}

#[test]
fn test_step_api_on_single_operator_task() {
    let task = Task::from_json_str(
        r#"{
            "variables": [{"name": "x", "domain_size": 2}],
            "operators": [{"name": "set", "preconditions": [{"var": 0, "value": 0}], "effects": [{"var": 0, "value": 1}]}],
            "initial_state": [0],
            "goal": [{"var": 0, "value": 1}]
        }"#,
    )
    .unwrap();
    let mut search = FwdbwdSearch::new(&task, SearchConfig::default()).unwrap();
    assert!(search.initialize());
    assert_eq!(search.step(), SearchStatus::InProgress);
    assert_eq!(search.step(), SearchStatus::Solved);
    assert_eq!(search.plan(), Some(&[OperatorId::new(0)][..]));

    let goal = search.registry().get_id(&State::new(vec![1])).unwrap();
    assert_eq!(search.search_space().get(goal).real_g, 1);
}

#[test]
fn test_dependency_graph_properties_on_loaded_task() {
    let task = counter_task();
    let graph = DependencyGraph::build(&task);
    for (a, _) in task.operators_with_ids() {
        assert!(!graph.dependents(a).contains(&a));
        for (b, _) in task.operators_with_ids() {
            assert_eq!(
                graph.inverse(a).contains(&b),
                graph.dependents(b).contains(&a),
                "{a} / {b}"
            );
        }
    }
}

#[test]
fn test_regression_chain_end_to_end() {
    // After "raise" the only related operator, "finish", still needs "close";
    // the plan is completed through the operator stack.
    let task = Task::from_json_str(
        r#"{
            "name": "chain",
            "variables": [
                {"name": "a", "domain_size": 2},
                {"name": "c", "domain_size": 2},
                {"name": "done", "domain_size": 2},
                {"name": "h", "domain_size": 2},
                {"name": "k", "domain_size": 2}
            ],
            "operators": [
                {"name": "raise", "preconditions": [{"var": 0, "value": 0}, {"var": 3, "value": 0}],
                 "effects": [{"var": 0, "value": 1}]},
                {"name": "finish", "preconditions": [{"var": 0, "value": 1}, {"var": 1, "value": 1}, {"var": 3, "value": 0}, {"var": 4, "value": 0}],
                 "effects": [{"var": 2, "value": 1}]},
                {"name": "close", "preconditions": [{"var": 1, "value": 0}, {"var": 4, "value": 0}],
                 "effects": [{"var": 1, "value": 1}]}
            ],
            "initial_state": [0, 0, 0, 0, 0],
            "goal": [{"var": 2, "value": 1}]
        }"#,
    )
    .unwrap();
    let result = SearchEngine::new(SearchConfig::default())
        .unwrap()
        .search(&task)
        .unwrap();
    assert!(result.solved);
    assert_eq!(result.plan, vec!["raise", "close", "finish"]);
    assert!(replays_to_goal(&task, &result.plan));
    assert_eq!(result.stats.backward_steps, 3);
    assert_eq!(result.stats.chains_resolved, 1);
    assert!(result.stats.op_stack_nodes >= 3);
}
