//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use plan_io::{PlanReader, PlanWriter, SearchResult};
use sas_task::Task;
use search::{DependencyGraph, SearchEngine};

use crate::config::{build_search_config, load_planner_toml, SearchOverrides};
use crate::results::{validate_plan, GraphSummary, Outcome};

/// Arguments for the `search` subcommand.
#[derive(Debug)]
pub struct SearchArgs {
    /// Path to the task JSON file.
    pub task: PathBuf,
    /// Optional search config TOML file.
    pub config: Option<PathBuf>,
    /// Where to write the plan if one is found.
    pub plan_file: PathBuf,
    pub overrides: SearchOverrides,
    /// Print the full result as JSON instead of a summary.
    pub json: bool,
}

/// Arguments for the `validate` subcommand.
#[derive(Debug)]
pub struct ValidateArgs {
    pub task: PathBuf,
    pub plan: PathBuf,
    pub json: bool,
}

/// Arguments for the `graph` subcommand.
#[derive(Debug)]
pub struct GraphArgs {
    pub task: PathBuf,
    /// Number of operators listed by fan-out.
    pub top: usize,
    pub json: bool,
}

fn load_task(path: &Path) -> anyhow::Result<Task> {
    Task::from_json(path).with_context(|| format!("failed to load task {}", path.display()))
}

/// Search for a plan and write it to `plan_file`.
pub fn run_search(args: SearchArgs) -> anyhow::Result<Outcome> {
    let start = Instant::now();

    // 1. Load task and config
    let task = load_task(&args.task)?;
    let toml = args
        .config
        .as_deref()
        .map(load_planner_toml)
        .transpose()?;
    let config = build_search_config(toml, &args.overrides);
    tracing::info!(
        evaluator = %config.evaluator,
        bound = ?config.bound,
        max_steps = config.max_steps,
        "Search configuration"
    );

    // 2. Search
    let engine = SearchEngine::new(config)?;
    let result = engine.search(&task)?;

    // 3. Write plan
    if result.solved {
        let mut writer = PlanWriter::new(args.plan_file.clone());
        writer.record_all(&result.plan);
        writer
            .finish(result.plan_cost, task.is_unit_cost())
            .with_context(|| format!("failed to write plan {}", args.plan_file.display()))?;
    }

    // 4. Report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_search_summary(&result, &args.plan_file);
        println!("Elapsed: {:.3}s", start.elapsed().as_secs_f64());
    }

    Ok(Outcome::from_termination(result.termination))
}

fn print_search_summary(result: &SearchResult, plan_file: &Path) {
    let stats = &result.stats;
    println!("--- Search Summary ---");
    println!("Task: {}", result.task_name);
    println!("Result: {}", result.termination);
    if result.solved {
        println!("Plan length: {}", result.plan_len());
        println!("Plan cost: {}", result.plan_cost);
        println!("Plan file: {}", plan_file.display());
    }
    println!("Expanded: {}", stats.expanded);
    println!("Evaluated: {}", stats.evaluated);
    println!("Generated: {}", stats.generated);
    println!("Dead ends: {}", stats.dead_ends);
    println!(
        "Steps: {} ({} forward, {} backward)",
        stats.steps, stats.forward_steps, stats.backward_steps
    );
    println!(
        "Entries: {} forward, {} backward",
        stats.forward_entries, stats.backward_entries
    );
    println!("Chains resolved: {}", stats.chains_resolved);
    println!("Operator stack nodes: {}", stats.op_stack_nodes);
    println!("Peak open list: {}", stats.peak_open_list_size);
}

/// Replay a plan file against a task.
pub fn run_validate(args: ValidateArgs) -> anyhow::Result<Outcome> {
    let task = load_task(&args.task)?;
    let plan = PlanReader::read(&args.plan)
        .with_context(|| format!("failed to read plan {}", args.plan.display()))?;
    let report = validate_plan(&task, &plan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("--- Plan Validation ---");
        println!("Task: {}", task.name);
        println!("Plan: {}", args.plan.display());
        println!("Steps: {}/{}", report.steps_applied, report.plan_length);
        println!("Cost: {}", report.cost);
        match &report.failure {
            None => println!("Plan valid"),
            Some(reason) => println!("Plan invalid: {reason}"),
        }
    }

    if report.valid {
        Ok(Outcome::Success)
    } else {
        tracing::warn!(failure = ?report.failure, "Plan invalid");
        Ok(Outcome::InvalidPlan)
    }
}

/// Print dependency-graph statistics.
pub fn run_graph(args: GraphArgs) -> anyhow::Result<Outcome> {
    let task = load_task(&args.task)?;
    let graph = DependencyGraph::build(&task);
    let summary = GraphSummary::build(&task, &graph, args.top);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("--- Dependency Graph ---");
        println!("Task: {}", summary.task);
        println!("Operators: {}", summary.operators);
        println!("Edges: {}", summary.edges);
        println!("Goal-relevant operators: {}", summary.goal_relevant);
        if summary.operators > 0 {
            let avg = summary.edges as f64 / summary.operators as f64;
            println!("Average fan-out: {avg:.2}");
        }
        for entry in &summary.top_fan_out {
            println!("  {:>6}  {}", entry.dependents, entry.operator);
        }
    }
    Ok(Outcome::Success)
}
