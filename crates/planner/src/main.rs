mod config;
mod pipeline;
pub mod results;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::SearchOverrides;
use pipeline::{GraphArgs, SearchArgs, ValidateArgs};
use search::EvaluatorKind;

/// fwdbwd-planner: forward/backward best-first planner for SAS+ tasks.
#[derive(Parser)]
#[command(name = "fwdbwd-planner", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands for planning, plan validation and graph inspection.
#[derive(Subcommand)]
enum Command {
    /// Search for a plan and write it to a plan file.
    Search {
        /// Path to the task JSON file.
        #[arg(long)]
        task: PathBuf,
        /// Path to search config TOML file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to write the plan.
        #[arg(long, default_value = "sas_plan")]
        plan_file: PathBuf,
        /// Override the cost bound.
        #[arg(long)]
        bound: Option<i64>,
        /// Override the step budget (0 = unlimited).
        #[arg(long)]
        max_steps: Option<u64>,
        /// Override the wall-clock limit in seconds (0 = unlimited).
        #[arg(long)]
        max_time_secs: Option<u64>,
        /// Override the evaluator: blind, goal_count or hmax.
        #[arg(long)]
        evaluator: Option<EvaluatorKind>,
        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
    /// Replay a plan file and check that it reaches the goal.
    Validate {
        /// Path to the task JSON file.
        #[arg(long)]
        task: PathBuf,
        /// Path to the plan file.
        #[arg(long)]
        plan: PathBuf,
        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
    /// Print operator dependency-graph statistics.
    Graph {
        /// Path to the task JSON file.
        #[arg(long)]
        task: PathBuf,
        /// Number of operators to list by fan-out.
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Search {
            task,
            config,
            plan_file,
            bound,
            max_steps,
            max_time_secs,
            evaluator,
            json,
        } => pipeline::run_search(SearchArgs {
            task,
            config,
            plan_file,
            overrides: SearchOverrides {
                bound,
                max_steps,
                max_time_secs,
                evaluator,
            },
            json,
        }),
        Command::Validate { task, plan, json } => {
            pipeline::run_validate(ValidateArgs { task, plan, json })
        }
        Command::Graph { task, top, json } => pipeline::run_graph(GraphArgs { task, top, json }),
    };

    match outcome {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Input error");
            eprintln!("error: {e:#}");
            ExitCode::from(results::INPUT_ERROR_EXIT_CODE)
        }
    }
}
