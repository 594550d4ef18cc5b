//! TOML config loading for the planner CLI.
//!
//! Deserializes a config file with a `[search]` section, then merges CLI
//! overrides on top.

use std::path::Path;

use anyhow::Context;
use sas_task::Cost;
use search::{EvaluatorKind, SearchConfig};
use serde::Deserialize;

/// Top-level structure matching `configs/search.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct PlannerToml {
    /// Search parameters. Missing fields take their defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Search settings given on the command line.
#[derive(Debug, Default, Clone)]
pub struct SearchOverrides {
    pub bound: Option<Cost>,
    pub max_steps: Option<u64>,
    pub max_time_secs: Option<u64>,
    pub evaluator: Option<EvaluatorKind>,
}

/// Load and deserialize a `PlannerToml` from a TOML file.
pub fn load_planner_toml(path: &Path) -> anyhow::Result<PlannerToml> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: PlannerToml = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded search config");
    Ok(config)
}

/// Build the effective `SearchConfig`.
///
/// Priority chain: defaults < TOML values < CLI flags.
pub fn build_search_config(toml: Option<PlannerToml>, overrides: &SearchOverrides) -> SearchConfig {
    let mut config = toml.map(|t| t.search).unwrap_or_default();
    if let Some(bound) = overrides.bound {
        config.bound = Some(bound);
    }
    if let Some(n) = overrides.max_steps {
        config.max_steps = n;
    }
    if let Some(n) = overrides.max_time_secs {
        config.max_time_secs = n;
    }
    if let Some(kind) = overrides.evaluator {
        config.evaluator = kind;
    }
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use search::CostType;

    use super::*;

    #[test]
    fn test_deserialize_full_planner_toml() {
        let toml_str = r#"
[search]
bound = 50
max_steps = 10000
max_time_secs = 60
cost_type = "one"
evaluator = "hmax"
lazy_evaluator = "goal_count"
progress_log = false
"#;
        let config: PlannerToml = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.bound, Some(50));
        assert_eq!(config.search.max_steps, 10000);
        assert_eq!(config.search.max_time_secs, 60);
        assert_eq!(config.search.cost_type, CostType::One);
        assert_eq!(config.search.evaluator, EvaluatorKind::Hmax);
        assert_eq!(config.search.lazy_evaluator, Some(EvaluatorKind::GoalCount));
        assert!(!config.search.progress_log);
    }

    #[test]
    fn test_missing_search_section_uses_defaults() {
        let config: PlannerToml = toml::from_str("").unwrap();
        assert_eq!(config.search.bound, None);
        assert_eq!(config.search.evaluator, EvaluatorKind::GoalCount);
    }

    #[test]
    fn test_cli_overrides_take_priority() {
        let toml: PlannerToml = toml::from_str(
            r#"
[search]
bound = 50
max_steps = 100
evaluator = "blind"
"#,
        )
        .unwrap();
        let overrides = SearchOverrides {
            bound: Some(7),
            evaluator: Some(EvaluatorKind::Hmax),
            ..Default::default()
        };
        let config = build_search_config(Some(toml), &overrides);
        assert_eq!(config.bound, Some(7));
        assert_eq!(config.evaluator, EvaluatorKind::Hmax);
        // Not overridden: TOML value kept.
        assert_eq!(config.max_steps, 100);
    }

    #[test]
    fn test_no_toml_no_overrides_is_default() {
        let config = build_search_config(None, &SearchOverrides::default());
        assert_eq!(config.bound, None);
        assert_eq!(config.max_steps, 0);
        assert!(config.progress_log);
    }

    #[test]
    fn test_load_planner_toml_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nmax_steps = 3").unwrap();
        let config = load_planner_toml(file.path()).unwrap();
        assert_eq!(config.search.max_steps, 3);
    }

    #[test]
    fn test_load_planner_toml_rejects_unknown_evaluator() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nevaluator = \"ff\"").unwrap();
        let err = load_planner_toml(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }
}
