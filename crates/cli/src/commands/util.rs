use std::path::Path;

use anyhow::Result;

use avrcycles_core::config::{load_analyzer_config, AnalyzerConfig};

/// Load the analyzer config from `path`, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => load_analyzer_config(path),
        None => Ok(AnalyzerConfig::default()),
    }
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_overrides(
    mut config: AnalyzerConfig,
    dialect: Option<String>,
    recursion_cost: Option<u64>,
) -> AnalyzerConfig {
    if dialect.is_some() {
        config.dialect = dialect;
    }
    if let Some(cost) = recursion_cost {
        config.recursion_cost = cost;
    }
    config
}
