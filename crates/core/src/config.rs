use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::CostTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cost override for '{0}' must be at least 1 cycle")]
    ZeroCost(String),
    #[error("cost override has an empty mnemonic")]
    EmptyMnemonic,
    #[error("unsupported config format '{0}' (expected .json, .yaml, or .yml)")]
    UnsupportedFormat(String),
}

/// Serializable analyzer settings, loaded from JSON or YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Schema/config version.
    #[serde(default = "default_config_version")]
    pub config_version: String,
    /// Listing dialect name; the objdump dialect when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Cycles charged for a call edge that closes a recursion cycle.
    #[serde(default)]
    pub recursion_cost: u64,
    /// Mnemonic costs added to or replacing the built-in table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cost_overrides: BTreeMap<String, u32>,
    /// File extensions accepted as listings, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_config_version() -> String {
    "0.1.0".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["avra".to_string(), "lss".to_string()]
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            dialect: None,
            recursion_cost: 0,
            cost_overrides: BTreeMap::new(),
            extensions: default_extensions(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (mnemonic, cycles) in &self.cost_overrides {
            if mnemonic.trim().is_empty() {
                return Err(ConfigError::EmptyMnemonic);
            }
            if *cycles == 0 {
                return Err(ConfigError::ZeroCost(mnemonic.clone()));
            }
        }
        Ok(())
    }

    /// Built-in table with this config's overrides applied.
    pub fn cost_table(&self) -> CostTable {
        if self.cost_overrides.is_empty() {
            CostTable::avr().clone()
        } else {
            CostTable::avr().with_overrides(&self.cost_overrides)
        }
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Load and validate an analyzer config; the format follows the file extension.
pub fn load_analyzer_config(path: &Path) -> Result<AnalyzerConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analyzer config at {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config: AnalyzerConfig = match extension {
        "json" => serde_json::from_str(&body).context("Failed to parse analyzer config JSON")?,
        "yaml" | "yml" => {
            serde_yaml::from_str(&body).context("Failed to parse analyzer config YAML")?
        }
        other => return Err(ConfigError::UnsupportedFormat(other.to_string()).into()),
    };
    config
        .validate()
        .with_context(|| format!("Invalid analyzer config at {}", path.display()))?;
    Ok(config)
}
