//! User configuration for the codeloop CLI
//!
//! Configuration file: ~/.config/codeloop/config.toml (or platform equivalent)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the codeloop CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Solver defaults
    #[serde(default)]
    pub solver: SolverDefaults,
}

/// Defaults applied when the CLI flags don't override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverDefaults {
    /// Default model for solve
    #[serde(default)]
    pub default_model: Option<String>,

    /// Maximum think/execute/observe cycles
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// Per-execution timeout in seconds
    #[serde(default = "default_exec_timeout_secs")]
    pub exec_timeout_secs: u64,

    /// Interpreter used to run code fragments
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Override for the built-in system prompt
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_cycles() -> usize {
    5
}

fn default_exec_timeout_secs() -> u64 {
    30
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl Default for SolverDefaults {
    fn default() -> Self {
        Self {
            default_model: None,
            max_cycles: default_max_cycles(),
            exec_timeout_secs: default_exec_timeout_secs(),
            interpreter: default_interpreter(),
            system_prompt: None,
        }
    }
}

impl UserConfig {
    /// Load user configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save configuration to the default location
    #[allow(dead_code)]
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;

        Ok(path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("codeloop").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UserConfig::default();
        assert_eq!(config.solver.max_cycles, 5);
        assert_eq!(config.solver.exec_timeout_secs, 30);
        assert_eq!(config.solver.interpreter, "python3");
        assert!(config.solver.default_model.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[solver]
default_model = "qwen2.5-coder:7b"
max_cycles = 8
"#;
        let config: UserConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.solver.default_model.as_deref(), Some("qwen2.5-coder:7b"));
        assert_eq!(config.solver.max_cycles, 8);
        // Unspecified fields keep their defaults.
        assert_eq!(config.solver.exec_timeout_secs, 30);
        assert_eq!(config.solver.interpreter, "python3");
    }

    #[test]
    fn test_round_trip() {
        let config = UserConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: UserConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.solver.max_cycles, config.solver.max_cycles);
    }
}
