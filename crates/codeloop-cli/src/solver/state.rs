//! Solver configuration and cycle outcomes

use std::time::Duration;

/// Model used when neither the CLI nor the user config names one.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default hard ceiling on think/execute/observe cycles.
pub const DEFAULT_MAX_CYCLES: usize = 5;

/// Default per-execution timeout.
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration for one solver instance.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Model to use
    pub model: String,
    /// Hard ceiling on cycles, counted once per cycle whether or not code ran
    pub max_cycles: usize,
    /// Timeout for each sandboxed execution
    pub exec_timeout: Duration,
    /// Print each cycle's raw content; purely observational
    pub debug: bool,
    /// Override for the built-in system prompt
    pub system_prompt: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_cycles: DEFAULT_MAX_CYCLES,
            exec_timeout: DEFAULT_EXEC_TIMEOUT,
            debug: false,
            system_prompt: None,
        }
    }
}

impl SolverConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// The budget must stay positive; zero is clamped to one cycle.
    pub fn with_max_cycles(mut self, max: usize) -> Self {
        self.max_cycles = max.max(1);
        self
    }

    pub fn with_exec_timeout(mut self, timeout: Duration) -> Self {
        self.exec_timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Outcome of one think/execute/observe cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Budget remains; run another cycle
    Continue,
    /// The model signalled a final answer
    Solved(String),
    /// Budget consumed without an explicit solve
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config_builder() {
        let config = SolverConfig::new("test-model")
            .with_max_cycles(10)
            .with_exec_timeout(Duration::from_secs(5))
            .with_debug(true)
            .with_system_prompt("You are terse");

        assert_eq!(config.model, "test-model");
        assert_eq!(config.max_cycles, 10);
        assert_eq!(config.exec_timeout, Duration::from_secs(5));
        assert!(config.debug);
        assert_eq!(config.system_prompt, Some("You are terse".to_string()));
    }

    #[test]
    fn test_max_cycles_clamped_to_positive() {
        let config = SolverConfig::default().with_max_cycles(0);
        assert_eq!(config.max_cycles, 1);
    }

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_cycles, 5);
        assert_eq!(config.exec_timeout, Duration::from_secs(30));
        assert!(!config.debug);
    }
}
