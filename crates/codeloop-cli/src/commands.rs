//! CLI commands implementation

use anyhow::Result;
use llm_core::{Config, OllamaClient, OllamaStatus};
use std::time::Duration;

use crate::config::UserConfig;
use crate::sandbox::SubprocessSandbox;
use crate::solver::{Solver, SolverConfig, DEFAULT_MODEL};

// ANSI color codes
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn print_status(ok: bool, msg: &str) {
    let icon = if ok {
        format!("{}✓{}", GREEN, RESET)
    } else {
        format!("{}✗{}", RED, RESET)
    };
    println!("  {} {}", icon, msg);
}

/// Options collected from the `solve` subcommand
pub struct SolveArgs {
    pub query: String,
    pub model: Option<String>,
    pub max_cycles: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub interpreter: Option<String>,
    pub debug: bool,
}

/// Run one solve invocation and print the answer
pub async fn solve(args: SolveArgs) -> Result<()> {
    let config = Config::try_load().unwrap_or_else(Config::default_minimal);
    let user = UserConfig::load().unwrap_or_default();
    let client = OllamaClient::new(config.ollama_url());

    if !client.health_check().await.unwrap_or(false) {
        anyhow::bail!(
            "Ollama is not running at {}. Start with: ollama serve",
            config.ollama_url()
        );
    }

    let model = args
        .model
        .or(user.solver.default_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mut solver_config = SolverConfig::new(model)
        .with_max_cycles(args.max_cycles.unwrap_or(user.solver.max_cycles))
        .with_exec_timeout(Duration::from_secs(
            args.timeout_secs.unwrap_or(user.solver.exec_timeout_secs),
        ))
        .with_debug(args.debug);
    if let Some(prompt) = user.solver.system_prompt {
        solver_config = solver_config.with_system_prompt(prompt);
    }

    let interpreter = args.interpreter.unwrap_or(user.solver.interpreter);
    let sandbox = SubprocessSandbox::with_interpreter(interpreter);

    let solver = Solver::new(Box::new(client), Box::new(sandbox), solver_config);
    let answer = solver.solve(&args.query).await?;

    println!("{}", answer);
    Ok(())
}

/// Show Ollama status and installed models
pub async fn status() -> Result<()> {
    let config = Config::try_load().unwrap_or_else(Config::default_minimal);
    let client = OllamaClient::new(config.ollama_url());

    println!("{}Ollama Status{}", BOLD, RESET);
    println!("  Endpoint: {}", config.ollama_url());

    match client.status().await {
        OllamaStatus::Running => {
            print_status(true, "Ollama is running");
        }
        OllamaStatus::Stopped => {
            print_status(false, "Ollama is not running");
            println!("\n  Start with: {}ollama serve{}", BLUE, RESET);
            return Ok(());
        }
    }

    match client.list_models().await {
        Ok(models) => {
            println!("\n{}Installed Models ({}){}", BOLD, models.len(), RESET);
            if models.is_empty() {
                println!("  {}No models installed{}", YELLOW, RESET);
                println!("  Run: {}ollama pull {}{}", BLUE, DEFAULT_MODEL, RESET);
            } else {
                let mut sorted = models.clone();
                sorted.sort_by(|a, b| a.name.cmp(&b.name));
                for m in sorted {
                    println!("  - {} ({})", m.name, m.size_human());
                }
            }
        }
        Err(e) => {
            print_status(false, &format!("Failed to list models: {}", e));
        }
    }

    Ok(())
}
