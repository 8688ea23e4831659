//! codeloop: iterative think/execute/observe solver for local LLMs
//!
//! Pairs an LLM reasoning step with sandboxed execution of the code it
//! writes, feeding results back until the model answers or the cycle
//! budget runs out.

mod commands;
mod config;
mod conversation;
mod parser;
mod prompt;
mod sandbox;
mod solver;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "codeloop")]
#[command(about = "Iterative think/execute/observe solver for local LLMs", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Solve a problem with think/execute/observe cycles
    Solve {
        /// The problem to solve
        query: Vec<String>,

        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum cycles before giving up
        #[arg(long)]
        max_cycles: Option<usize>,

        /// Per-execution timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Interpreter used to run code fragments
        #[arg(long)]
        interpreter: Option<String>,

        /// Print each cycle's raw model output and observations
        #[arg(short, long)]
        debug: bool,
    },

    /// Show Ollama status and installed models
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Solve {
            query,
            model,
            max_cycles,
            timeout,
            interpreter,
            debug,
        } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("No query given");
            }
            commands::solve(commands::SolveArgs {
                query,
                model,
                max_cycles,
                timeout_secs: timeout,
                interpreter,
                debug,
            })
            .await
        }
        Commands::Status => commands::status().await,
    }
}
