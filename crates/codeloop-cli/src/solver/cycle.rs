//! The think/execute/observe cycle controller

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_core::{ChatMessage, OllamaClient};
use tracing::{debug, info, instrument, warn};

use crate::conversation::Conversation;
use crate::parser::parse;
use crate::prompt::SYSTEM_PROMPT;
use crate::sandbox::{ExecStatus, ExecutionResult, Sandbox};

use super::state::{CycleOutcome, SolverConfig};

// ANSI colors
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

/// Note prefixed to the best-effort answer when the budget runs out.
const EXHAUSTED_NOTE: &str =
    "[Reached the cycle budget without an explicit final answer; the last reasoning step follows.]";

/// The completion function: the controller's only outbound dependency.
///
/// Treated as synchronous-in-effect and potentially slow or fallible;
/// errors here are infrastructure failures and surface to the caller of
/// `solve` unretried.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

#[async_trait]
impl Completion for OllamaClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        self.chat(model, messages).await
    }
}

/// Drives repeated think/execute/observe cycles until the model signals a
/// final answer or the cycle budget is exhausted.
pub struct Solver {
    completion: Box<dyn Completion>,
    sandbox: Box<dyn Sandbox>,
    config: SolverConfig,
}

impl Solver {
    pub fn new(
        completion: Box<dyn Completion>,
        sandbox: Box<dyn Sandbox>,
        config: SolverConfig,
    ) -> Self {
        Self {
            completion,
            sandbox,
            config,
        }
    }

    /// Solve one problem and return the final answer, or the best-effort
    /// answer with an exhaustion note when the budget runs out.
    #[instrument(skip(self, query), fields(model = %self.config.model))]
    pub async fn solve(&self, query: &str) -> Result<String> {
        info!(
            query_len = query.len(),
            max_cycles = self.config.max_cycles,
            "Starting solve"
        );

        let system = self.config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);
        let mut conversation = Conversation::new(system, query);

        let mut cycle = 0;
        loop {
            cycle += 1;
            match self.run_cycle(&mut conversation, cycle).await? {
                CycleOutcome::Continue => {}
                CycleOutcome::Solved(answer) => {
                    info!(cycles = cycle, "Solved");
                    return Ok(answer);
                }
                CycleOutcome::Exhausted => {
                    warn!(
                        max_cycles = self.config.max_cycles,
                        "Cycle budget exhausted without a final answer"
                    );
                    return Ok(exhausted_answer(&conversation));
                }
            }
        }
    }

    async fn run_cycle(
        &self,
        conversation: &mut Conversation,
        cycle: usize,
    ) -> Result<CycleOutcome> {
        debug!(cycle, turns = conversation.len(), "Starting cycle");

        if self.config.debug {
            println!("{}[Cycle {}]{}", DIM, cycle, RESET);
        }

        let raw = self
            .completion
            .complete(&self.config.model, &conversation.render())
            .await
            .context("Completion request failed")?;

        if self.config.debug {
            println!("{}", raw.trim_end());
        }

        conversation.push_assistant(&raw);
        let parsed = parse(&raw);
        debug!(
            is_final = parsed.is_final(),
            has_code = parsed.code.is_some(),
            "Parsed response"
        );

        if let Some(answer) = parsed.final_answer {
            return Ok(CycleOutcome::Solved(answer));
        }

        if let Some(code) = parsed.code {
            // Code-level failures are observations the model can correct
            // next cycle; only infrastructure problems propagate.
            let result = self
                .sandbox
                .execute(&code, self.config.exec_timeout)
                .await
                .context("Sandbox execution failed")?;
            debug!(
                success = result.success(),
                duration_ms = result.duration.as_millis() as u64,
                "Observed execution result"
            );

            let observation = format_observation(&result);
            if self.config.debug {
                println!("{}[Observation]{}\n{}", CYAN, RESET, observation);
            }
            conversation.push_observation(observation);
        }

        if cycle < self.config.max_cycles {
            Ok(CycleOutcome::Continue)
        } else {
            Ok(CycleOutcome::Exhausted)
        }
    }
}

/// Format an execution result into the observation text the model sees.
fn format_observation(result: &ExecutionResult) -> String {
    let mut text = match result.status {
        ExecStatus::Success => "Execution succeeded.".to_string(),
        ExecStatus::Failure(Some(code)) => {
            format!("Execution failed with exit code {}.", code)
        }
        ExecStatus::Failure(None) => "Execution failed (terminated by signal).".to_string(),
        ExecStatus::TimedOut => format!(
            "Execution timed out after {}s and was killed; output below may be partial.",
            result.duration.as_secs()
        ),
    };

    if result.stdout.is_empty() && result.stderr.is_empty() {
        text.push_str("\n(no output)");
        return text;
    }

    if !result.stdout.is_empty() {
        text.push_str("\n--- stdout ---\n");
        text.push_str(result.stdout.trim_end());
    }
    if !result.stderr.is_empty() {
        text.push_str("\n--- stderr ---\n");
        text.push_str(result.stderr.trim_end());
    }

    text
}

/// Best-available answer when the budget is consumed: the last assistant
/// turn, flagged so a genuine solve is distinguishable.
fn exhausted_answer(conversation: &Conversation) -> String {
    match conversation.last_assistant() {
        Some(text) => format!("{}\n\n{}", EXHAUSTED_NOTE, text),
        None => EXHAUSTED_NOTE.to_string(),
    }
}
