//! The cycle controller: orchestrates think/execute/observe cycles.

pub mod cycle;
pub mod state;

pub use cycle::{Completion, Solver};
pub use state::{CycleOutcome, SolverConfig, DEFAULT_MODEL};
