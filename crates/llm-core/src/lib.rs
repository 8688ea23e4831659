//! llm-core: Shared library for talking to a local LLM runtime
//!
//! Provides:
//! - Configuration loading (codeloop.toml)
//! - Ollama API client (chat completion, health, model listing)

pub mod client;
pub mod config;

pub use client::{ChatMessage, ChatOptions, Model, OllamaClient, OllamaStatus, Role};
pub use config::Config;
