//! Connection configuration for the two backend variants.
//!
//! Both loaders read an optional `.env` file first, then the process
//! environment, trim surrounding whitespace, and fail fast naming the exact
//! variable when a required value is missing or blank.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaConfig;
pub use openai::OpenAiConfig;

use std::collections::HashMap;

/// Snapshot the process environment after loading any local `.env` file.
pub(crate) fn env_snapshot() -> HashMap<String, String> {
    dotenvy::dotenv().ok();
    std::env::vars().collect()
}

/// Read a variable from a snapshot, trimmed; blank values count as unset.
pub(crate) fn trimmed(env: &HashMap<String, String>, name: &str) -> Option<String> {
    env.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
