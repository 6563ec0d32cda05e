use std::collections::HashMap;

use anyhow::Result;

use charla_core::CharlaError;

use crate::{env_snapshot, trimmed};

/// Connection parameters for an Ollama-compatible local backend.
///
/// Credential and endpoint fall back to documented defaults; the model
/// identifier has no sensible default and is required.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    api_key: String,
    base_url: String,
    model: String,
}

impl OllamaConfig {
    pub const API_KEY_ENV: &'static str = "OLLAMA_API_KEY";
    pub const BASE_URL_ENV: &'static str = "OLLAMA_BASE_URL";
    pub const MODEL_ENV: &'static str = "OLLAMA_MODEL";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434/v1";
    pub const DEFAULT_API_KEY: &'static str = "ollama";

    /// Load from an optional `.env` file plus the process environment.
    pub fn load() -> Result<Self> {
        Self::from_env_map(&env_snapshot())
    }

    /// Load from an explicit variable map (used by tests).
    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self> {
        let model = trimmed(env, Self::MODEL_ENV)
            .ok_or(CharlaError::MissingEnvVar(Self::MODEL_ENV))?;
        let base_url = trimmed(env, Self::BASE_URL_ENV)
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let api_key = trimmed(env, Self::API_KEY_ENV)
            .unwrap_or_else(|| Self::DEFAULT_API_KEY.to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
