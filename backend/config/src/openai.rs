use std::collections::HashMap;

use anyhow::Result;

use charla_core::CharlaError;

use crate::{env_snapshot, trimmed};

/// Connection parameters for the hosted backend. No defaults: credential
/// and model identifier are each independently required.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: String,
    model: String,
}

impl OpenAiConfig {
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";
    pub const MODEL_ENV: &'static str = "OPENAI_MODEL";

    /// Load from an optional `.env` file plus the process environment.
    pub fn load() -> Result<Self> {
        Self::from_env_map(&env_snapshot())
    }

    /// Load from an explicit variable map (used by tests).
    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self> {
        let api_key = trimmed(env, Self::API_KEY_ENV)
            .ok_or(CharlaError::MissingEnvVar(Self::API_KEY_ENV))?;
        let model = trimmed(env, Self::MODEL_ENV)
            .ok_or(CharlaError::MissingEnvVar(Self::MODEL_ENV))?;
        Ok(Self { api_key, model })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_loads_both_values() {
        let config = OpenAiConfig::from_env_map(&env(&[
            ("OPENAI_API_KEY", "sk-abc123"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), "sk-abc123");
        assert_eq!(config.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err =
            OpenAiConfig::from_env_map(&env(&[("OPENAI_MODEL", "gpt-4o-mini")])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_missing_model_names_variable() {
        let err = OpenAiConfig::from_env_map(&env(&[("OPENAI_API_KEY", "sk-abc")])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_MODEL"));
    }
}
