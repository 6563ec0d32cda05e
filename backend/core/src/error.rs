use thiserror::Error;

/// Top-level error type for the charla runtime.
#[derive(Debug, Error)]
pub enum CharlaError {
    /// A required configuration variable was absent or blank. Carries the
    /// variable name so startup failures point at the exact value to set.
    #[error("missing or empty environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The conversation was continued without any user text.
    #[error("input text must be provided")]
    EmptyInput,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
