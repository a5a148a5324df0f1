//! Error types for ragway

use thiserror::Error;

/// Result type alias using RagwayError
pub type Result<T> = std::result::Result<T, RagwayError>;

/// Error type alias for convenience
pub type Error = RagwayError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const UNAVAILABLE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for ragway
#[derive(Debug, Error)]
pub enum RagwayError {
    /// Collection, schema or index setup failed
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Corpus reset-and-reload failed
    #[error("Seeding error: {0}")]
    Seeding(String),

    /// Embedding or similarity search failed during a live request
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Chat/completion call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// A vector backend call failed or returned an unexpected body
    #[error("Backend error ({backend}): {message}")]
    Backend { backend: String, message: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RagwayError {
    /// Shorthand for a backend failure tagged with the driver name
    pub fn backend(backend: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            Self::Backend { .. } | Self::Http(_) | Self::Timeout(_) => exit_codes::UNAVAILABLE,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
