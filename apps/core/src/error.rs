use std::io;
use thiserror::Error;

/// Engine-wide error type.
///
/// Analysis and scoring are total and never return this; it only surfaces at
/// the edges: compiling user-supplied rules, loading configuration and writing
/// persisted state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule pattern failed to compile.
    #[error("Invalid pattern for rule '{tag}': {source}")]
    InvalidPattern {
        tag: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration values failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard input/output errors (rule files, store records).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid_pattern(tag: impl Into<String>, source: regex::Error) -> Self {
        EngineError::InvalidPattern {
            tag: tag.into(),
            source,
        }
    }
}

impl From<dotenv::Error> for EngineError {
    fn from(err: dotenv::Error) -> Self {
        EngineError::Config(format!("Failed to load .env file: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
