//! Error types for the polyfaq CLI.
//!
//! This module defines a unified error enum covering all error categories
//! in the application: configuration, I/O, chat model, index construction,
//! retrieval, generation loop, and translation errors.

use thiserror::Error;

/// Unified error type for the polyfaq CLI.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chat model provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Source yielded no usable documents during index construction
    #[error("Load error: {0}")]
    Load(String),

    /// Query embedding dimension does not match the index dimension.
    /// This indicates a wiring mistake, not a recoverable runtime condition.
    #[error("Dimension mismatch: query embedding has {query} dimensions, index has {index}")]
    DimensionMismatch { query: usize, index: usize },

    /// Retriever invoked before the index was built
    #[error("Index not initialized. Build the index before serving queries.")]
    UninitializedIndex,

    /// Generation loop exceeded its tool-call round bound
    #[error("Agent loop exceeded {0} tool rounds without producing an answer")]
    AgentLoopExceeded(u32),

    /// Language detection call failed or returned unusable content
    #[error("Detection error: {0}")]
    Detection(String),

    /// Translation call failed or returned unusable content
    #[error("Translation error: {0}")]
    Translation(String),

    /// Knowledge base and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = AppError::DimensionMismatch {
            query: 768,
            index: 384,
        };
        let msg = err.to_string();
        assert!(msg.contains("768"));
        assert!(msg.contains("384"));
    }

    #[test]
    fn test_loop_exceeded_message() {
        let err = AppError::AgentLoopExceeded(4);
        assert!(err.to_string().contains("4 tool rounds"));
    }
}
