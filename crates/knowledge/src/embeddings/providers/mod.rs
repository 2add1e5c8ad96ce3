//! Embedding provider implementations.

pub mod mock;
pub mod ollama;

pub use mock::MockEmbeddings;
pub use ollama::OllamaEmbeddings;
