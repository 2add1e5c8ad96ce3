//! Document indexing and retrieval for polyfaq.
//!
//! Provides the retrieval half of the query pipeline: loading a source
//! document, splitting it into overlapping chunks, embedding the chunks,
//! and serving top-k similarity search over the resulting in-memory index.
//! The index is built once at startup and is read-only thereafter.

pub mod chunker;
pub mod document;
pub mod embeddings;
pub mod index;
pub mod retriever;
pub mod types;

// Re-export commonly used types
pub use document::{Document, DocumentSource};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::{IndexBuilder, IndexCell, VectorIndex};
pub use retriever::{Retrieval, Retriever, ScoredChunk};
pub use types::Chunk;
