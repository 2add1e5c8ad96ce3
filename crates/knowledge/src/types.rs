//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// A bounded substring of a source document, the unit of retrieval.
///
/// Chunks are immutable once the index is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Source document ID
    pub source_id: String,

    /// Position within the source (0-based chunk ordinal)
    pub position: u32,

    /// Character offset of this chunk in the source text
    pub start_offset: usize,

    /// Text content
    pub text: String,

    /// Metadata (origin identifier, offsets)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Internal chunk candidate before embedding.
#[derive(Debug, Clone)]
pub struct ChunkCandidate {
    pub source_id: String,
    pub position: u32,
    pub start_offset: usize,
    pub text: String,
    pub metadata: serde_json::Value,
}
