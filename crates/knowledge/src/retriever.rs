//! Query-time retrieval over a built index.

use crate::embeddings::EmbeddingProvider;
use crate::index::IndexCell;
use crate::types::Chunk;
use polyfaq_core::AppResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Ordered retrieval result, most similar first.
///
/// May be empty when the index is empty or `k = 0`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Retrieval {
    pub chunks: Vec<ScoredChunk>,
}

impl Retrieval {
    /// Render the result as context text for the model.
    ///
    /// Each chunk becomes a `Source:`/`Content:` block; blocks are joined
    /// by a blank line.
    pub fn render(&self) -> String {
        self.chunks
            .iter()
            .map(|scored| {
                format!(
                    "Source: {}\nContent: {}",
                    scored.chunk.metadata, scored.chunk.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Retriever over a read-only index.
///
/// Reads the index through its set-once cell, so a retriever may be
/// wired up before the index finishes building; queries issued before
/// the cell is set fail with `UninitializedIndex` instead of serving
/// an empty index. Embeds queries with the same provider used to build
/// the index; a dimension mismatch is a wiring error and fails the
/// request.
pub struct Retriever {
    cell: Arc<IndexCell>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a retriever over an index cell.
    pub fn new(cell: Arc<IndexCell>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { cell, provider }
    }

    /// Retrieve the top-k most similar chunks for the query text.
    pub async fn query(&self, text: &str, k: usize) -> AppResult<Retrieval> {
        tracing::debug!("Retrieving top {} chunks for query: {}", k, text);

        let index = self.cell.get()?;
        let query_embedding = self.provider.embed(text).await?;
        let results = index.search(&query_embedding, k)?;

        tracing::debug!(
            "Retrieved {} chunks (top score: {:.3})",
            results.len(),
            results.first().map(|(_, s)| *s).unwrap_or(0.0)
        );

        Ok(Retrieval {
            chunks: results
                .into_iter()
                .map(|(chunk, score)| ScoredChunk { chunk, score })
                .collect(),
        })
    }
}
