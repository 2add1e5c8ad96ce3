//! In-memory vector index and one-shot index construction.
//!
//! The index is a flat list of (chunk, vector) pairs searched by brute
//! force cosine similarity. It is built exactly once at startup and is
//! read-only afterwards, so concurrent readers need no locking.

use crate::chunker;
use crate::document::DocumentSource;
use crate::embeddings::EmbeddingProvider;
use crate::types::Chunk;
use polyfaq_core::{AppError, AppResult};
use std::sync::{Arc, OnceLock};

/// Read-only collection of (chunk, embedding) pairs.
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl VectorIndex {
    /// Create an empty index with a fixed vector dimension.
    pub fn new(dimensions: usize) -> Self {
        Self {
            entries: Vec::new(),
            dimensions,
        }
    }

    /// Insert a chunk with its embedding.
    ///
    /// Only the builder calls this; after construction the index is
    /// never mutated.
    fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> AppResult<()> {
        if embedding.len() != self.dimensions {
            return Err(AppError::DimensionMismatch {
                query: embedding.len(),
                index: self.dimensions,
            });
        }
        self.entries.push((chunk, embedding));
        Ok(())
    }

    /// Search for the top-k most similar chunks to the query embedding.
    ///
    /// Returns chunks in descending similarity order; ties keep original
    /// insertion order. `k = 0` yields an empty result; `k` larger than
    /// the index returns every chunk.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::DimensionMismatch {
                query: query_embedding.len(),
                index: self.dimensions,
            });
        }

        if top_k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(Chunk, f32)> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| {
                let score = cosine_similarity(embedding, query_embedding);
                (chunk.clone(), score)
            })
            .collect();

        // Stable sort preserves insertion order for equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed vector dimension of this index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Builds a [`VectorIndex`] from a document source.
pub struct IndexBuilder {
    provider: Arc<dyn EmbeddingProvider>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IndexBuilder {
    /// Create a builder with the given embedding provider and chunking
    /// parameters.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            provider,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Load, chunk, embed, and index the source.
    ///
    /// Fails with [`AppError::Load`] when the source yields zero documents.
    /// Load and embed failures are fatal to construction; no retries.
    pub async fn build(&self, source: &DocumentSource) -> AppResult<VectorIndex> {
        tracing::info!("Building index from {}", source.origin());

        let documents = source.load().await?;
        if documents.is_empty() {
            return Err(AppError::Load(format!(
                "Source {} yielded no documents",
                source.origin()
            )));
        }

        let mut index = VectorIndex::new(self.provider.dimensions());

        for document in &documents {
            let candidates = chunker::chunk_text(
                &document.id,
                &document.text,
                self.chunk_size,
                self.chunk_overlap,
            );

            // Batched, order-preserving embedding
            let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.provider.embed_batch(&texts).await?;

            for (candidate, embedding) in candidates.into_iter().zip(embeddings) {
                let mut metadata = candidate.metadata;
                if let Some(map) = metadata.as_object_mut() {
                    map.insert(
                        "origin".to_string(),
                        serde_json::Value::String(document.origin.clone()),
                    );
                }

                let chunk = Chunk {
                    id: uuid::Uuid::new_v4().to_string(),
                    source_id: candidate.source_id,
                    position: candidate.position,
                    start_offset: candidate.start_offset,
                    text: candidate.text,
                    metadata,
                };

                index.insert(chunk, embedding)?;
            }
        }

        tracing::info!(
            "Index built: {} chunks, {} dimensions",
            index.len(),
            index.dimensions()
        );

        Ok(index)
    }
}

/// Set-once holder for the process-wide index.
///
/// The serving component builds the index before accepting requests and
/// stores it here; accessing the cell before that fails fast instead of
/// silently serving an empty index.
#[derive(Default)]
pub struct IndexCell {
    inner: OnceLock<Arc<VectorIndex>>,
}

impl IndexCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell already holding a built index.
    pub fn with_index(index: VectorIndex) -> Arc<Self> {
        let cell = Arc::new(Self::new());
        // A fresh cell cannot already be set
        let _ = cell.set(Arc::new(index));
        cell
    }

    /// Store the built index. Fails if the cell was already set.
    pub fn set(&self, index: Arc<VectorIndex>) -> AppResult<()> {
        self.inner
            .set(index)
            .map_err(|_| AppError::Knowledge("Index already initialized".to_string()))
    }

    /// Get the index, failing with `UninitializedIndex` if not yet built.
    pub fn get(&self) -> AppResult<Arc<VectorIndex>> {
        self.inner
            .get()
            .cloned()
            .ok_or(AppError::UninitializedIndex)
    }
}
