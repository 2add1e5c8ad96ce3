//! Embedding provider trait and factory.

use polyfaq_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// The vector dimension is fixed per provider instance for the lifetime
/// of an index; all vectors in one index share it.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch, order-preserving.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider by name.
///
/// # Arguments
/// * `provider` - Provider identifier ("mock", "ollama")
/// * `model` - Model identifier (Ollama only)
/// * `endpoint` - Optional custom endpoint URL (Ollama only)
/// * `dimensions` - Vector dimension (mock only; Ollama models fix their own)
pub fn create_provider(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    dimensions: usize,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider.to_lowercase().as_str() {
        "mock" => {
            let provider = super::providers::mock::MockEmbeddings::new(dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let provider =
                super::providers::ollama::OllamaEmbeddings::new(base_url, model, dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Knowledge(format!(
            "Unknown embedding provider: '{}'. Supported providers: mock, ollama",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_provider() {
        let provider = create_provider("mock", "trigram-v1", None, 384).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_ollama_provider() {
        let provider = create_provider("ollama", "nomic-embed-text", None, 768).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "nomic-embed-text");
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider("unknown", "m", None, 384);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider("mock", "trigram-v1", None, 384).unwrap();

        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
