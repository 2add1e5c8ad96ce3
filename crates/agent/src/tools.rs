//! Built-in tools for the generation loop.

use crate::tool::{Tool, ToolOutput};
use polyfaq_core::{AppError, AppResult};
use polyfaq_knowledge::Retriever;
use serde_json::json;
use std::sync::Arc;

/// Retrieval tool the model invokes to fetch chunks relevant to a sub-query.
///
/// Input: `{"query": string}`. Output: the rendered chunk blocks as the
/// tool-result content, plus the structured retrieval result as artifact.
pub struct RetrieveContextTool {
    retriever: Arc<Retriever>,
    top_k: usize,
}

impl RetrieveContextTool {
    /// Create the retrieval tool over a built retriever.
    pub fn new(retriever: Arc<Retriever>, top_k: usize) -> Self {
        Self { retriever, top_k }
    }
}

#[async_trait::async_trait]
impl Tool for RetrieveContextTool {
    fn name(&self) -> &str {
        "retrieve_context"
    }

    fn description(&self) -> &str {
        "Retrieve information from the indexed documentation to help answer a query."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant passages"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> AppResult<ToolOutput> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Llm("Missing required 'query' parameter".to_string()))?;

        tracing::info!("retrieve_context called with query: {}", query);

        let retrieval = self.retriever.query(query, self.top_k).await?;

        Ok(ToolOutput {
            content: retrieval.render(),
            artifact: serde_json::to_value(&retrieval)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyfaq_knowledge::{create_provider, DocumentSource, IndexBuilder, IndexCell};
    use std::io::Write;

    async fn passport_tool() -> RetrieveContextTool {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        write!(file, "Applicants must hold a valid passport.").unwrap();

        let provider = create_provider("mock", "trigram-v1", None, 384).unwrap();
        let builder = IndexBuilder::new(provider.clone(), 500, 50);
        let index = builder
            .build(&DocumentSource::File(file.path().to_path_buf()))
            .await
            .unwrap();

        RetrieveContextTool::new(
            Arc::new(Retriever::new(IndexCell::with_index(index), provider)),
            2,
        )
    }

    #[tokio::test]
    async fn test_execute_returns_chunk_text() {
        let tool = passport_tool().await;

        let output = tool
            .execute(json!({"query": "What document is required?"}))
            .await
            .unwrap();

        assert!(output.content.contains("valid passport"));
        assert!(output.content.contains("Content:"));
        // Structured artifact carries scores
        let chunks = output.artifact["chunks"].as_array().unwrap();
        assert!(!chunks.is_empty());
        assert!(chunks[0]["score"].is_number());
    }

    #[tokio::test]
    async fn test_execute_missing_query_fails() {
        let tool = passport_tool().await;
        let result = tool.execute(json!({})).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tool_contract() {
        let tool = passport_tool().await;

        assert_eq!(tool.name(), "retrieve_context");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "query");
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }
}
