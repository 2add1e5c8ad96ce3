//! Startup wiring shared by the ask and chat commands.
//!
//! Builds the index from the configured source, wires the retrieval tool
//! into the generation loop, and wraps it in the multilingual front end.
//! The index is built once here; commands only read it afterwards.

use polyfaq_agent::prompt::SYSTEM_PROMPT;
use polyfaq_agent::{Agent, LanguageService, MultilingualAgent, RetrieveContextTool, ToolRegistry};
use polyfaq_core::{AppConfig, AppResult};
use polyfaq_knowledge::{create_provider, DocumentSource, IndexBuilder, IndexCell, Retriever};
use polyfaq_llm::create_client;
use std::sync::Arc;

/// Build the full answering pipeline from configuration.
///
/// The retriever and tools are wired over the index cell first; the cell
/// is only set once the index build succeeds, so a failed build prevents
/// serving instead of leaving an empty index behind.
pub async fn build(config: &AppConfig) -> AppResult<MultilingualAgent> {
    let source = DocumentSource::parse(&config.source);
    tracing::info!("Indexing source: {}", source.origin());

    let embeddings = create_provider(
        &config.embedding_provider,
        &config.embedding_model,
        config.endpoint.as_deref(),
        config.embedding_dim,
    )?;

    let cell = Arc::new(IndexCell::new());
    let retriever = Arc::new(Retriever::new(cell.clone(), embeddings.clone()));

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(RetrieveContextTool::new(retriever, config.top_k)));

    let builder = IndexBuilder::new(embeddings, config.chunk_size, config.chunk_overlap);
    let index = builder.build(&source).await?;
    tracing::info!("Indexed {} chunks", index.len());
    cell.set(Arc::new(index))?;

    let client = create_client(&config.provider, config.endpoint.as_deref())?;

    let agent = Agent::new(
        client.clone(),
        &config.model,
        tools,
        SYSTEM_PROMPT,
        config.max_tool_rounds,
    );
    let language = LanguageService::new(client, &config.model);

    Ok(MultilingualAgent::new(
        agent,
        language,
        &config.pivot_language,
    ))
}
