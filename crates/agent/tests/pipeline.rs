//! End-to-end pipeline tests: index a source document, wire the retrieval
//! tool into the generation loop, and answer through the multilingual
//! front end with a scripted chat model.

use polyfaq_agent::{
    Agent, LanguageService, MultilingualAgent, RetrieveContextTool, ToolRegistry,
};
use polyfaq_agent::prompt::SYSTEM_PROMPT;
use polyfaq_core::AppError;
use polyfaq_knowledge::{create_provider, DocumentSource, IndexBuilder, IndexCell, Retriever};
use polyfaq_llm::{ChatMessage, MockChatClient, ToolCall};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

const FAQ: &str = "\
# Visa FAQ

Applicants must hold a valid passport with at least six months of validity.

Processing takes around ten business days.
";

async fn passport_retriever() -> Arc<Retriever> {
    let mut file = tempfile::NamedTempFile::with_suffix(".md").unwrap();
    write!(file, "{}", FAQ).unwrap();

    let provider = create_provider("mock", "trigram-v1", None, 384).unwrap();
    let builder = IndexBuilder::new(provider.clone(), 500, 50);
    let index = builder
        .build(&DocumentSource::File(file.path().to_path_buf()))
        .await
        .unwrap();

    Arc::new(Retriever::new(IndexCell::with_index(index), provider))
}

fn pipeline(client: Arc<MockChatClient>, retriever: Arc<Retriever>) -> MultilingualAgent {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(RetrieveContextTool::new(retriever, 2)));

    let agent = Agent::new(client.clone(), "scripted", tools, SYSTEM_PROMPT, 4);
    let language = LanguageService::new(client, "scripted");
    MultilingualAgent::new(agent, language, "en")
}

#[tokio::test]
async fn test_english_question_with_retrieval() {
    let retriever = passport_retriever().await;
    let client = Arc::new(MockChatClient::new());
    client.push_response(ChatMessage::assistant("en")); // detect
    client.push_response(ChatMessage::assistant_tool_call(
        "",
        ToolCall::new("retrieve_context", json!({"query": "required documents"})),
    ));
    client.push_response(ChatMessage::assistant(
        "You need a valid passport with at least six months of validity.",
    ));

    let agent = pipeline(client.clone(), retriever);
    let answer = agent.answer("What documents do I need?").await.unwrap();

    assert!(answer.contains("passport"));

    // The conversation sent after the tool round carries the retrieved text
    let requests = client.recorded_requests();
    let final_request = requests.last().unwrap();
    let tool_result = final_request
        .messages
        .iter()
        .find_map(|m| match m {
            ChatMessage::ToolResult { content, .. } => Some(content.clone()),
            _ => None,
        })
        .expect("tool result in conversation");
    assert!(tool_result.contains("valid passport"));
    assert!(tool_result.contains("Source:"));
}

#[tokio::test]
async fn test_spanish_question_translated_round_trip() {
    let retriever = passport_retriever().await;
    let client = Arc::new(MockChatClient::new());
    client.push_response(ChatMessage::assistant("es")); // detect
    client.push_response(ChatMessage::assistant("What documents do I need?")); // to pivot
    client.push_response(ChatMessage::assistant_tool_call(
        "",
        ToolCall::new("retrieve_context", json!({"query": "required documents"})),
    ));
    client.push_response(ChatMessage::assistant("You need a valid passport."));
    client.push_response(ChatMessage::assistant("Necesita un pasaporte válido.")); // back

    let agent = pipeline(client.clone(), retriever);
    let answer = agent.answer("¿Qué documentos necesito?").await.unwrap();

    assert_eq!(answer, "Necesita un pasaporte válido.");
    assert_eq!(client.request_count(), 5);
}

#[tokio::test]
async fn test_runaway_tool_loop_is_bounded() {
    let retriever = passport_retriever().await;
    let client = Arc::new(MockChatClient::new());
    client.push_response(ChatMessage::assistant("en")); // detect
    for _ in 0..10 {
        client.push_response(ChatMessage::assistant_tool_call(
            "",
            ToolCall::new("retrieve_context", json!({"query": "documents"})),
        ));
    }

    let agent = pipeline(client, retriever);
    let result = agent.answer("What documents do I need?").await;

    assert!(matches!(result, Err(AppError::AgentLoopExceeded(4))));
}
