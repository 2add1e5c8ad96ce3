//! Tool-augmented generation loop.
//!
//! The loop is an explicit state machine over an append-only conversation.
//! Each round sends the conversation to the chat model; a response that
//! requests a tool invocation moves to `AwaitingTool`, a plain response
//! finishes the loop. Tool rounds are bounded; exceeding the bound is a
//! fatal error, never a silent truncation.

use crate::tool::ToolRegistry;
use futures::{Stream, StreamExt};
use polyfaq_core::{AppError, AppResult};
use polyfaq_llm::{ChatClient, ChatMessage, ChatRequest, ToolCall};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Generation loop state.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    /// Waiting for the chat model's next response
    AwaitingModel,

    /// Model requested a tool invocation; the call is pending execution
    AwaitingTool(ToolCall),

    /// Final answer produced
    Done(String),
}

/// An event emitted while answering.
///
/// `Fragment` carries assistant-authored text in generation order;
/// tool-invocation request/result messages are internal and never
/// surfaced. `Final` is the explicit terminal sentinel carrying the
/// complete answer; no events follow it.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerEvent {
    Fragment(String),
    Final(String),
}

/// Finite stream of answer events, ending with `Final`.
pub type AnswerStream = Pin<Box<dyn Stream<Item = AppResult<AnswerEvent>> + Send>>;

/// The tool-augmented generation loop.
///
/// Cheap to clone; clones share the chat client and tool table. State
/// lives per request in the conversation, so one agent may serve
/// concurrent requests.
#[derive(Clone)]
pub struct Agent {
    client: Arc<dyn ChatClient>,
    model: String,
    tools: ToolRegistry,
    system_prompt: String,
    max_tool_rounds: u32,
}

impl Agent {
    /// Create an agent over a chat client and tool table.
    pub fn new(
        client: Arc<dyn ChatClient>,
        model: impl Into<String>,
        tools: ToolRegistry,
        system_prompt: impl Into<String>,
        max_tool_rounds: u32,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            tools,
            system_prompt: system_prompt.into(),
            max_tool_rounds,
        }
    }

    /// Run the loop to completion and return the final answer.
    ///
    /// The query must already be in the pivot language.
    pub async fn run(&self, query: &str) -> AppResult<String> {
        let mut stream = self.run_stream(query);

        while let Some(event) = stream.next().await {
            if let AnswerEvent::Final(answer) = event? {
                return Ok(answer);
            }
        }

        Err(AppError::Llm(
            "Generation stream ended without a final answer".to_string(),
        ))
    }

    /// Run the loop, streaming assistant-authored fragments as they are
    /// produced and ending with a `Final` event.
    ///
    /// The stream is finite and non-restartable. A caller may drop it
    /// early; an in-flight model call may still complete and is discarded.
    pub fn run_stream(&self, query: &str) -> AnswerStream {
        let (tx, rx) = mpsc::channel(16);
        let agent = self.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            if let Err(e) = agent.drive(&query, &tx).await {
                let _ = tx.send(Err(e)).await;
            }
        });

        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }

    /// Drive the state machine, sending events into the channel.
    async fn drive(
        &self,
        query: &str,
        tx: &mpsc::Sender<AppResult<AnswerEvent>>,
    ) -> AppResult<()> {
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(query),
        ];
        let mut state = AgentState::AwaitingModel;
        let mut tool_rounds = 0u32;

        loop {
            state = match state {
                AgentState::AwaitingModel => {
                    let request = ChatRequest::new(&self.model)
                        .with_messages(messages.clone())
                        .with_tools(self.tools.specs());

                    let mut model_stream = self.client.chat_stream(&request).await?;
                    let mut content = String::new();
                    let mut tool_call = None;

                    // Only assistant-authored text is surfaced; tool
                    // request/result messages stay internal
                    while let Some(chunk) = model_stream.next().await {
                        let chunk = chunk?;

                        if !chunk.content.is_empty() {
                            content.push_str(&chunk.content);
                            if tx
                                .send(Ok(AnswerEvent::Fragment(chunk.content)))
                                .await
                                .is_err()
                            {
                                // Caller abandoned the stream
                                return Ok(());
                            }
                        }

                        if let Some(call) = chunk.tool_call {
                            tool_call = Some(call);
                        }

                        if chunk.done {
                            break;
                        }
                    }

                    messages.push(match &tool_call {
                        Some(call) => ChatMessage::assistant_tool_call(content.clone(), call.clone()),
                        None => ChatMessage::assistant(content.clone()),
                    });

                    match tool_call {
                        Some(call) => AgentState::AwaitingTool(call),
                        None => AgentState::Done(content),
                    }
                }

                AgentState::AwaitingTool(call) => {
                    tool_rounds += 1;
                    if tool_rounds > self.max_tool_rounds {
                        return Err(AppError::AgentLoopExceeded(self.max_tool_rounds));
                    }

                    tracing::debug!(
                        "Tool round {}/{}: {}",
                        tool_rounds,
                        self.max_tool_rounds,
                        call.name
                    );

                    let tool = self.tools.get(&call.name)?;
                    let output = tool.execute(call.arguments.clone()).await?;

                    messages.push(ChatMessage::tool_result(call.name, output.content));
                    AgentState::AwaitingModel
                }

                AgentState::Done(answer) => {
                    let answer = answer.trim().to_string();
                    let _ = tx.send(Ok(AnswerEvent::Final(answer))).await;
                    return Ok(());
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::SYSTEM_PROMPT;
    use crate::tool::{Tool, ToolOutput};
    use polyfaq_llm::MockChatClient;
    use serde_json::json;

    struct StaticTool {
        reply: String,
    }

    #[async_trait::async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            "retrieve_context"
        }

        fn description(&self) -> &str {
            "Static context for tests"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, _args: serde_json::Value) -> AppResult<ToolOutput> {
            Ok(ToolOutput {
                content: self.reply.clone(),
                artifact: json!({}),
            })
        }
    }

    fn test_agent(client: Arc<MockChatClient>, max_rounds: u32) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(StaticTool {
            reply: "Applicants must hold a valid passport.".to_string(),
        }));

        Agent::new(client, "scripted", tools, SYSTEM_PROMPT, max_rounds)
    }

    #[tokio::test]
    async fn test_direct_answer_no_tool() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant("Yes, you can apply online."));

        let agent = test_agent(client.clone(), 4);
        let answer = agent.run("Can I apply online?").await.unwrap();

        assert_eq!(answer, "Yes, you can apply online.");
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_tool_round_then_answer() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant_tool_call(
            "",
            ToolCall::new("retrieve_context", json!({"query": "required documents"})),
        ));
        client.push_response(ChatMessage::assistant("You need a valid passport."));

        let agent = test_agent(client.clone(), 4);
        let answer = agent.run("What document is required?").await.unwrap();

        assert!(answer.contains("passport"));
        assert_eq!(client.request_count(), 2);

        // The second request must carry the tool result in the conversation
        let requests = client.recorded_requests();
        let has_tool_result = requests[1]
            .messages
            .iter()
            .any(|m| matches!(m, ChatMessage::ToolResult { content, .. } if content.contains("passport")));
        assert!(has_tool_result);
    }

    #[tokio::test]
    async fn test_loop_bound_exceeded() {
        let client = Arc::new(MockChatClient::new());
        // Model always requests the tool, never answers
        for _ in 0..10 {
            client.push_response(ChatMessage::assistant_tool_call(
                "",
                ToolCall::new("retrieve_context", json!({"query": "again"})),
            ));
        }

        let agent = test_agent(client.clone(), 4);
        let result = agent.run("loop forever").await;

        assert!(matches!(result, Err(AppError::AgentLoopExceeded(4))));
        // 4 tool rounds executed, the 5th request is rejected
        assert_eq!(client.request_count(), 5);
    }

    #[tokio::test]
    async fn test_unknown_tool_fails() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant_tool_call(
            "",
            ToolCall::new("no_such_tool", json!({})),
        ));

        let agent = test_agent(client, 4);
        let result = agent.run("q").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stream_fragments_exclude_tool_messages() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant_tool_call(
            "Checking the documentation.",
            ToolCall::new("retrieve_context", json!({"query": "documents"})),
        ));
        client.push_response(ChatMessage::assistant("You need a valid passport."));

        let agent = test_agent(client, 4);
        let mut stream = agent.run_stream("What document is required?");

        let mut fragments = Vec::new();
        let mut finale = None;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                AnswerEvent::Fragment(text) => fragments.push(text),
                AnswerEvent::Final(answer) => finale = Some(answer),
            }
        }

        // Model calls go through the provider's streaming endpoint, so
        // each response arrives as several incremental fragments
        assert!(fragments.len() > 2);
        let joined = fragments.concat();
        assert!(joined.contains("Checking the documentation."));
        assert!(joined.contains("You need a valid passport."));
        // Tool result text never appears as a fragment
        assert!(!joined.contains("Applicants must hold"));
        assert_eq!(finale.as_deref(), Some("You need a valid passport."));
    }

    #[tokio::test]
    async fn test_system_prompt_prepended() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant("ok"));

        let agent = test_agent(client.clone(), 4);
        agent.run("hello").await.unwrap();

        let requests = client.recorded_requests();
        assert!(matches!(
            &requests[0].messages[0],
            ChatMessage::System { content } if content.contains("FAQ assistant")
        ));
        assert!(matches!(
            &requests[0].messages[1],
            ChatMessage::User { content } if content == "hello"
        ));
    }
}
