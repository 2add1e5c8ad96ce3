//! Scripted mock chat provider for tests and development.

use crate::client::{ChatClient, ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, TokenUsage};
use crate::message::ChatMessage;
use polyfaq_core::AppResult;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock provider with scripted responses.
///
/// Responses are served in the order they were queued. When the script is
/// exhausted the client echoes the last user message back as an assistant
/// message, so unscripted calls stay deterministic.
#[derive(Debug, Default)]
pub struct MockChatClient {
    script: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    /// Create a new mock client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scripted response.
    pub fn push_response(&self, message: ChatMessage) {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(message);
    }

    /// Number of chat calls received so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .len()
    }

    /// All requests received so far, in call order.
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .clone()
    }

    fn next_message(&self, request: &ChatRequest) -> ChatMessage {
        let scripted = self
            .script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        scripted.unwrap_or_else(|| {
            let echo = request
                .messages
                .iter()
                .rev()
                .find_map(|m| match m {
                    ChatMessage::User { content } => Some(content.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            ChatMessage::assistant(echo)
        })
    }
}

#[async_trait::async_trait]
impl ChatClient for MockChatClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .push(request.clone());

        let message = self.next_message(request);

        Ok(ChatResponse {
            message,
            model: request.model.clone(),
            usage: TokenUsage::default(),
        })
    }

    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream> {
        let response = self.chat(request).await?;

        let (content, tool_call) = match response.message {
            ChatMessage::Assistant { content, tool_call } => (content, tool_call),
            other => (format!("{:?}", other), None),
        };

        // Split the scripted content into word-sized chunks so streaming
        // consumers see more than one fragment.
        let mut chunks: Vec<AppResult<ChatStreamChunk>> = content
            .split_inclusive(' ')
            .map(|piece| {
                Ok(ChatStreamChunk {
                    content: piece.to_string(),
                    tool_call: None,
                    done: false,
                })
            })
            .collect();

        chunks.push(Ok(ChatStreamChunk {
            content: String::new(),
            tool_call,
            done: true,
        }));

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
