//! Chat client abstraction and request/response types.
//!
//! This module defines the core abstractions for interacting with chat
//! model providers, including tool-calling conversations and streaming.

use futures::Stream;
use polyfaq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::message::{ChatMessage, ToolCall, ToolSpec};

/// Chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation so far
    pub messages: Vec<ChatMessage>,

    /// Model identifier (e.g., "llama3.2")
    pub model: String,

    /// Tools the model may invoke
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new request for the given model with no messages.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            model: model.into(),
            tools: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Append a message to the conversation.
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Replace the conversation with the given messages.
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Offer tools to the model.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated message (assistant-authored)
    pub message: ChatMessage,

    /// Model that generated the response
    pub model: String,

    /// Token usage statistics
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A chunk from a streaming chat response.
///
/// The final chunk has `done = true`; a tool call, when present, arrives
/// on the final chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    /// Incremental assistant text content
    pub content: String,

    /// Tool invocation requested by the model, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,
}

/// Stream of chat chunks.
pub type ChatStream = Pin<Box<dyn Stream<Item = AppResult<ChatStreamChunk>> + Send>>;

/// Trait for chat model providers.
///
/// Abstracts the underlying provider (Ollama, mock, etc.) behind a unified
/// interface for tool-calling conversations, streaming, and single-prompt
/// round-trips.
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Get the provider name (e.g., "ollama", "mock").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming chat completion.
    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse>;

    /// Perform a streaming chat completion.
    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream>;

    /// Single prompt/response round-trip, returning the assistant text.
    ///
    /// Used for stateless helper calls (language detection, translation)
    /// that do not need conversation state or tools.
    async fn prompt(&self, model: &str, text: &str) -> AppResult<String> {
        let request = ChatRequest::new(model).with_message(ChatMessage::user(text));
        let response = self.chat(&request).await?;
        match response.message {
            ChatMessage::Assistant { content, .. } => Ok(content),
            other => Err(AppError::Llm(format!(
                "Expected assistant message, got {} message",
                other.role()
            ))),
        }
    }
}
