//! Chat model integration crate for polyfaq.
//!
//! This crate provides a provider-agnostic abstraction for interacting with
//! chat models, including tool-calling conversations and streaming. It
//! supports multiple providers through a unified trait-based interface.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Mock**: Scripted responses for tests and development
//!
//! # Example
//! ```no_run
//! use polyfaq_llm::{ChatClient, ChatMessage, ChatRequest, providers::OllamaChatClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaChatClient::new();
//! let request = ChatRequest::new("llama3.2")
//!     .with_message(ChatMessage::user("Hello, world!"));
//! let response = client.chat(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod message;
pub mod providers;

// Re-export main types
pub use client::{ChatClient, ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, TokenUsage};
pub use factory::create_client;
pub use message::{ChatMessage, ToolCall, ToolSpec};
pub use providers::{MockChatClient, OllamaChatClient};
