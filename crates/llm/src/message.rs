//! Conversation message and tool-call types.
//!
//! Messages are a tagged union so that "is this assistant-authored text" is
//! an exhaustive match instead of runtime attribute probing.

use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// The generation loop's state is an append-only sequence of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    /// Fixed system instruction, prepended once per conversation
    System { content: String },

    /// User-authored input
    User { content: String },

    /// Model-authored output; may carry a tool invocation request
    Assistant {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_call: Option<ToolCall>,
    },

    /// Result of a tool invocation, fed back to the model
    #[serde(rename = "tool")]
    ToolResult { name: String, content: String },
}

impl ChatMessage {
    /// Create a system instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create an assistant message with plain text content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_call: None,
        }
    }

    /// Create an assistant message requesting a tool invocation.
    pub fn assistant_tool_call(content: impl Into<String>, call: ToolCall) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_call: Some(call),
        }
    }

    /// Create a tool-result message.
    pub fn tool_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The wire role tag for this message.
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::ToolResult { .. } => "tool",
        }
    }

    /// Assistant-authored textual content, if any.
    ///
    /// Tool results and user/system content never count toward surfaced
    /// output, so they return `None` here.
    pub fn assistant_text(&self) -> Option<&str> {
        match self {
            Self::Assistant { content, .. } if !content.is_empty() => Some(content),
            _ => None,
        }
    }

    /// The tool invocation requested by this message, if any.
    pub fn tool_call(&self) -> Option<&ToolCall> {
        match self {
            Self::Assistant { tool_call, .. } => tool_call.as_ref(),
            _ => None,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON object matching the tool's input schema
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call.
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Declaration of a tool offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name the model uses to invoke it
    pub name: String,

    /// Human-readable description of what the tool does
    pub description: String,

    /// JSON schema of the tool's input
    pub parameters: serde_json::Value,
}
