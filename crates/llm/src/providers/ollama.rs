//! Ollama chat provider implementation.
//!
//! This module provides integration with Ollama, a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatClient, ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, TokenUsage};
use crate::message::{ChatMessage, ToolCall, ToolSpec};
use futures::StreamExt;
use polyfaq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Ollama /api/chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama wire message format.
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    arguments: serde_json::Value,
}

/// Ollama tool declaration format.
#[derive(Debug, Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OllamaFunction,
}

#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// Ollama /api/chat response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaMessage,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama chat client.
pub struct OllamaChatClient {
    /// Base URL for the Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaChatClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:11434")
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert a ChatRequest to Ollama wire format.
    fn to_ollama_request(&self, request: &ChatRequest, stream: bool) -> OllamaChatRequest {
        let messages = request.messages.iter().map(to_ollama_message).collect();

        let tools = request
            .tools
            .iter()
            .map(|spec| OllamaTool {
                tool_type: "function".to_string(),
                function: OllamaFunction {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    parameters: spec.parameters.clone(),
                },
            })
            .collect();

        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaChatRequest {
            model: request.model.clone(),
            messages,
            tools,
            options,
            stream,
        }
    }

    /// Convert an Ollama response to a ChatResponse.
    fn convert_response(&self, response: OllamaChatResponse) -> ChatResponse {
        let usage = TokenUsage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        );

        ChatResponse {
            message: from_ollama_message(response.message),
            model: response.model,
            usage,
        }
    }

    async fn send(&self, body: &OllamaChatRequest) -> AppResult<reqwest::Response> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

fn to_ollama_message(message: &ChatMessage) -> OllamaMessage {
    match message {
        ChatMessage::System { content } => OllamaMessage {
            role: "system".to_string(),
            content: content.clone(),
            tool_calls: Vec::new(),
        },
        ChatMessage::User { content } => OllamaMessage {
            role: "user".to_string(),
            content: content.clone(),
            tool_calls: Vec::new(),
        },
        ChatMessage::Assistant { content, tool_call } => OllamaMessage {
            role: "assistant".to_string(),
            content: content.clone(),
            tool_calls: tool_call
                .iter()
                .map(|call| OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
        },
        ChatMessage::ToolResult { content, .. } => OllamaMessage {
            role: "tool".to_string(),
            content: content.clone(),
            tool_calls: Vec::new(),
        },
    }
}

fn from_ollama_message(message: OllamaMessage) -> ChatMessage {
    // Ollama may return several tool calls; we act on the first one only,
    // matching the one-call-per-round loop contract.
    let tool_call = message.tool_calls.into_iter().next().map(|call| {
        ToolCall::new(call.function.name, call.function.arguments)
    });

    ChatMessage::Assistant {
        content: message.content,
        tool_call,
    }
}

impl Default for OllamaChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChatClient for OllamaChatClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let ollama_request = self.to_ollama_request(request, false);
        let response = self.send(&ollama_request).await?;

        // For non-streaming, Ollama returns a single JSON object
        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::info!("Received chat response from Ollama");
        tracing::debug!("Response: {:?}", ollama_response);

        Ok(self.convert_response(ollama_response))
    }

    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream> {
        tracing::info!("Starting streaming chat request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let ollama_request = self.to_ollama_request(request, true);
        let response = self.send(&ollama_request).await?;

        // Convert byte stream to line-delimited JSON chunks
        let stream = response.bytes_stream().map(move |result| {
            let bytes = result.map_err(|e| AppError::Llm(format!("Stream error: {}", e)))?;

            // Parse each line as JSON (Ollama sends newline-delimited JSON)
            let text = String::from_utf8_lossy(&bytes);
            let chunks: Vec<AppResult<ChatStreamChunk>> = text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| {
                    let ollama_response: OllamaChatResponse = serde_json::from_str(line)
                        .map_err(|e| AppError::Llm(format!("Failed to parse chunk: {}", e)))?;

                    let tool_call = ollama_response
                        .message
                        .tool_calls
                        .into_iter()
                        .next()
                        .map(|call| ToolCall::new(call.function.name, call.function.arguments));

                    Ok(ChatStreamChunk {
                        content: ollama_response.message.content,
                        tool_call,
                        done: ollama_response.done,
                    })
                })
                .collect();

            Ok(futures::stream::iter(chunks))
        });

        Ok(Box::pin(stream.flat_map(|result| match result {
            Ok(chunks) => chunks,
            Err(e) => futures::stream::iter(vec![Err(e)]),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaChatClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_ollama_request_conversion() {
        let client = OllamaChatClient::new();
        let request = ChatRequest::new("llama3.2")
            .with_message(ChatMessage::system("be brief"))
            .with_message(ChatMessage::user("Hello"))
            .with_tools(vec![ToolSpec {
                name: "retrieve_context".to_string(),
                description: "Retrieve documentation".to_string(),
                parameters: json!({"type": "object"}),
            }])
            .with_temperature(0.7);

        let ollama_req = client.to_ollama_request(&request, false);
        assert_eq!(ollama_req.model, "llama3.2");
        assert_eq!(ollama_req.messages.len(), 2);
        assert_eq!(ollama_req.messages[0].role, "system");
        assert_eq!(ollama_req.messages[1].role, "user");
        assert_eq!(ollama_req.tools.len(), 1);
        assert_eq!(ollama_req.tools[0].function.name, "retrieve_context");
        assert!(!ollama_req.stream);
    }

    #[test]
    fn test_tool_result_role() {
        let message = to_ollama_message(&ChatMessage::tool_result("retrieve_context", "text"));
        assert_eq!(message.role, "tool");
        assert_eq!(message.content, "text");
    }

    #[test]
    fn test_response_tool_call_extraction() {
        let wire = OllamaMessage {
            role: "assistant".to_string(),
            content: String::new(),
            tool_calls: vec![OllamaToolCall {
                function: OllamaFunctionCall {
                    name: "retrieve_context".to_string(),
                    arguments: json!({"query": "passport"}),
                },
            }],
        };

        let message = from_ollama_message(wire);
        let call = message.tool_call().expect("tool call");
        assert_eq!(call.name, "retrieve_context");
        assert_eq!(call.arguments["query"], "passport");
    }
}
