//! Tool interface and registry.
//!
//! A tool is a named operation with a declared input schema and a dual
//! output: a human-readable serialization fed back to the model, and a
//! structured artifact for programmatic use. Tools are registered into a
//! table the generation loop consults by name.

use polyfaq_core::{AppError, AppResult};
use polyfaq_llm::ToolSpec;
use std::collections::HashMap;
use std::sync::Arc;

/// Dual output of a tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Human-readable serialization, appended as the tool-result message
    pub content: String,

    /// Structured result for programmatic use
    pub artifact: serde_json::Value,
}

/// A named operation the model may invoke.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to invoke this tool.
    fn name(&self) -> &str;

    /// Human-readable description offered to the model.
    fn description(&self) -> &str;

    /// JSON schema of the tool's input.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: serde_json::Value) -> AppResult<ToolOutput>;
}

/// Table of tools, looked up by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> AppResult<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::Llm(format!("Model requested unknown tool: {}", name)))
    }

    /// Declarations for every registered tool, for the chat request.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, args: serde_json::Value) -> AppResult<ToolOutput> {
            Ok(ToolOutput {
                content: args["text"].as_str().unwrap_or_default().to_string(),
                artifact: args,
            })
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_ok());
        assert!(registry.get("missing").is_err());
    }

    #[test]
    fn test_specs() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let specs = registry.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "echo");
        assert!(specs[0].parameters.is_object());
    }

    #[tokio::test]
    async fn test_execute_dual_output() {
        let tool = EchoTool;
        let output = tool.execute(json!({"text": "hello"})).await.unwrap();
        assert_eq!(output.content, "hello");
        assert_eq!(output.artifact["text"], "hello");
    }
}
