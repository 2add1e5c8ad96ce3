//! Tool-augmented generation loop and multilingual orchestration.
//!
//! The [`Agent`] runs the bounded model/tool cycle in the pivot language;
//! the [`MultilingualAgent`] wraps it with language detection and
//! translation so callers may query and receive answers in any language.

pub mod agent;
pub mod multilingual;
pub mod prompt;
pub mod tool;
pub mod tools;
pub mod translation;

// Re-export commonly used types
pub use agent::{Agent, AgentState, AnswerEvent, AnswerStream};
pub use multilingual::MultilingualAgent;
pub use tool::{Tool, ToolOutput, ToolRegistry};
pub use tools::RetrieveContextTool;
pub use translation::LanguageService;
