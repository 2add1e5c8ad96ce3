//! Configuration management for the polyfaq CLI.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables (`POLYFAQ_*`, `RUST_LOG`, `NO_COLOR`)
//! - Command-line flags
//! - Config files (polyfaq.yaml)
//!
//! Precedence: CLI flags > environment variables > config file > defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// The language retrieval and generation always operate in.
pub const PIVOT_LANGUAGE: &str = "en";

/// Main application configuration.
///
/// Holds all global options that affect CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document source: a file path or an http(s) URL
    pub source: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Chat model provider (e.g., "ollama", "mock")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// Provider endpoint URL (for HTTP providers)
    pub endpoint: Option<String>,

    /// Embedding provider (e.g., "ollama", "mock")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimension
    pub embedding_dim: usize,

    /// Chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per tool call
    pub top_k: usize,

    /// Maximum tool-call rounds per request before failing
    pub max_tool_rounds: u32,

    /// Pivot language code for retrieval and generation
    pub pivot_language: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Configuration file structure (polyfaq.yaml).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    source: Option<String>,
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "embeddingProvider")]
    embedding_provider: Option<String>,
    #[serde(rename = "embeddingModel")]
    embedding_model: Option<String>,
    #[serde(rename = "embeddingDim")]
    embedding_dim: Option<usize>,
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "maxToolRounds")]
    max_tool_rounds: Option<u32>,
    #[serde(rename = "pivotLanguage")]
    pivot_language: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: "data/faq.md".to_string(),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            endpoint: None,
            embedding_provider: "ollama".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dim: 384,
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 2,
            max_tool_rounds: 4,
            pivot_language: PIVOT_LANGUAGE.to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `POLYFAQ_SOURCE`: Document source (path or URL)
    /// - `POLYFAQ_CONFIG`: Path to config file
    /// - `POLYFAQ_PROVIDER`: Chat model provider
    /// - `POLYFAQ_MODEL`: Chat model identifier
    /// - `POLYFAQ_ENDPOINT`: Provider endpoint URL
    /// - `POLYFAQ_EMBEDDING_PROVIDER`: Embedding provider
    /// - `POLYFAQ_EMBEDDING_MODEL`: Embedding model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("POLYFAQ_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("polyfaq.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(source) = std::env::var("POLYFAQ_SOURCE") {
            config.source = source;
        }
        if let Ok(provider) = std::env::var("POLYFAQ_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(model) = std::env::var("POLYFAQ_MODEL") {
            config.model = model;
        }
        if let Ok(endpoint) = std::env::var("POLYFAQ_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }
        if let Ok(provider) = std::env::var("POLYFAQ_EMBEDDING_PROVIDER") {
            config.embedding_provider = provider;
        }
        if let Ok(model) = std::env::var("POLYFAQ_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(source) = file.source {
            result.source = source;
        }
        if let Some(provider) = file.provider {
            result.provider = provider;
        }
        if let Some(model) = file.model {
            result.model = model;
        }
        if let Some(endpoint) = file.endpoint {
            result.endpoint = Some(endpoint);
        }
        if let Some(provider) = file.embedding_provider {
            result.embedding_provider = provider;
        }
        if let Some(model) = file.embedding_model {
            result.embedding_model = model;
        }
        if let Some(dim) = file.embedding_dim {
            result.embedding_dim = dim;
        }
        if let Some(size) = file.chunk_size {
            result.chunk_size = size;
        }
        if let Some(overlap) = file.chunk_overlap {
            result.chunk_overlap = overlap;
        }
        if let Some(top_k) = file.top_k {
            result.top_k = top_k;
        }
        if let Some(rounds) = file.max_tool_rounds {
            result.max_tool_rounds = rounds;
        }
        if let Some(pivot) = file.pivot_language {
            result.pivot_language = pivot;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Merges command-line flags with the loaded configuration, giving
    /// precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        source: Option<String>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(source) = source {
            self.source = source;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration before serving.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "mock"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if !known_providers.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_providers.join(", ")
            )));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}
