//! Polyfaq CLI
//!
//! Main entry point for the polyfaq command-line tool.
//! Answers questions about an indexed FAQ document, in any language.

mod commands;
mod pipeline;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use polyfaq_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Polyfaq CLI - multilingual question answering over a document source
#[derive(Parser, Debug)]
#[command(name = "polyfaq")]
#[command(about = "Multilingual question answering over a document source", long_about = None)]
#[command(version)]
struct Cli {
    /// Document source: a file path or an http(s) URL
    #[arg(short, long, global = true, env = "POLYFAQ_SOURCE")]
    source: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true, env = "POLYFAQ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Chat model provider (ollama, mock)
    #[arg(short, long, global = true, env = "POLYFAQ_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "POLYFAQ_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question and print the answer
    Ask(AskCommand),

    /// Interactive question-answering session
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.source,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    // Log startup
    tracing::info!("Polyfaq CLI starting");
    tracing::debug!("Source: {}", config.source);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
