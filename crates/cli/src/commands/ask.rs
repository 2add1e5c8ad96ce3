//! Ask command handler.
//!
//! One-shot question answering: index the source, answer once, exit.

use crate::pipeline;
use clap::Args;
use futures::StreamExt;
use polyfaq_agent::AnswerEvent;
use polyfaq_core::{config::AppConfig, AppError, AppResult};
use std::io::Write;
use std::path::PathBuf;

/// Ask a single question and print the answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask (alternative to --file)
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Enable streaming (default: true)
    #[arg(long, default_value = "true")]
    pub stream: bool,

    /// Disable streaming
    #[arg(long, conflicts_with = "stream")]
    pub no_stream: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = self
            .get_question()
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let agent = pipeline::build(config).await?;

        if self.is_streaming() && !self.json {
            self.handle_streaming(&agent, &question).await
        } else {
            self.handle_non_streaming(&agent, &question, config).await
        }
    }

    /// Print the answer once the whole pipeline has finished.
    async fn handle_non_streaming(
        &self,
        agent: &polyfaq_agent::MultilingualAgent,
        question: &str,
        config: &AppConfig,
    ) -> AppResult<()> {
        let answer = agent.answer(question).await?;

        if self.json {
            let output = serde_json::json!({
                "question": question,
                "answer": answer,
                "model": config.model,
                "provider": config.provider,
                "source": config.source,
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }

    /// Print intermediate fragments as they arrive, then the final answer.
    ///
    /// Fragments are in the pivot language; when the final answer differs
    /// from the concatenated fragments (a translated answer), it is printed
    /// on its own line.
    async fn handle_streaming(
        &self,
        agent: &polyfaq_agent::MultilingualAgent,
        question: &str,
    ) -> AppResult<()> {
        let mut stream = agent.answer_stream(question);
        let mut streamed = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                AnswerEvent::Fragment(text) => {
                    print!("{}", text);
                    std::io::stdout().flush().ok();
                    streamed.push_str(&text);
                }
                AnswerEvent::Final(answer) => {
                    println!();
                    if answer != streamed.trim() {
                        println!("{}", answer);
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    /// Get the question text from argument or file.
    fn get_question(&self) -> Option<String> {
        self.question.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
            })
        })
    }

    /// Check if streaming is enabled.
    fn is_streaming(&self) -> bool {
        !self.no_stream && self.stream
    }
}
