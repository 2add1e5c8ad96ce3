//! Chat command handler.
//!
//! Interactive REPL over the answering pipeline. The index is built once
//! at startup; each line of input runs the full detect/translate/answer
//! cycle.

use crate::pipeline;
use clap::Args;
use futures::StreamExt;
use polyfaq_agent::AnswerEvent;
use polyfaq_core::{config::AppConfig, AppResult};
use std::io::{BufRead, Write};

/// Interactive question-answering session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Disable streaming of intermediate output
    #[arg(long)]
    pub no_stream: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let agent = pipeline::build(config).await?;

        println!("Ask questions in any language. Type 'exit' or 'quit' to leave.");

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("You: ");
            std::io::stdout().flush().ok();

            let line = match lines.next() {
                Some(line) => line?,
                None => break, // EOF
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
                break;
            }

            if let Err(e) = self.answer_one(&agent, question).await {
                // A failed turn does not end the session
                tracing::error!("Failed to answer: {}", e);
                eprintln!("Error: {}", e);
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    async fn answer_one(
        &self,
        agent: &polyfaq_agent::MultilingualAgent,
        question: &str,
    ) -> AppResult<()> {
        if self.no_stream {
            let answer = agent.answer(question).await?;
            println!("{}\n", answer);
            return Ok(());
        }

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
                    println!();
                    break;
                }
            }
        }

        Ok(())
    }
}
