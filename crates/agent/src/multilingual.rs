//! Multilingual orchestration around the generation loop.
//!
//! The loop itself always runs in the pivot language. This wrapper
//! detects the user's language, translates the query into the pivot
//! when they differ, and translates the final answer back. When the
//! detected language equals the pivot, no translation calls are made
//! at all.

use crate::agent::{Agent, AnswerEvent, AnswerStream};
use crate::translation::LanguageService;
use futures::StreamExt;
use polyfaq_core::AppResult;
use tokio::sync::mpsc;

/// Language-aware front end over the [`Agent`].
#[derive(Clone)]
pub struct MultilingualAgent {
    agent: Agent,
    language: LanguageService,
    pivot: String,
}

impl MultilingualAgent {
    /// Wrap an agent with detection/translation around a pivot language.
    pub fn new(agent: Agent, language: LanguageService, pivot: impl Into<String>) -> Self {
        Self {
            agent,
            language,
            pivot: pivot.into(),
        }
    }

    /// Answer a query in the user's own language.
    pub async fn answer(&self, query: &str) -> AppResult<String> {
        let user_lang = self.language.detect(query).await?;
        tracing::info!("User language: {} (pivot: {})", user_lang, self.pivot);

        if user_lang == self.pivot {
            return self.agent.run(query).await;
        }

        let pivot_query = self.language.translate(query, &self.pivot).await?;
        let pivot_answer = self.agent.run(&pivot_query).await?;
        let answer = self.language.translate(&pivot_answer, &user_lang).await?;
        Ok(answer.trim().to_string())
    }

    /// Answer a query, streaming intermediate output.
    ///
    /// Fragments are emitted in the pivot language as the loop produces
    /// them; the `Final` event carries the answer translated back into
    /// the user's language. For a pivot-language query the stream is the
    /// agent's own, untouched.
    pub fn answer_stream(&self, query: &str) -> AnswerStream {
        let (tx, rx) = mpsc::channel(16);
        let this = self.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            if let Err(e) = this.drive_stream(&query, &tx).await {
                let _ = tx.send(Err(e)).await;
            }
        });

        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }

    async fn drive_stream(
        &self,
        query: &str,
        tx: &mpsc::Sender<AppResult<AnswerEvent>>,
    ) -> AppResult<()> {
        let user_lang = self.language.detect(query).await?;

        let pivot_query = if user_lang == self.pivot {
            query.to_string()
        } else {
            self.language.translate(query, &self.pivot).await?
        };

        let mut inner = self.agent.run_stream(&pivot_query);
        while let Some(event) = inner.next().await {
            match event? {
                AnswerEvent::Fragment(text) => {
                    if tx.send(Ok(AnswerEvent::Fragment(text))).await.is_err() {
                        return Ok(());
                    }
                }
                AnswerEvent::Final(pivot_answer) => {
                    let answer = if user_lang == self.pivot {
                        pivot_answer
                    } else {
                        self.language
                            .translate(&pivot_answer, &user_lang)
                            .await?
                            .trim()
                            .to_string()
                    };
                    let _ = tx.send(Ok(AnswerEvent::Final(answer))).await;
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
