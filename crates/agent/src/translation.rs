//! Language detection and translation over the chat model.
//!
//! Both operations are stateless single-prompt round-trips against the
//! same model the generation loop uses. Detection output is normalized
//! permissively: models decorate their answers with punctuation or
//! trailing prose, so we take the first token and lowercase it rather
//! than validating against a code set.

use polyfaq_core::{AppError, AppResult};
use polyfaq_llm::ChatClient;
use std::sync::Arc;

/// Detection and translation helper bound to one chat model.
#[derive(Clone)]
pub struct LanguageService {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl LanguageService {
    /// Create a service over a chat client and model.
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Detect the language of `text`, returning a lowercase ISO-639-1 code.
    pub async fn detect(&self, text: &str) -> AppResult<String> {
        let prompt = format!(
            "Detect the language of the following text and return only the \
             language code (ISO-639-1):\n---\n{}",
            text
        );

        let raw = self
            .client
            .prompt(&self.model, &prompt)
            .await
            .map_err(|e| AppError::Detection(e.to_string()))?;

        let code = normalize_language_code(&raw);
        if code.is_empty() {
            return Err(AppError::Detection(format!(
                "Model returned no language code (raw response: {:?})",
                raw
            )));
        }

        tracing::debug!("Detected language: {}", code);
        Ok(code)
    }

    /// Translate `text` into the language named by `target` (a code or name).
    pub async fn translate(&self, text: &str, target: &str) -> AppResult<String> {
        let prompt = format!(
            "Translate the following text into {}. Do not add commentary.\n---\n{}",
            target, text
        );

        let translated = self
            .client
            .prompt(&self.model, &prompt)
            .await
            .map_err(|e| AppError::Translation(e.to_string()))?;

        Ok(translated.trim().to_string())
    }
}

/// Reduce a raw detection response to a bare language code.
///
/// Takes the first whitespace-separated token, strips surrounding quotes
/// and trailing punctuation, and lowercases. "EN.", "'es'" and
/// "fr (French)" all normalize cleanly.
fn normalize_language_code(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.' || c == ',')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyfaq_llm::{ChatMessage, MockChatClient};

    #[test]
    fn test_normalize_language_code() {
        assert_eq!(normalize_language_code("en"), "en");
        assert_eq!(normalize_language_code("  EN.  "), "en");
        assert_eq!(normalize_language_code("'es'"), "es");
        assert_eq!(normalize_language_code("fr (French)"), "fr");
        assert_eq!(normalize_language_code("de\n"), "de");
        assert_eq!(normalize_language_code(""), "");
    }

    #[tokio::test]
    async fn test_detect_normalizes_response() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant("ES."));

        let service = LanguageService::new(client, "scripted");
        let code = service.detect("¿Dónde puedo solicitar un visado?").await.unwrap();
        assert_eq!(code, "es");
    }

    #[tokio::test]
    async fn test_detect_empty_response_fails() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant("   "));

        let service = LanguageService::new(client, "scripted");
        let result = service.detect("hello").await;
        assert!(matches!(result, Err(AppError::Detection(_))));
    }

    #[tokio::test]
    async fn test_translate_trims_output() {
        let client = Arc::new(MockChatClient::new());
        client.push_response(ChatMessage::assistant("  You need a valid passport.\n"));

        let service = LanguageService::new(client.clone(), "scripted");
        let translated = service
            .translate("Necesita un pasaporte válido.", "en")
            .await
            .unwrap();

        assert_eq!(translated, "You need a valid passport.");

        // The prompt names the target language and forbids commentary
        let requests = client.recorded_requests();
        match &requests[0].messages[0] {
            ChatMessage::User { content } => {
                assert!(content.contains("into en"));
                assert!(content.contains("Do not add commentary"));
            }
            other => panic!("expected user message, got {:?}", other),
        }
    }
}
