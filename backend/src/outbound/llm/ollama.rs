//! Ollama chat completions over the local `/api/chat` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::{ChatMessageDto, OllamaChatRequestDto, OllamaChatResponseDto, OllamaOptionsDto};
use super::http::{endpoint, send_json};
use crate::domain::ports::{ChatModel, LlmProviderError};

/// Deterministic sampling for the local model.
pub const OLLAMA_TEMPERATURE: f32 = 0.0;

/// Connection and model settings for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub base_url: Url,
    pub chat_model: String,
    pub timeout: Duration,
}

/// [`ChatModel`] backed by a non-streaming Ollama chat request.
pub struct OllamaChatModel {
    client: Client,
    chat_url: Url,
    model: String,
}

impl OllamaChatModel {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be built or the base
    /// URL is unusable.
    pub fn new(settings: OllamaSettings) -> Result<Self, LlmProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| LlmProviderError::configuration(err.to_string()))?;
        Ok(Self {
            client,
            chat_url: endpoint(&settings.base_url, "api/chat")?,
            model: settings.chat_model,
        })
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmProviderError> {
        let request = OllamaChatRequestDto {
            model: &self.model,
            messages: vec![ChatMessageDto::user(prompt)],
            stream: false,
            options: OllamaOptionsDto {
                temperature: OLLAMA_TEMPERATURE,
            },
        };
        let response: OllamaChatResponseDto =
            send_json(self.client.post(self.chat_url.clone()), &request).await?;
        response.into_answer().map_err(LlmProviderError::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_maps_to_transport_error() {
        let model = OllamaChatModel::new(OllamaSettings {
            base_url: Url::parse("http://127.0.0.1:9").expect("valid url"),
            chat_model: "llama3".to_owned(),
            timeout: Duration::from_secs(2),
        })
        .expect("client");

        let error = model.complete("hi").await.expect_err("nothing listens on port 9");
        assert!(matches!(
            error,
            LlmProviderError::Transport { .. } | LlmProviderError::Timeout { .. }
        ));
    }
}
