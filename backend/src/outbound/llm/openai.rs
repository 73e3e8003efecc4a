//! OpenAI embeddings and chat completions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    ChatMessageDto, EmbeddingRequestDto, EmbeddingResponseDto, OpenAiChatRequestDto,
    OpenAiChatResponseDto,
};
use super::http::{endpoint, send_json};
use crate::domain::ports::{ChatModel, EmbeddingProvider, LlmProviderError};

/// Sampling temperature for inventory answers.
pub const OPENAI_TEMPERATURE: f32 = 0.3;

/// Connection and model settings for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiSettings {
    pub base_url: Url,
    pub api_key: Option<Zeroizing<String>>,
    pub chat_model: String,
    pub embedding_model: String,
    pub timeout: Duration,
}

/// Client implementing both [`EmbeddingProvider`] and [`ChatModel`].
///
/// A missing API key is reported on first use rather than at startup, so the
/// server can boot without one and still serve the product endpoints.
pub struct OpenAiClient {
    client: Client,
    embeddings_url: Url,
    chat_url: Url,
    api_key: Option<Zeroizing<String>>,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be built or the base
    /// URL cannot be extended with the API paths.
    pub fn new(settings: OpenAiSettings) -> Result<Self, LlmProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| LlmProviderError::configuration(err.to_string()))?;
        Ok(Self {
            client,
            embeddings_url: endpoint(&settings.base_url, "embeddings")?,
            chat_url: endpoint(&settings.base_url, "chat/completions")?,
            api_key: settings.api_key.filter(|key| !key.trim().is_empty()),
            chat_model: settings.chat_model,
            embedding_model: settings.embedding_model,
        })
    }

    fn post(&self, url: &Url) -> Result<reqwest::RequestBuilder, LlmProviderError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| LlmProviderError::configuration("OpenAI API key is not set"))?;
        Ok(self.client.post(url.clone()).bearer_auth(key.as_str()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequestDto {
            model: &self.embedding_model,
            input: texts,
        };
        let response: EmbeddingResponseDto =
            send_json(self.post(&self.embeddings_url)?, &request).await?;
        debug!(inputs = texts.len(), "embedded texts");
        response
            .into_vectors(texts.len())
            .map_err(LlmProviderError::decode)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmProviderError> {
        let mut vectors = self.embed_documents(&[text.to_owned()]).await?;
        vectors
            .pop()
            .ok_or_else(|| LlmProviderError::decode("no embedding returned for query"))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmProviderError> {
        let request = OpenAiChatRequestDto {
            model: &self.chat_model,
            messages: vec![ChatMessageDto::user(prompt)],
            temperature: OPENAI_TEMPERATURE,
        };
        let response: OpenAiChatResponseDto =
            send_json(self.post(&self.chat_url)?, &request).await?;
        response.into_answer().map_err(LlmProviderError::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> OpenAiSettings {
        OpenAiSettings {
            base_url: Url::parse("http://127.0.0.1:9/v1").expect("valid url"),
            api_key: api_key.map(|key| Zeroizing::new(key.to_owned())),
            chat_model: "gpt-4o-mini".to_owned(),
            embedding_model: "text-embedding-3-small".to_owned(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let client = OpenAiClient::new(settings(Some("  "))).expect("client");
        let error = client.complete("hello").await.expect_err("no key");
        assert!(matches!(error, LlmProviderError::Configuration { .. }));
    }

    #[tokio::test]
    async fn empty_batches_skip_the_network() {
        let client = OpenAiClient::new(settings(None)).expect("client");
        let vectors = client.embed_documents(&[]).await.expect("no request");
        assert!(vectors.is_empty());
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        let client = OpenAiClient::new(settings(Some("sk-test"))).expect("client");
        assert_eq!(client.embeddings_url.as_str(), "http://127.0.0.1:9/v1/embeddings");
        assert_eq!(client.chat_url.as_str(), "http://127.0.0.1:9/v1/chat/completions");
    }
}
