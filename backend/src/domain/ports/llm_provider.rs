//! Ports for remote language model providers: text embeddings and chat
//! completions.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by embedding and chat model adapters.
    pub enum LlmProviderError {
        /// The provider could not be reached.
        Transport { message: String } => "llm provider transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "llm provider request timed out: {message}",
        /// The provider answered with a non-success status.
        Status { status: u16, message: String } =>
            "llm provider returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "llm provider response decode failed: {message}",
        /// Required configuration such as an API key is missing.
        Configuration { message: String } => "llm provider misconfigured: {message}",
    }
}

/// Port for turning text into embedding vectors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmProviderError>;

    /// Embed a single search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmProviderError>;
}

/// Port for single-turn chat completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as a user message and return the raw answer text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmProviderError>;
}

/// Embedding provider returning a fixed vector for every input.
#[derive(Debug, Clone, Default)]
pub struct FixtureEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FixtureEmbeddingProvider {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmProviderError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, LlmProviderError> {
        Ok(vec![1.0, 0.0, 0.0])
    }
}
