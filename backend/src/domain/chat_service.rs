//! Retrieval-augmented chatbot service implementing [`ChatQuery`].
//!
//! Flow per question: cache lookup, query embedding, similarity search over
//! product chunks and the caller's document chunks, prompt rendering, chat
//! completion, cache write. Cache failures are logged and never surfaced.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ChatAnswer, ChatModel, ChatQuery, EmbeddingProvider, LlmCacheRepository, LlmProviderError,
    VectorStore, VectorStoreError,
};
use crate::domain::{
    Action, AuthenticatedUser, CacheKey, CachedAnswer, ChatProvider, DEFAULT_CACHE_TTL_MINUTES,
    Error, PromptTemplate, RETRIEVAL_K, SearchScope, authorize, build_context,
};

fn map_provider_error(error: LlmProviderError) -> Error {
    Error::service_unavailable(format!("language model provider failed: {error}"))
}

fn map_vector_store_error(error: VectorStoreError) -> Error {
    match error {
        VectorStoreError::Connection { message } => {
            Error::service_unavailable(format!("vector store unavailable: {message}"))
        }
        VectorStoreError::Query { message } => {
            Error::internal(format!("vector store error: {message}"))
        }
    }
}

/// Chat completion backends keyed by provider.
#[derive(Clone)]
pub struct ChatModels {
    pub openai: Arc<dyn ChatModel>,
    pub ollama: Arc<dyn ChatModel>,
}

impl ChatModels {
    fn for_provider(&self, provider: ChatProvider) -> &dyn ChatModel {
        match provider {
            ChatProvider::OpenAi => self.openai.as_ref(),
            ChatProvider::Ollama => self.ollama.as_ref(),
        }
    }
}

/// Chatbot service answering inventory questions.
#[derive(Clone)]
pub struct ChatService<E, V, L> {
    embeddings: Arc<E>,
    vectors: Arc<V>,
    cache: Arc<L>,
    models: ChatModels,
    clock: Arc<dyn Clock>,
    template: PromptTemplate,
    cache_ttl: Duration,
}

impl<E, V, L> ChatService<E, V, L> {
    pub fn new(
        embeddings: Arc<E>,
        vectors: Arc<V>,
        cache: Arc<L>,
        models: ChatModels,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            embeddings,
            vectors,
            cache,
            models,
            clock,
            template: PromptTemplate::default(),
            cache_ttl: Duration::minutes(DEFAULT_CACHE_TTL_MINUTES),
        }
    }

    /// Override how long answers stay cached.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

impl<E, V, L> ChatService<E, V, L>
where
    L: LlmCacheRepository,
{
    async fn cached(&self, key: &CacheKey) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(entry)) if !entry.is_expired(self.clock.utc()) => {
                info!(model = key.model_name(), user_id = %key.user_id(), "answer cache hit");
                Some(entry.response)
            }
            Ok(Some(_)) => {
                info!(model = key.model_name(), user_id = %key.user_id(), "answer cache expired");
                None
            }
            Ok(None) => {
                info!(model = key.model_name(), user_id = %key.user_id(), "answer cache miss");
                None
            }
            Err(err) => {
                warn!(error = %err, "answer cache lookup failed");
                None
            }
        }
    }

    async fn remember(&self, key: &CacheKey, answer: &str) {
        let entry = CachedAnswer::fresh(answer.to_owned(), self.clock.utc(), self.cache_ttl);
        if let Err(err) = self.cache.upsert(key, &entry).await {
            warn!(error = %err, "answer cache write failed");
        }
    }
}

#[async_trait]
impl<E, V, L> ChatQuery for ChatService<E, V, L>
where
    E: EmbeddingProvider,
    V: VectorStore,
    L: LlmCacheRepository,
{
    async fn answer(
        &self,
        caller: AuthenticatedUser,
        question: &str,
        provider: ChatProvider,
    ) -> Result<ChatAnswer, Error> {
        authorize(Some(&caller), Action::Chat)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_request("question must not be empty"));
        }
        let model = provider.model_name();
        let key = CacheKey::new(model, question, caller.user_id);

        if let Some(answer) = self.cached(&key).await {
            return Ok(ChatAnswer { answer, model });
        }

        let query = self
            .embeddings
            .embed_query(question)
            .await
            .map_err(map_provider_error)?;
        let scope = SearchScope {
            user_id: Some(caller.user_id),
        };
        let chunks = self
            .vectors
            .similarity_search(&query, scope, RETRIEVAL_K)
            .await
            .map_err(map_vector_store_error)?;
        debug!(retrieved = chunks.len(), "context retrieved");

        let prompt = self.template.render(&build_context(&chunks), question);
        let raw = self
            .models
            .for_provider(provider)
            .complete(&prompt)
            .await
            .map_err(map_provider_error)?;
        let answer = raw.trim().to_owned();

        self.remember(&key, &answer).await;
        Ok(ChatAnswer { answer, model })
    }
}
