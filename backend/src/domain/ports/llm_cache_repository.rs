//! Port for the chatbot answer cache.

use async_trait::async_trait;

use crate::domain::{CacheKey, CachedAnswer, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by answer cache adapters.
    pub enum LlmCacheError {
        Connection { message: String } => "llm cache connection failed: {message}",
        Query { message: String } => "llm cache query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmCacheRepository: Send + Sync {
    /// Read an entry regardless of expiry; callers decide freshness.
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedAnswer>, LlmCacheError>;

    /// Insert or replace the entry for `key`.
    async fn upsert(&self, key: &CacheKey, answer: &CachedAnswer) -> Result<(), LlmCacheError>;

    /// Delete every entry owned by `user_id`, returning the number removed.
    async fn invalidate_user(&self, user_id: UserId) -> Result<usize, LlmCacheError>;
}
