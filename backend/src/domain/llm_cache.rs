//! Keys and entries for cached chatbot answers.
//!
//! Answers are cached per model, prompt, and user. The prompt is stored in
//! full but addressed by its SHA-256 digest so the unique index stays small.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use super::UserId;

/// Default lifetime of a cached answer.
pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 60;

/// Lookup key for a cached answer.
///
/// # Examples
/// ```
/// use inventory::domain::{CacheKey, UserId};
///
/// let user = UserId::new(1).unwrap();
/// let a = CacheKey::new("openai-rag", "How many lamps?", user);
/// let b = CacheKey::new("openai-rag", "How many lamps?", user);
/// assert_eq!(a, b);
/// assert_eq!(a.prompt_hash().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    model_name: String,
    prompt: String,
    prompt_hash: String,
    user_id: UserId,
}

impl CacheKey {
    pub fn new(model_name: impl Into<String>, prompt: impl Into<String>, user_id: UserId) -> Self {
        let prompt = prompt.into();
        let prompt_hash = hex::encode(Sha256::digest(prompt.as_bytes()));
        Self {
            model_name: model_name.into(),
            prompt,
            prompt_hash,
            user_id,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn prompt_hash(&self) -> &str {
        &self.prompt_hash
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Stored answer with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    pub response: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedAnswer {
    /// Build an entry that expires `ttl` after `now`.
    #[must_use]
    pub fn fresh(response: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            response,
            expires_at: now + ttl,
        }
    }

    /// Whether the entry has lapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
