//! Driving port for the inventory chatbot.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, ChatProvider, Error};

/// Answer returned by the chatbot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    pub answer: String,
    /// Provider-qualified model label, e.g. `openai-rag`.
    pub model: &'static str,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatQuery: Send + Sync {
    /// Answer `question` from the inventory and the caller's documents.
    async fn answer(
        &self,
        caller: AuthenticatedUser,
        question: &str,
        provider: ChatProvider,
    ) -> Result<ChatAnswer, Error>;
}

/// Chatbot stand-in used when no providers are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChatQuery;

#[async_trait]
impl ChatQuery for FixtureChatQuery {
    async fn answer(
        &self,
        _caller: AuthenticatedUser,
        _question: &str,
        provider: ChatProvider,
    ) -> Result<ChatAnswer, Error> {
        Ok(ChatAnswer {
            answer: "I don't know based on the provided documents.".to_owned(),
            model: provider.model_name(),
        })
    }
}
