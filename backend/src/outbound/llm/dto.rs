//! Wire types for the OpenAI and Ollama HTTP APIs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'a str,
    pub(super) content: &'a str,
}

impl<'a> ChatMessageDto<'a> {
    pub(super) const fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct EmbeddingRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(super) struct EmbeddingResponseDto {
    pub(super) data: Vec<EmbeddingDataDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EmbeddingDataDto {
    #[serde(default)]
    pub(super) index: usize,
    pub(super) embedding: Vec<f32>,
}

impl EmbeddingResponseDto {
    /// Vectors in input order, regardless of the order the API returned.
    pub(super) fn into_vectors(mut self, expected: usize) -> Result<Vec<Vec<f32>>, String> {
        if self.data.len() != expected {
            return Err(format!(
                "expected {expected} embeddings, received {}",
                self.data.len()
            ));
        }
        self.data.sort_by_key(|item| item.index);
        Ok(self.data.into_iter().map(|item| item.embedding).collect())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct OpenAiChatRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<ChatMessageDto<'a>>,
    pub(super) temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAiChatResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<OpenAiChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAiChoiceDto {
    pub(super) message: AssistantMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssistantMessageDto {
    #[serde(default)]
    pub(super) content: Option<String>,
}

impl OpenAiChatResponseDto {
    pub(super) fn into_answer(self) -> Result<String, String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "response contained no answer".to_owned())
    }
}

// ---------------------------------------------------------------------------
// Ollama
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct OllamaChatRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<ChatMessageDto<'a>>,
    pub(super) stream: bool,
    pub(super) options: OllamaOptionsDto,
}

#[derive(Debug, Serialize)]
pub(super) struct OllamaOptionsDto {
    pub(super) temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(super) struct OllamaChatResponseDto {
    pub(super) message: AssistantMessageDto,
}

impl OllamaChatResponseDto {
    pub(super) fn into_answer(self) -> Result<String, String> {
        self.message
            .content
            .ok_or_else(|| "response contained no answer".to_owned())
    }
}
