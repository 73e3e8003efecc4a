//! Reqwest-backed language model adapters.
//!
//! `OpenAiClient` provides embeddings and chat completions; `OllamaChatModel`
//! provides chat completions against a local Ollama server. Both chat models
//! share the OpenAI embeddings so retrieval sees one vector space.

mod dto;
mod http;
mod ollama;
mod openai;

pub use ollama::{OLLAMA_TEMPERATURE, OllamaChatModel, OllamaSettings};
pub use openai::{OPENAI_TEMPERATURE, OpenAiClient, OpenAiSettings};
