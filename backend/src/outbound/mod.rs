//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and vector store using Diesel
//! - **security**: Argon2 password hashing and JWT signing
//! - **llm**: OpenAI and Ollama HTTP clients
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod llm;
pub mod persistence;
pub mod security;
