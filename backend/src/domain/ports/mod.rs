//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters and
//! implemented by domain services. Driven ports (repositories, providers,
//! security primitives) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_command;
mod chat_query;
mod document_repository;
mod documents_command;
mod llm_cache_repository;
mod llm_provider;
mod password_hasher;
mod product_repository;
mod products_command;
mod products_query;
mod token_service;
mod user_repository;
mod vector_store;

#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::{AuthCommand, FIXTURE_ACCESS_TOKEN, FixtureAuthCommand};
#[cfg(test)]
pub use chat_query::MockChatQuery;
pub use chat_query::{ChatAnswer, ChatQuery, FixtureChatQuery};
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentRepository, DocumentRepositoryError};
#[cfg(test)]
pub use documents_command::MockDocumentsCommand;
pub use documents_command::{DocumentsCommand, FixtureDocumentsCommand};
#[cfg(test)]
pub use llm_cache_repository::MockLlmCacheRepository;
pub use llm_cache_repository::{LlmCacheError, LlmCacheRepository};
#[cfg(test)]
pub use llm_provider::{MockChatModel, MockEmbeddingProvider};
pub use llm_provider::{ChatModel, EmbeddingProvider, FixtureEmbeddingProvider, LlmProviderError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{
    FixtureProductRepository, ProductRepository, ProductRepositoryError,
};
#[cfg(test)]
pub use products_command::MockProductsCommand;
pub use products_command::{FixtureProductsCommand, ProductsCommand};
#[cfg(test)]
pub use products_query::MockProductsQuery;
pub use products_query::{FixtureProductsQuery, ProductsQuery};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUserRecord, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use vector_store::MockVectorStore;
pub use vector_store::{VectorStore, VectorStoreError};
