//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain's driven ports on top of `diesel-async`
//! with a `bb8` connection pool. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use inventory::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/inventory")).await?;
//! let products = DieselProductRepository::new(pool);
//! ```

mod diesel_document_repository;
mod diesel_error_mapping;
mod diesel_llm_cache_repository;
mod diesel_product_repository;
mod diesel_user_repository;
mod diesel_vector_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_llm_cache_repository::DieselLlmCacheRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vector_store::DieselVectorStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
