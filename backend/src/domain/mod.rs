//! Domain primitives, policies, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP adapter, the
//! persistence layer, and the command-line tools, together with the services
//! implementing the driving ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Product, ProductDraft, ProductPatch: inventory records and inputs.
//! - User, Role, Registration: identities and access roles.
//! - authorize / ensure_can_modify: role-based access policy.
//! - TextSplitter, PromptTemplate, cosine_similarity: RAG helpers.
//! - AuthService, ProductService, ChatService, DocumentService,
//!   EmbeddingIngestionService, ProductSeeder: use-case services.

pub mod access;
pub mod auth;
mod auth_service;
mod chat_service;
pub mod document;
mod document_service;
pub mod error;
mod ingestion;
pub mod llm_cache;
pub mod ports;
pub mod product;
mod product_service;
pub mod rag;
pub mod reports;
mod seeding;
pub mod trace_id;
pub mod user;

pub use self::access::{Action, authorize, ensure_can_modify};
pub use self::auth::{
    AuthenticatedUser, Claims, LoginCredentials, LoginValidationError, TokenKind, TokenPair,
};
pub use self::auth_service::AuthService;
pub use self::chat_service::{ChatModels, ChatService};
pub use self::document::{
    DocumentId, DocumentUpload, DocumentValidationError, NewDocument, UploadReceipt,
};
pub use self::document_service::DocumentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ingestion::{
    EMBEDDING_BATCH_SIZE, EmbeddingIngestionService, IngestionError, IngestionReport,
};
pub use self::llm_cache::{CacheKey, CachedAnswer, DEFAULT_CACHE_TTL_MINUTES};
pub use self::product::{
    NewProduct, Product, ProductDraft, ProductId, ProductKind, ProductPatch,
    ProductValidationError,
};
pub use self::product_service::ProductService;
pub use self::rag::{
    CHUNK_OVERLAP, CHUNK_SIZE, ChatProvider, Collection, EmbeddingCandidate, NewEmbedding,
    PromptTemplate, RETRIEVAL_K, ScoredChunk, SearchScope, TextSplitter, build_context,
    cosine_similarity, rank_by_similarity,
};
pub use self::reports::{DEFAULT_LOW_STOCK_THRESHOLD, InventorySummary};
pub use self::seeding::{ProductSeeder, SeedError, SeedReport};
pub use self::trace_id::TraceId;
pub use self::user::{
    Registration, Role, User, UserCredentialsRecord, UserId, UserValidationError, Username,
};
