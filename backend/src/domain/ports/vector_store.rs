//! Port for embedding storage and similarity search.

use async_trait::async_trait;

use crate::domain::{NewEmbedding, ProductId, ScoredChunk, SearchScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vector store adapters.
    pub enum VectorStoreError {
        Connection { message: String } => "vector store connection failed: {message}",
        Query { message: String } => "vector store query failed: {message}",
    }
}

/// Port for writing embedded chunks and retrieving the nearest ones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store embedded chunks, returning how many were written.
    async fn add(&self, embeddings: Vec<NewEmbedding>) -> Result<usize, VectorStoreError>;

    /// Return up to `k` chunks within `scope`, most similar to `query` first.
    async fn similarity_search(
        &self,
        query: &[f32],
        scope: SearchScope,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError>;

    /// Products that already have chunks in the product collection.
    async fn embedded_product_ids(&self) -> Result<Vec<ProductId>, VectorStoreError>;
}
