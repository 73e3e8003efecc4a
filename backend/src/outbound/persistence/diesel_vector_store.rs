//! PostgreSQL-backed `VectorStore` storing embeddings as `REAL[]` columns.
//!
//! Candidates are filtered by collection in SQL and ranked by cosine
//! similarity in process.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{VectorStore, VectorStoreError};
use crate::domain::{
    Collection, DocumentId, EmbeddingCandidate, NewEmbedding, ProductId, ScoredChunk,
    SearchScope, UserId, rank_by_similarity,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EmbeddingCandidateRow, NewEmbeddingRow};
use super::pool::{DbPool, PoolError};
use super::schema::embeddings;

/// Diesel-backed implementation of the `VectorStore` port.
#[derive(Clone)]
pub struct DieselVectorStore {
    pool: DbPool,
}

impl DieselVectorStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> VectorStoreError {
    map_pool_error(error, VectorStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> VectorStoreError {
    map_diesel_error(error, VectorStoreError::query, VectorStoreError::connection)
}

impl From<NewEmbedding> for NewEmbeddingRow {
    fn from(embedding: NewEmbedding) -> Self {
        Self {
            collection: embedding.collection.as_str().to_owned(),
            content: embedding.content,
            embedding: embedding.embedding,
            metadata: embedding.metadata,
            user_id: embedding.user_id.map(UserId::get),
            product_id: embedding.product_id.map(ProductId::get),
            document_id: embedding.document_id.map(DocumentId::get),
        }
    }
}

#[async_trait]
impl VectorStore for DieselVectorStore {
    async fn add(&self, embeddings: Vec<NewEmbedding>) -> Result<usize, VectorStoreError> {
        if embeddings.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewEmbeddingRow> = embeddings.into_iter().map(Into::into).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(embeddings::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        scope: SearchScope,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let product_chunks = embeddings::collection.eq(Collection::ProductEmbeddings.as_str());
        let base = embeddings::table
            .select(EmbeddingCandidateRow::as_select())
            .into_boxed();
        let filtered = match scope.user_id {
            Some(user_id) => base.filter(
                product_chunks.or(embeddings::collection
                    .eq(Collection::UserEmbeddings.as_str())
                    .and(embeddings::user_id.assume_not_null().eq(user_id.get()))),
            ),
            None => base.filter(product_chunks),
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = filtered.load(&mut conn).await.map_err(diesel_error)?;
        debug!(candidates = rows.len(), "ranking embedding candidates");

        let candidates = rows
            .into_iter()
            .map(|row| EmbeddingCandidate {
                content: row.content,
                embedding: row.embedding,
            })
            .collect();
        Ok(rank_by_similarity(query, candidates, k))
    }

    async fn embedded_product_ids(&self) -> Result<Vec<ProductId>, VectorStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<i32> = embeddings::table
            .filter(embeddings::collection.eq(Collection::ProductEmbeddings.as_str()))
            .filter(embeddings::product_id.is_not_null())
            .select(embeddings::product_id.assume_not_null())
            .distinct()
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| ProductId::new(id).ok())
            .collect())
    }
}
