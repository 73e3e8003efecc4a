//! Document upload service implementing [`DocumentsCommand`].
//!
//! An upload is stored, split, embedded into the caller's collection, and
//! finally clears the caller's cached answers so new context is picked up.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::ingestion::embed_in_batches;
use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentsCommand, EmbeddingProvider,
    LlmCacheRepository, LlmProviderError, VectorStore, VectorStoreError,
};
use crate::domain::{
    Action, AuthenticatedUser, Collection, DocumentId, DocumentUpload, EMBEDDING_BATCH_SIZE, Error,
    NewDocument, NewEmbedding, TextSplitter, UploadReceipt, UserId, authorize,
};

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentRepositoryError::Query { message } => {
            Error::internal(format!("document repository error: {message}"))
        }
    }
}

fn map_vector_store_error(error: VectorStoreError) -> Error {
    match error {
        VectorStoreError::Connection { message } => {
            Error::service_unavailable(format!("vector store unavailable: {message}"))
        }
        VectorStoreError::Query { message } => {
            Error::internal(format!("vector store error: {message}"))
        }
    }
}

fn map_provider_error(error: LlmProviderError) -> Error {
    Error::service_unavailable(format!("embedding provider failed: {error}"))
}

/// Upload pipeline for user documents.
#[derive(Clone)]
pub struct DocumentService<D, E, V, L> {
    documents: Arc<D>,
    embeddings: Arc<E>,
    vectors: Arc<V>,
    cache: Arc<L>,
    splitter: TextSplitter,
}

impl<D, E, V, L> DocumentService<D, E, V, L> {
    pub fn new(documents: Arc<D>, embeddings: Arc<E>, vectors: Arc<V>, cache: Arc<L>) -> Self {
        Self {
            documents,
            embeddings,
            vectors,
            cache,
            splitter: TextSplitter::default(),
        }
    }
}

fn chunk_embeddings(
    user_id: UserId,
    document_id: DocumentId,
    filename: &str,
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
) -> Vec<NewEmbedding> {
    chunks
        .into_iter()
        .zip(vectors)
        .map(|(content, embedding)| NewEmbedding {
            collection: Collection::UserEmbeddings,
            content,
            embedding,
            metadata: json!({
                "user_id": user_id.get(),
                "filename": filename,
                "doc_id": document_id.get(),
            }),
            user_id: Some(user_id),
            product_id: None,
            document_id: Some(document_id),
        })
        .collect()
}

#[async_trait]
impl<D, E, V, L> DocumentsCommand for DocumentService<D, E, V, L>
where
    D: DocumentRepository,
    E: EmbeddingProvider,
    V: VectorStore,
    L: LlmCacheRepository,
{
    async fn upload(
        &self,
        caller: AuthenticatedUser,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt, Error> {
        authorize(Some(&caller), Action::UploadDocument)?;
        let chunks = self.splitter.split(upload.text());
        let filename = upload.filename().to_owned();
        let document_id = self
            .documents
            .insert(&NewDocument {
                user_id: caller.user_id,
                upload,
            })
            .await
            .map_err(map_document_error)?;

        let vectors = embed_in_batches(self.embeddings.as_ref(), &chunks, EMBEDDING_BATCH_SIZE)
            .await
            .map_err(map_provider_error)?;
        if vectors.len() != chunks.len() {
            return Err(Error::service_unavailable(format!(
                "embedding provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        let rows = chunk_embeddings(caller.user_id, document_id, &filename, chunks, vectors);
        let stored = self
            .vectors
            .add(rows)
            .await
            .map_err(map_vector_store_error)?;

        match self.cache.invalidate_user(caller.user_id).await {
            Ok(removed) => info!(user_id = %caller.user_id, removed, "answer cache invalidated"),
            Err(err) => warn!(error = %err, user_id = %caller.user_id, "cache invalidation failed"),
        }
        info!(
            user_id = %caller.user_id,
            document_id = %document_id,
            chunks = stored,
            "document uploaded"
        );
        Ok(UploadReceipt {
            document_id,
            chunks: stored,
        })
    }
}
