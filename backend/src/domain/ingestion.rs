//! Backfill of product embeddings for the chatbot.
//!
//! Products already present in the product collection are skipped, so the
//! ingestion can be rerun after each seeding pass.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    EmbeddingProvider, LlmProviderError, ProductRepository, ProductRepositoryError, VectorStore,
    VectorStoreError,
};
use crate::domain::{Collection, NewEmbedding, Product, TextSplitter};

/// Number of chunks sent to the embedding provider per request.
pub const EMBEDDING_BATCH_SIZE: usize = 32;

/// Embed `texts` with provider requests of at most `batch_size` inputs,
/// returning the vectors in input order.
pub(crate) async fn embed_in_batches<E>(
    embeddings: &E,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, LlmProviderError>
where
    E: EmbeddingProvider + ?Sized,
{
    let mut vectors = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size.max(1)) {
        vectors.extend(embeddings.embed_documents(batch).await?);
    }
    Ok(vectors)
}

/// Failures that abort an ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("failed to load products: {0}")]
    Products(#[from] ProductRepositoryError),
    #[error("vector store failed: {0}")]
    VectorStore(#[from] VectorStoreError),
    #[error("embedding provider failed: {0}")]
    Provider(#[from] LlmProviderError),
    #[error("embedding provider returned {returned} vectors for {expected} chunks")]
    VectorCountMismatch { returned: usize, expected: usize },
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub products_embedded: usize,
    pub chunks_stored: usize,
}

struct PendingChunk {
    product: usize,
    content: String,
}

/// Embeds products that have no chunks in the vector store yet.
pub struct EmbeddingIngestionService<P, E, V> {
    products: Arc<P>,
    embeddings: Arc<E>,
    vectors: Arc<V>,
    splitter: TextSplitter,
    batch_size: usize,
}

impl<P, E, V> EmbeddingIngestionService<P, E, V>
where
    P: ProductRepository,
    E: EmbeddingProvider,
    V: VectorStore,
{
    pub fn new(products: Arc<P>, embeddings: Arc<E>, vectors: Arc<V>) -> Self {
        Self {
            products,
            embeddings,
            vectors,
            splitter: TextSplitter::default(),
            batch_size: EMBEDDING_BATCH_SIZE,
        }
    }

    /// Override the embedding batch size. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Replace the splitter used for product descriptions.
    #[must_use]
    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Pack whole products into groups of at most `batch_size` chunks.
    ///
    /// A product is never split across groups, so a failed group leaves none
    /// of its products partially stored. A product with more chunks than the
    /// batch size forms a group of its own.
    fn group_by_product(&self, pending: &[&Product]) -> Vec<Vec<PendingChunk>> {
        let mut groups = Vec::new();
        let mut current: Vec<PendingChunk> = Vec::new();
        for (index, product) in pending.iter().enumerate() {
            let chunks = self.splitter.split(&product.describe());
            if !current.is_empty() && current.len() + chunks.len() > self.batch_size {
                groups.push(std::mem::take(&mut current));
            }
            current.extend(chunks.into_iter().map(|content| PendingChunk {
                product: index,
                content,
            }));
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }

    /// Embed every product not yet present in the product collection.
    pub async fn ingest_new_products(&self) -> Result<IngestionReport, IngestionError> {
        let products = self.products.list_all().await?;
        let embedded: HashSet<_> = self
            .vectors
            .embedded_product_ids()
            .await?
            .into_iter()
            .collect();

        let pending: Vec<&Product> = products
            .iter()
            .filter(|product| !embedded.contains(&product.id))
            .collect();
        if pending.is_empty() {
            info!("no new products to embed");
            return Ok(IngestionReport::default());
        }

        let mut chunks_stored = 0;
        for group in self.group_by_product(&pending) {
            let texts: Vec<String> = group.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = embed_in_batches(self.embeddings.as_ref(), &texts, self.batch_size).await?;
            if vectors.len() != group.len() {
                return Err(IngestionError::VectorCountMismatch {
                    returned: vectors.len(),
                    expected: group.len(),
                });
            }
            let rows = group
                .into_iter()
                .zip(vectors)
                .map(|(chunk, embedding)| {
                    let product = pending[chunk.product];
                    NewEmbedding {
                        collection: Collection::ProductEmbeddings,
                        content: chunk.content,
                        embedding,
                        metadata: json!({ "product_id": product.id.get() }),
                        user_id: None,
                        product_id: Some(product.id),
                        document_id: None,
                    }
                })
                .collect::<Vec<_>>();
            let written = rows.len();
            chunks_stored += self.vectors.add(rows).await?;
            debug!(chunks = written, "embedded product batch");
        }

        let report = IngestionReport {
            products_embedded: pending.len(),
            chunks_stored,
        };
        info!(
            products = report.products_embedded,
            chunks = report.chunks_stored,
            "product embeddings ingested"
        );
        Ok(report)
    }
}
