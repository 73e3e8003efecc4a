//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{DocumentId, NewDocument};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewDocumentRow;
use super::pool::DbPool;
use super::schema::documents;

/// Diesel-backed implementation of the `DocumentRepository` port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn insert(&self, document: &NewDocument) -> Result<DocumentId, DocumentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, DocumentRepositoryError::connection))?;
        let upload = &document.upload;
        let id: i32 = diesel::insert_into(documents::table)
            .values(NewDocumentRow {
                user_id: document.user_id.get(),
                filename: upload.filename(),
                content_type: Some(upload.content_type()),
                text: upload.text(),
            })
            .returning(documents::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    DocumentRepositoryError::query,
                    DocumentRepositoryError::connection,
                )
            })?;
        Ok(DocumentId::new(id))
    }
}
