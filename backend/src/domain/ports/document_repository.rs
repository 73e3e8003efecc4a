//! Port for storing uploaded documents.

use async_trait::async_trait;

use crate::domain::{DocumentId, NewDocument};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        Connection { message: String } => "document repository connection failed: {message}",
        Query { message: String } => "document repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist the raw upload and return its identifier.
    async fn insert(&self, document: &NewDocument) -> Result<DocumentId, DocumentRepositoryError>;
}
