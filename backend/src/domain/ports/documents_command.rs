//! Driving port for document uploads.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, DocumentUpload, Error, UploadReceipt};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentsCommand: Send + Sync {
    /// Store, chunk, and embed an upload for `caller`.
    async fn upload(
        &self,
        caller: AuthenticatedUser,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt, Error>;
}

/// Upload stand-in that accepts documents without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentsCommand;

#[async_trait]
impl DocumentsCommand for FixtureDocumentsCommand {
    async fn upload(
        &self,
        _caller: AuthenticatedUser,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt, Error> {
        Ok(UploadReceipt {
            document_id: crate::domain::DocumentId::new(1),
            chunks: crate::domain::TextSplitter::default().split(upload.text()).len(),
        })
    }
}
