//! Uploaded text documents owned by a single user.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

const DEFAULT_CONTENT_TYPE: &str = "text/plain";
const FILENAME_MAX: usize = 512;
const CONTENT_TYPE_MAX: usize = 100;

/// Validation errors for document uploads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentValidationError {
    #[error("filename must not be empty")]
    EmptyFilename,
    #[error("filename must be at most {max} characters")]
    FilenameTooLong { max: usize },
    #[error("content_type must be at most {max} characters")]
    ContentTypeTooLong { max: usize },
    #[error("document text must not be empty")]
    EmptyText,
}

/// Database-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i32);

impl DocumentId {
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated upload request.
///
/// ## Invariants
/// - `filename` is trimmed and non-empty.
/// - `text` contains at least one non-whitespace character.
/// - `content_type` defaults to `text/plain` and holds at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    filename: String,
    content_type: String,
    text: String,
}

impl DocumentUpload {
    pub fn try_from_parts(
        filename: &str,
        content_type: Option<&str>,
        text: String,
    ) -> Result<Self, DocumentValidationError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(DocumentValidationError::EmptyFilename);
        }
        if filename.chars().count() > FILENAME_MAX {
            return Err(DocumentValidationError::FilenameTooLong { max: FILENAME_MAX });
        }
        if text.trim().is_empty() {
            return Err(DocumentValidationError::EmptyText);
        }
        let content_type = content_type
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        if content_type.chars().count() > CONTENT_TYPE_MAX {
            return Err(DocumentValidationError::ContentTypeTooLong {
                max: CONTENT_TYPE_MAX,
            });
        }
        Ok(Self {
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            text,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Document row written for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub user_id: UserId,
    pub upload: DocumentUpload,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReceipt {
    pub document_id: DocumentId,
    pub chunks: usize,
}
