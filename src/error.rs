use thiserror::Error;

use crate::models::DocumentId;

/// Main error type for docsearch operations
#[derive(Error, Debug)]
pub enum DocsearchError {
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Posting for token '{token}' references unknown document {doc}")]
    DanglingPosting { token: String, doc: DocumentId },

    #[error("Duplicate document id: {0}")]
    DuplicateDocument(DocumentId),

    #[error("Duplicate token in term table: {0}")]
    DuplicateToken(String),

    #[error("Invalid posting weight {weight} for token '{token}'")]
    InvalidWeight { token: String, weight: f32 },

    #[error("Empty token in term table")]
    EmptyToken,

    #[error("Sphinx import error: {0}")]
    SphinxImport(String),

    #[error("Snapshot error: incompatible version {actual}, expected {expected}")]
    IncompatibleSnapshot { expected: u32, actual: u32 },

    #[error("Unsupported index format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type alias for docsearch operations
pub type Result<T> = std::result::Result<T, DocsearchError>;

impl DocsearchError {
    /// Whether the error comes from the index content itself rather than from
    /// reaching it (missing file, unreadable bytes).
    pub fn is_corrupt_index(&self) -> bool {
        matches!(
            self,
            DocsearchError::DanglingPosting { .. }
                | DocsearchError::DuplicateDocument(_)
                | DocsearchError::DuplicateToken(_)
                | DocsearchError::InvalidWeight { .. }
                | DocsearchError::EmptyToken
                | DocsearchError::SphinxImport(_)
        )
    }
}
