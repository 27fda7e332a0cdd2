//! Document port receiving provisioned task text.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Whole-document read and write access.
#[async_trait]
pub trait TaskDocument: Send + Sync {
    /// Reads the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the document cannot be read.
    async fn read(&self) -> DocumentResult<String>;

    /// Replaces the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the document cannot be written.
    async fn write(&self, contents: &str) -> DocumentResult<()>;
}

/// Errors returned by document implementations.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// The document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Storage-layer failure.
    #[error("document storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
