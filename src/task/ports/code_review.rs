//! Code-review service port used to correlate branches with review requests.

use crate::task::domain::{BranchSlug, ReviewRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for code-review operations.
pub type CodeReviewResult<T> = Result<T, CodeReviewError>;

/// Authenticated read access to review requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeReview: Send + Sync {
    /// Finds the review request whose source branch equals `branch`.
    ///
    /// Returns `None` when nothing matches; that is the common case for a
    /// freshly provisioned task, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CodeReviewError`] only when the remote call cannot complete.
    async fn find_by_source_branch(
        &self,
        branch: &BranchSlug,
    ) -> CodeReviewResult<Option<ReviewRequest>>;

    /// Fetches a review request by its project-scoped identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CodeReviewError::NotFound`] when the identifier is unknown,
    /// or another [`CodeReviewError`] when the call fails.
    async fn fetch_review_request(&self, iid: u64) -> CodeReviewResult<ReviewRequest>;

    /// Checks that the service is reachable with the configured credentials.
    ///
    /// Never fails: transport problems are reported as `false`.
    async fn test_connection(&self) -> bool;
}

/// Errors returned by code-review implementations.
#[derive(Debug, Clone, Error)]
pub enum CodeReviewError {
    /// No review request with this identifier exists.
    #[error("review request !{0} not found")]
    NotFound(u64),

    /// The service rejected the credentials.
    #[error("code review service rejected credentials (status {status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Message returned by the service.
        message: String,
    },

    /// The service answered with another non-success status.
    #[error("code review request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message returned by the service.
        message: String,
    },

    /// The request could not be completed.
    #[error("code review transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The service answered with a payload that could not be decoded.
    #[error("malformed code review response: {0}")]
    Parse(Arc<dyn std::error::Error + Send + Sync>),
}

impl CodeReviewError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a decoding failure.
    pub fn parse(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Parse(Arc::new(err))
    }
}
