//! Issue-tracker port used to enrich task identities.

use crate::task::domain::{IssueKey, RemoteIssue};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue-tracker operations.
pub type IssueTrackerResult<T> = Result<T, IssueTrackerError>;

/// Authenticated read access to a remote issue tracker.
///
/// Every call is a single attempt; callers decide whether a failure is fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetches an issue by key.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::NotFound`] or [`IssueTrackerError::Auth`]
    /// when the tracker answers with the matching status,
    /// [`IssueTrackerError::Status`] for other non-success answers, and
    /// [`IssueTrackerError::Transport`] or [`IssueTrackerError::Parse`] when
    /// the exchange itself fails.
    async fn fetch_issue(&self, key: &IssueKey) -> IssueTrackerResult<RemoteIssue>;

    /// Runs a free-text (JQL) search.
    ///
    /// # Errors
    ///
    /// Returns the same error kinds as [`IssueTracker::fetch_issue`].
    async fn search_issues(&self, query: &str) -> IssueTrackerResult<Vec<RemoteIssue>>;

    /// Checks that the tracker is reachable with the configured credentials.
    ///
    /// Never fails: transport problems are reported as `false`.
    async fn test_connection(&self) -> bool;
}

/// Errors returned by issue-tracker implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueTrackerError {
    /// The tracker has no issue with this key.
    #[error("issue {0} not found")]
    NotFound(String),

    /// The tracker rejected the credentials.
    #[error("issue tracker rejected credentials (status {status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Message returned by the tracker.
        message: String,
    },

    /// The tracker answered with another non-success status.
    #[error("issue tracker request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message returned by the tracker.
        message: String,
    },

    /// The request could not be completed.
    #[error("issue tracker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The tracker answered with a payload that could not be decoded.
    #[error("malformed issue tracker response: {0}")]
    Parse(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueTrackerError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a decoding failure.
    pub fn parse(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Parse(Arc::new(err))
    }
}
