//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Neither a task name nor an issue key could be established.
    #[error("missing identity: enter a task name or an issue key")]
    MissingIdentity,

    /// The issue key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid issue key '{0}'")]
    InvalidIssueKey(String),

    /// The document does not contain the anchor text new tasks are placed
    /// after.
    #[error("anchor {0:?} not found in document")]
    AnchorNotFound(String),
}

/// Error returned while parsing review request states from remote payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review request state: {0}")]
pub struct ParseReviewStateError(pub String);
