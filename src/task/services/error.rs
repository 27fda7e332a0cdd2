//! Service-level errors for task provisioning.

use thiserror::Error;

use crate::task::{
    domain::TaskDomainError,
    ports::{DocumentError, IssueTrackerError},
};

/// Errors that abort a provisioning attempt.
///
/// Review-service failures never appear here: correlation is best-effort and
/// reports problems as "no linked review".
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The input is not usable: no identity, a malformed key, or a document
    /// without the insertion anchor.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// An explicitly requested issue could not be fetched.
    #[error("failed to fetch issue: {0}")]
    IssueTracker(#[from] IssueTrackerError),

    /// The target document could not be read or written.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ProvisioningError {
    /// Returns `true` for user-correctable input problems.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
