//! Port contracts for task provisioning.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod code_review;
pub mod document;
pub mod issue_tracker;

pub use code_review::{CodeReview, CodeReviewError, CodeReviewResult};
pub use document::{DocumentError, DocumentResult, TaskDocument};
pub use issue_tracker::{IssueTracker, IssueTrackerError, IssueTrackerResult};

#[cfg(test)]
pub use code_review::MockCodeReview;
#[cfg(test)]
pub use issue_tracker::MockIssueTracker;
