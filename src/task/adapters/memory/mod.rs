//! In-memory adapters used by tests and dry runs.

mod code_review;
mod document;
mod issue_tracker;

pub use code_review::InMemoryCodeReview;
pub use document::InMemoryDocument;
pub use issue_tracker::InMemoryIssueTracker;
