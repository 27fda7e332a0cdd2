//! Domain model for task provisioning.
//!
//! The task domain models identity resolution rules, branch slug derivation,
//! review request selection, template interpolation and document placement
//! as pure values and functions. All I/O stays outside the domain boundary.

mod branch;
mod document;
mod error;
mod identity;
mod issue;
mod review;
mod template;

pub use branch::{BRANCH_PREFIX, BranchSlug};
pub use document::{DEFAULT_ANCHOR, insert_after_anchor};
pub use error::{ParseReviewStateError, TaskDomainError};
pub use identity::{
    ProvisionRequest, TaskIdentity, candidate_issue_key, issue_browse_url, summarize_issue_title,
};
pub use issue::{IssueKey, RemoteIssue};
pub use review::{ReviewRequest, ReviewState, select_review_request};
pub use template::{DEFAULT_TASK_TEMPLATE, Placeholder, TaskTemplate, TemplateValues};
