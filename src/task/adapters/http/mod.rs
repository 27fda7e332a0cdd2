//! HTTP adapters for the remote issue tracker and code-review service.
//!
//! Both clients perform a single attempt per call and never retry.

mod gitlab;
mod jira;
mod response;

pub use gitlab::{GitLabClient, GitLabConfig};
pub use jira::{JiraClient, JiraConfig};
