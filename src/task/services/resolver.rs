//! Identity resolution against the optional issue tracker.

use std::sync::Arc;
use tracing::debug;

use crate::task::{
    domain::{
        IssueKey, ProvisionRequest, TaskIdentity, issue_browse_url, summarize_issue_title,
    },
    ports::IssueTracker,
};

use super::ProvisioningResult;

/// Turns raw user input into a canonical [`TaskIdentity`].
#[derive(Clone, Default)]
pub struct IdentityResolver {
    tracker: Option<Arc<dyn IssueTracker>>,
    browse_base: Option<String>,
}

impl IdentityResolver {
    /// Creates a resolver with no tracker integration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables issue lookups through `tracker`.
    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Sets the tracker base URL used to build issue links.
    ///
    /// Links are produced even when the tracker integration itself is
    /// disabled, as long as the base URL is known.
    #[must_use]
    pub fn with_browse_base(mut self, base_url: impl Into<String>) -> Self {
        self.browse_base = Some(base_url.into());
        self
    }

    /// Returns `true` when issue lookups are enabled.
    #[must_use]
    pub const fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    /// Resolves the identity for a provisioning request.
    ///
    /// With a tracker configured, an explicitly supplied key is always looked
    /// up and a failed lookup aborts resolution. Without a tracker the key is
    /// used as typed, and stands in for the task name when none was given.
    ///
    /// # Errors
    ///
    /// Returns [`super::ProvisioningError::Validation`] when neither a task
    /// name nor an issue key is present (no tracker call is made), and
    /// [`super::ProvisioningError::IssueTracker`] when the lookup fails.
    pub async fn resolve(&self, request: &ProvisionRequest) -> ProvisioningResult<TaskIdentity> {
        let task_name = request.task_name();
        let Some(candidate) = request.candidate_key()? else {
            return Ok(TaskIdentity::new(task_name, None)?);
        };

        let (resolved_name, key) = match &self.tracker {
            Some(tracker) => {
                let issue = tracker.fetch_issue(&candidate).await?;
                debug!(
                    requested = %candidate,
                    canonical = %issue.key(),
                    status = issue.status(),
                    "issue resolved"
                );
                let name = if task_name.is_empty() {
                    summarize_issue_title(issue.title())
                } else {
                    task_name.to_owned()
                };
                (name, issue.key().clone())
            }
            None => {
                let name = if task_name.is_empty() {
                    candidate.to_string()
                } else {
                    task_name.to_owned()
                };
                (name, candidate)
            }
        };

        let url = self.browse_url(&key);
        let identity = TaskIdentity::new(resolved_name, Some(key))?;
        Ok(match url {
            Some(link) => identity.with_issue_url(link),
            None => identity,
        })
    }

    fn browse_url(&self, key: &IssueKey) -> Option<String> {
        self.browse_base
            .as_deref()
            .map(|base| issue_browse_url(base, key))
    }
}
