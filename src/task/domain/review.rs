//! Code-review request value objects and match selection.

use super::ParseReviewStateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a review request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Open for review.
    Open,
    /// Merged into the target branch.
    Merged,
    /// Closed without merging.
    Closed,
    /// Locked while the service processes it.
    Locked,
}

impl ReviewState {
    /// Returns the canonical state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }
}

impl TryFrom<&str> for ReviewState {
    type Error = ParseReviewStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" | "opened" => Ok(Self::Open),
            "merged" => Ok(Self::Merged),
            "closed" => Ok(Self::Closed),
            "locked" => Ok(Self::Locked),
            _ => Err(ParseReviewStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of a review request on the code-review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    id: u64,
    iid: u64,
    url: String,
    title: String,
    source_branch: String,
    target_branch: String,
    state: ReviewState,
    author: String,
    updated_at: Option<DateTime<Utc>>,
}

impl ReviewRequest {
    /// Creates an open review request with the given identifiers, web URL
    /// and source branch. Remaining fields start empty.
    #[must_use]
    pub fn new(id: u64, iid: u64, url: impl Into<String>, source_branch: impl Into<String>) -> Self {
        Self {
            id,
            iid,
            url: url.into(),
            title: String::new(),
            source_branch: source_branch.into(),
            target_branch: String::new(),
            state: ReviewState::Open,
            author: String::new(),
            updated_at: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the target branch.
    #[must_use]
    pub fn with_target_branch(mut self, target_branch: impl Into<String>) -> Self {
        self.target_branch = target_branch.into();
        self
    }

    /// Sets the state.
    #[must_use]
    pub const fn with_state(mut self, state: ReviewState) -> Self {
        self.state = state;
        self
    }

    /// Sets the author's username.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the last-updated timestamp.
    #[must_use]
    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Returns the service-wide identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the project-scoped identifier.
    #[must_use]
    pub const fn iid(&self) -> u64 {
        self.iid
    }

    /// Returns the web URL used as the review link.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the source branch.
    #[must_use]
    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    /// Returns the target branch.
    #[must_use]
    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }

    /// Returns the state.
    #[must_use]
    pub const fn state(&self) -> ReviewState {
        self.state
    }

    /// Returns the author's username.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the last-updated timestamp, when the service reported one.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Picks one review request among those matching `source_branch` exactly.
///
/// The service gives no ordering guarantee, so the choice is made
/// deterministically: open requests win, then the most recently updated,
/// then the highest project-scoped identifier.
#[must_use]
pub fn select_review_request(
    source_branch: &str,
    candidates: impl IntoIterator<Item = ReviewRequest>,
) -> Option<ReviewRequest> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.source_branch == source_branch)
        .max_by_key(|candidate| {
            (
                candidate.state == ReviewState::Open,
                candidate.updated_at,
                candidate.iid,
            )
        })
}
