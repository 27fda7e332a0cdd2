//! Best-effort correlation of branch slugs with review requests.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::task::{
    domain::{BranchSlug, ReviewRequest},
    ports::CodeReview,
};

/// Looks up the review request opened from a derived branch.
#[derive(Clone, Default)]
pub struct ReviewCorrelator {
    review: Option<Arc<dyn CodeReview>>,
}

impl ReviewCorrelator {
    /// Creates a correlator with no review integration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables lookups through `review`.
    #[must_use]
    pub fn with_code_review(mut self, review: Arc<dyn CodeReview>) -> Self {
        self.review = Some(review);
        self
    }

    /// Returns `true` when review lookups are enabled.
    #[must_use]
    pub const fn has_code_review(&self) -> bool {
        self.review.is_some()
    }

    /// Returns the review request for `branch`, if one can be found.
    ///
    /// Never fails. An empty slug or a missing integration short-circuits
    /// without a remote call, and lookup errors are logged and reported as
    /// no match.
    pub async fn correlate(&self, branch: &BranchSlug) -> Option<ReviewRequest> {
        if branch.is_empty() {
            return None;
        }
        let review = self.review.as_ref()?;

        match review.find_by_source_branch(branch).await {
            Ok(found) => {
                debug!(branch = %branch, found = found.is_some(), "review lookup finished");
                found
            }
            Err(error) => {
                warn!(branch = %branch, %error, "review lookup failed, continuing without link");
                None
            }
        }
    }
}
