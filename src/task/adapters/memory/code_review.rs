//! In-memory code-review service for provisioning tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{BranchSlug, ReviewRequest, select_review_request},
    ports::{CodeReview, CodeReviewError, CodeReviewResult},
};

/// Thread-safe in-memory review request store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCodeReview {
    state: Arc<RwLock<CodeReviewState>>,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct CodeReviewState {
    requests: Vec<ReviewRequest>,
    failure: Option<CodeReviewError>,
}

impl InMemoryCodeReview {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a review request.
    ///
    /// # Errors
    ///
    /// Returns [`CodeReviewError::Transport`] when the state lock is
    /// poisoned.
    pub fn insert(&self, request: ReviewRequest) -> CodeReviewResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.requests.push(request);
        Ok(())
    }

    /// Makes every subsequent call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`CodeReviewError::Transport`] when the state lock is
    /// poisoned.
    pub fn fail_with(&self, error: CodeReviewError) -> CodeReviewResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.failure = Some(error);
        Ok(())
    }

    /// Returns how many service calls were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn poisoned(err: impl std::fmt::Display) -> CodeReviewError {
    CodeReviewError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CodeReview for InMemoryCodeReview {
    async fn find_by_source_branch(
        &self,
        branch: &BranchSlug,
    ) -> CodeReviewResult<Option<ReviewRequest>> {
        self.record_call();
        let state = self.state.read().map_err(poisoned)?;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        Ok(select_review_request(
            branch.as_str(),
            state.requests.iter().cloned(),
        ))
    }

    async fn fetch_review_request(&self, iid: u64) -> CodeReviewResult<ReviewRequest> {
        self.record_call();
        let state = self.state.read().map_err(poisoned)?;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        state
            .requests
            .iter()
            .find(|request| request.iid() == iid)
            .cloned()
            .ok_or(CodeReviewError::NotFound(iid))
    }

    async fn test_connection(&self) -> bool {
        self.record_call();
        self.state
            .read()
            .map(|state| state.failure.is_none())
            .unwrap_or(false)
    }
}
