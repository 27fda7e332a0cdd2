//! In-memory issue tracker for provisioning tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{IssueKey, RemoteIssue},
    ports::{IssueTracker, IssueTrackerError, IssueTrackerResult},
};

/// Thread-safe in-memory issue tracker.
///
/// Lookups are case-insensitive and answer with the stored issue's own key,
/// mirroring how a real tracker canonicalises keys. Every remote-style call
/// is counted so tests can assert that no lookup happened.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<IssueTrackerState>>,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct IssueTrackerState {
    issues: BTreeMap<String, RemoteIssue>,
    failure: Option<IssueTrackerError>,
}

impl InMemoryIssueTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue, replacing any issue with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::Transport`] when the state lock is
    /// poisoned.
    pub fn insert(&self, issue: RemoteIssue) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.issues.insert(lookup_key(issue.key()), issue);
        Ok(())
    }

    /// Makes every subsequent call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::Transport`] when the state lock is
    /// poisoned.
    pub fn fail_with(&self, error: IssueTrackerError) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.failure = Some(error);
        Ok(())
    }

    /// Returns how many tracker calls were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn lookup_key(key: &IssueKey) -> String {
    key.as_str().to_ascii_uppercase()
}

fn poisoned(err: impl std::fmt::Display) -> IssueTrackerError {
    IssueTrackerError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn fetch_issue(&self, key: &IssueKey) -> IssueTrackerResult<RemoteIssue> {
        self.record_call();
        let state = self.state.read().map_err(poisoned)?;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        state
            .issues
            .get(&lookup_key(key))
            .cloned()
            .ok_or_else(|| IssueTrackerError::NotFound(key.to_string()))
    }

    async fn search_issues(&self, query: &str) -> IssueTrackerResult<Vec<RemoteIssue>> {
        self.record_call();
        let state = self.state.read().map_err(poisoned)?;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        let needle = query.trim().to_lowercase();
        Ok(state
            .issues
            .values()
            .filter(|issue| issue.title().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn test_connection(&self) -> bool {
        self.record_call();
        self.state
            .read()
            .map(|state| state.failure.is_none())
            .unwrap_or(false)
    }
}
