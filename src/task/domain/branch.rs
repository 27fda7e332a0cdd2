//! Branch slug derivation for provisioned tasks.

use super::IssueKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every derived branch slug.
pub const BRANCH_PREFIX: &str = "branches/";

/// Canonical branch name derived from an issue key and a task name.
///
/// The slug has the form `branches/<issue-key>-<sanitized-task-name>` and is
/// entirely lowercase. Derivation is a pure function of its inputs, so the
/// same key and name always produce the same slug. An empty slug means that
/// derivation was skipped because no issue key was available.
///
/// # Examples
///
///     use taskwright::task::domain::{BranchSlug, IssueKey};
///
///     let key = IssueKey::new("proj-123").expect("valid key");
///     let slug = BranchSlug::derive(Some(&key), "Fix Login Bug!!");
///     assert_eq!(slug.as_str(), "branches/proj-123-fix-login-bug");
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchSlug(String);

impl BranchSlug {
    /// Derives the branch slug. Never fails.
    ///
    /// Without an issue key the result is [`BranchSlug::empty`].
    #[must_use]
    pub fn derive(issue_key: Option<&IssueKey>, task_name: &str) -> Self {
        let Some(key) = issue_key else {
            return Self::empty();
        };
        // Key casing must not leak into the slug, so the whole slug is
        // lowercased again after assembly.
        let slug = format!("{BRANCH_PREFIX}{key}-{}", sanitize_task_name(task_name));
        Self(slug.to_lowercase())
    }

    /// Returns the empty slug used when derivation is skipped.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` when derivation was skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BranchSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercases the name, drops characters outside `[a-z0-9\s-]` and turns
/// every whitespace run into a single `-`.
fn sanitize_task_name(task_name: &str) -> String {
    let lowered = task_name.to_lowercase();
    let mut sanitized = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('-');
            }
            in_whitespace = true;
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            sanitized.push(ch);
            in_whitespace = false;
        }
    }

    sanitized
}
