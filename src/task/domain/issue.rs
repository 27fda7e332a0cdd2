//! Issue-tracker value objects.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated issue-tracker key such as `PROJ-123`.
///
/// Keys are trimmed and restricted to ASCII alphanumerics, `-` and `_`, so a
/// key can be placed into request paths and branch names without escaping.
/// Casing is preserved; the tracker decides the canonical form.
///
/// # Examples
///
///     use taskwright::task::domain::IssueKey;
///
///     let key = IssueKey::new(" PROJ-123 ").expect("valid");
///     assert_eq!(key.as_str(), "PROJ-123");
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Creates a validated issue key.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidIssueKey`] when the value is empty
    /// after trimming or contains unsupported characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');

        if !is_valid {
            return Err(TaskDomainError::InvalidIssueKey(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a remote issue taken during a single provisioning attempt.
///
/// Snapshots are never cached between attempts; the tracker stays the source
/// of truth at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    key: IssueKey,
    title: String,
    status: String,
}

impl RemoteIssue {
    /// Creates an issue snapshot.
    #[must_use]
    pub fn new(key: IssueKey, title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            status: status.into(),
        }
    }

    /// Returns the tracker's canonical key for the issue.
    #[must_use]
    pub const fn key(&self) -> &IssueKey {
        &self.key
    }

    /// Returns the issue summary line.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the workflow status name, e.g. `In Progress`.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}
