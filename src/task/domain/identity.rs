//! Task identity values and the pure parsing rules used to resolve them.

use super::{IssueKey, TaskDomainError};
use url::Url;

/// Number of title words kept when a task name is derived from an issue.
const TITLE_WORD_LIMIT: usize = 3;

/// Raw user input for a provisioning attempt.
///
/// Both fields may be empty. The issue field accepts either a bare key or a
/// full issue URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionRequest {
    task_name: String,
    issue: String,
}

impl ProvisionRequest {
    /// Creates a request from raw task-name and issue-key (or URL) text.
    #[must_use]
    pub fn new(task_name: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            issue: issue.into(),
        }
    }

    /// Creates a request carrying only a task name.
    #[must_use]
    pub fn named(task_name: impl Into<String>) -> Self {
        Self::new(task_name, String::new())
    }

    /// Creates a request carrying only an issue key or URL.
    #[must_use]
    pub fn for_issue(issue: impl Into<String>) -> Self {
        Self::new(String::new(), issue)
    }

    /// Returns the trimmed task name.
    #[must_use]
    pub fn task_name(&self) -> &str {
        self.task_name.trim()
    }

    /// Returns the raw issue field.
    #[must_use]
    pub fn issue(&self) -> &str {
        &self.issue
    }

    /// Extracts the candidate issue key, validating its shape.
    ///
    /// Returns `Ok(None)` when the issue field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidIssueKey`] when a candidate exists
    /// but is not a well-formed key.
    pub fn candidate_key(&self) -> Result<Option<IssueKey>, TaskDomainError> {
        candidate_issue_key(&self.issue).map(IssueKey::new).transpose()
    }
}

/// Extracts the candidate issue key from raw user text.
///
/// Text starting with `http` is treated as an issue URL and reduced to its
/// last non-empty path segment; any other text is trimmed and used verbatim.
///
/// # Examples
///
///     use taskwright::task::domain::candidate_issue_key;
///
///     assert_eq!(
///         candidate_issue_key("https://acme.atlassian.net/browse/PROJ-7"),
///         Some("PROJ-7".to_owned()),
///     );
///     assert_eq!(candidate_issue_key("  PROJ-7 "), Some("PROJ-7".to_owned()));
///     assert_eq!(candidate_issue_key("   "), None);
#[must_use]
pub fn candidate_issue_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http") {
        last_path_segment(trimmed)
    } else {
        trimmed.to_owned()
    };
    (!candidate.is_empty()).then_some(candidate)
}

fn last_path_segment(raw_url: &str) -> String {
    let from_url = Url::parse(raw_url).ok().and_then(|url| {
        url.path_segments()
            .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
            .map(|segment| segment.trim().to_owned())
    });
    from_url.unwrap_or_else(|| {
        raw_url
            .rsplit('/')
            .find(|segment| !segment.trim().is_empty())
            .unwrap_or_default()
            .trim()
            .to_owned()
    })
}

/// Reduces an issue title to a short task name.
///
/// A leading bracketed tag such as `[BUG]` is removed, then the first three
/// whitespace-separated words are kept.
///
/// # Examples
///
///     use taskwright::task::domain::summarize_issue_title;
///
///     assert_eq!(
///         summarize_issue_title("[BUG] Fix the thing that broke yesterday"),
///         "Fix the thing",
///     );
#[must_use]
pub fn summarize_issue_title(title: &str) -> String {
    strip_leading_tag(title)
        .split_whitespace()
        .take(TITLE_WORD_LIMIT)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips a `[...]` tag at the very start of the title plus the whitespace
/// following it. The tag ends at the first `]` and may not span lines.
fn strip_leading_tag(title: &str) -> &str {
    let Some(rest) = title.strip_prefix('[') else {
        return title;
    };
    match rest.split_once(']') {
        Some((tag, tail)) if !tag.contains('\n') => tail.trim_start(),
        _ => title,
    }
}

/// Builds the human-facing issue URL from the tracker base URL.
#[must_use]
pub fn issue_browse_url(tracker_base: &str, key: &IssueKey) -> String {
    format!("{}/browse/{key}", tracker_base.trim_end_matches('/'))
}

/// Canonical identity of a task after resolution.
///
/// Either the task name is non-empty or an issue key is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIdentity {
    task_name: String,
    issue_key: Option<IssueKey>,
    issue_url: Option<String>,
}

impl TaskIdentity {
    /// Creates an identity from resolved parts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingIdentity`] when the task name is
    /// blank and no issue key is present.
    pub fn new(
        task_name: impl Into<String>,
        issue_key: Option<IssueKey>,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = task_name.into();
        let name = raw_name.trim();
        if name.is_empty() && issue_key.is_none() {
            return Err(TaskDomainError::MissingIdentity);
        }
        Ok(Self {
            task_name: name.to_owned(),
            issue_key,
            issue_url: None,
        })
    }

    /// Attaches the issue URL. Ignored when the identity has no issue key.
    #[must_use]
    pub fn with_issue_url(mut self, issue_url: impl Into<String>) -> Self {
        if self.issue_key.is_some() {
            self.issue_url = Some(issue_url.into());
        }
        self
    }

    /// Returns the resolved task name.
    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Returns the canonical issue key, if any.
    #[must_use]
    pub const fn issue_key(&self) -> Option<&IssueKey> {
        self.issue_key.as_ref()
    }

    /// Returns the issue URL, if any.
    #[must_use]
    pub fn issue_url(&self) -> Option<&str> {
        self.issue_url.as_deref()
    }
}
