//! Placeholder templates for provisioned task text.

use std::collections::BTreeMap;
use std::fmt;

/// Checklist template used when configuration supplies none.
pub const DEFAULT_TASK_TEMPLATE: &str = "\
- [ ] {{taskName}} [{{jiraKey}}]({{jiraUrl}})
    - [ ] Branch {{branchName}}
    - [ ] Plan
    - [ ] Implement
        - [ ]
    - [ ] [MR]({{mrLink}})
        - [ ] Description
        - [ ] Deploy to staging
        - [ ] Test on staging
        - [ ] Request review
        - [ ] Hand over to QA
    - [ ] Tests pass
    - [ ] Approved
    - [ ] Merged";

/// Named placeholders recognised in task templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `{{taskName}}`: resolved task name.
    TaskName,
    /// `{{jiraKey}}`: canonical issue key.
    JiraKey,
    /// `{{jiraUrl}}`: human-facing issue URL.
    JiraUrl,
    /// `{{branchName}}`: derived branch slug.
    BranchName,
    /// `{{mrLink}}`: web URL of the linked review request.
    MrLink,
}

impl Placeholder {
    /// Every recognised placeholder.
    pub const ALL: [Self; 5] = [
        Self::TaskName,
        Self::JiraKey,
        Self::JiraUrl,
        Self::BranchName,
        Self::MrLink,
    ];

    /// Returns the name used between the braces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskName => "taskName",
            Self::JiraKey => "jiraKey",
            Self::JiraUrl => "jiraUrl",
            Self::BranchName => "branchName",
            Self::MrLink => "mrLink",
        }
    }

    /// Returns the literal token, e.g. `{{taskName}}`.
    #[must_use]
    pub fn token(self) -> String {
        format!("{{{{{}}}}}", self.as_str())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values supplied for template placeholders.
///
/// Placeholders without a value render as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues(BTreeMap<Placeholder, String>);

impl TemplateValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a placeholder, replacing any previous value.
    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.0.insert(placeholder, value.into());
        self
    }

    /// Returns the value for a placeholder, or `""` when absent.
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> &str {
        self.0.get(&placeholder).map_or("", String::as_str)
    }
}

/// User-owned task template.
///
/// # Examples
///
///     use taskwright::task::domain::{Placeholder, TaskTemplate, TemplateValues};
///
///     let template = TaskTemplate::new("{{taskName}} {{jiraKey}}");
///     let values = TemplateValues::new().with(Placeholder::TaskName, "Demo");
///     assert_eq!(template.render(&values), "Demo ");
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate(String);

impl TaskTemplate {
    /// Wraps template source text.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Returns the template source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes every occurrence of each recognised placeholder.
    /// Never fails.
    ///
    /// A token is `{{name}}` for one of the [`Placeholder`] names, with
    /// optional whitespace inside the braces. Every occurrence is replaced,
    /// not only the first, so a recognised placeholder is never left
    /// literal. Any other text, including unknown `{{names}}` and Jinja-like
    /// syntax such as `{# ... #}`, is copied unchanged.
    ///
    /// The source is scanned once from left to right, so a value containing
    /// braces is inserted verbatim and never substituted again.
    #[must_use]
    pub fn render(&self, values: &TemplateValues) -> String {
        let mut rendered = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find(OPEN) {
            let (before, candidate) = rest.split_at(start);
            rendered.push_str(before);
            rest = match match_token(candidate) {
                Some((placeholder, tail)) => {
                    rendered.push_str(values.get(placeholder));
                    tail
                }
                None => {
                    rendered.push('{');
                    candidate.get(1..).unwrap_or_default()
                }
            };
        }

        rendered.push_str(rest);
        rendered
    }
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Matches a placeholder token at the start of `candidate`, which begins
/// with `{{`, returning the placeholder and the text after the token.
fn match_token(candidate: &str) -> Option<(Placeholder, &str)> {
    let body = candidate.strip_prefix(OPEN)?;
    let (inner, tail) = body.split_once(CLOSE)?;
    let name = inner.trim();
    Placeholder::ALL
        .into_iter()
        .find(|placeholder| placeholder.as_str() == name)
        .map(|placeholder| (placeholder, tail))
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_TEMPLATE)
    }
}
