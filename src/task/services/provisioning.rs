//! Provisioning orchestration: resolve, derive, correlate, interpolate.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::task::{
    domain::{
        BranchSlug, Placeholder, ProvisionRequest, ReviewRequest, TaskIdentity, TaskTemplate,
        TemplateValues, insert_after_anchor,
    },
    ports::{CodeReview, IssueTracker, TaskDocument},
};

use super::{IdentityResolver, ProvisioningResult, ReviewCorrelator};

/// Outcome of a successful provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTask {
    identity: TaskIdentity,
    branch: BranchSlug,
    review_request: Option<ReviewRequest>,
    text: String,
}

impl ProvisionedTask {
    /// Returns the resolved identity.
    #[must_use]
    pub const fn identity(&self) -> &TaskIdentity {
        &self.identity
    }

    /// Returns the derived branch slug (empty when no issue key was known).
    #[must_use]
    pub const fn branch(&self) -> &BranchSlug {
        &self.branch
    }

    /// Returns the linked review request, if one was found.
    #[must_use]
    pub const fn review_request(&self) -> Option<&ReviewRequest> {
        self.review_request.as_ref()
    }

    /// Returns the interpolated text ready for insertion.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the outcome and returns the interpolated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Task provisioning orchestration service.
///
/// Holds only read-only collaborators, so concurrent attempts can share one
/// instance without coordination.
#[derive(Clone, Default)]
pub struct ProvisioningService {
    resolver: IdentityResolver,
    correlator: ReviewCorrelator,
    template: TaskTemplate,
}

impl ProvisioningService {
    /// Creates a service rendering `template`, with both integrations
    /// disabled.
    #[must_use]
    pub fn new(template: TaskTemplate) -> Self {
        Self {
            resolver: IdentityResolver::new(),
            correlator: ReviewCorrelator::new(),
            template,
        }
    }

    /// Enables issue lookups.
    #[must_use]
    pub fn with_issue_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.resolver = self.resolver.with_tracker(tracker);
        self
    }

    /// Sets the tracker base URL used for `{{jiraUrl}}`.
    #[must_use]
    pub fn with_browse_base(mut self, base_url: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_browse_base(base_url);
        self
    }

    /// Enables review request correlation.
    #[must_use]
    pub fn with_code_review(mut self, review: Arc<dyn CodeReview>) -> Self {
        self.correlator = self.correlator.with_code_review(review);
        self
    }

    /// Returns the template used for interpolation.
    #[must_use]
    pub const fn template(&self) -> &TaskTemplate {
        &self.template
    }

    /// Returns the identity resolver.
    #[must_use]
    pub const fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Returns the review correlator.
    #[must_use]
    pub const fn correlator(&self) -> &ReviewCorrelator {
        &self.correlator
    }

    /// Provisions task text for `request`.
    ///
    /// Issues at most one tracker call and then at most one review call, in
    /// that order. Only identity resolution can fail; branch derivation,
    /// review correlation and interpolation always complete.
    ///
    /// # Errors
    ///
    /// Returns [`super::ProvisioningError::Validation`] when no identity can
    /// be established and [`super::ProvisioningError::IssueTracker`] when an
    /// explicitly supplied issue cannot be fetched.
    #[instrument(skip_all, fields(task_name = request.task_name(), issue = request.issue()))]
    pub async fn provision(&self, request: &ProvisionRequest) -> ProvisioningResult<ProvisionedTask> {
        let identity = self.resolver.resolve(request).await?;
        let branch = BranchSlug::derive(identity.issue_key(), identity.task_name());
        let review_request = self.correlator.correlate(&branch).await;
        let text = self.template.render(&template_values(
            &identity,
            &branch,
            review_request.as_ref(),
        ));

        info!(
            issue_key = identity.issue_key().map(|key| key.as_str()),
            branch = %branch,
            linked_review = review_request.is_some(),
            "task provisioned"
        );
        Ok(ProvisionedTask {
            identity,
            branch,
            review_request,
            text,
        })
    }

    /// Provisions task text and inserts it into `document` after `anchor`.
    ///
    /// The document is written once, and only after every resolution step
    /// has finished, so a failed attempt never leaves it partially updated.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::provision`],
    /// [`super::ProvisioningError::Validation`] when the anchor is missing,
    /// and [`super::ProvisioningError::Document`] when the document cannot
    /// be read or written.
    pub async fn provision_into_document<D>(
        &self,
        request: &ProvisionRequest,
        document: &D,
        anchor: &str,
    ) -> ProvisioningResult<ProvisionedTask>
    where
        D: TaskDocument + ?Sized,
    {
        let provisioned = self.provision(request).await?;
        let current = document.read().await?;
        let updated = insert_after_anchor(&current, anchor, provisioned.text())?;
        document.write(&updated).await?;
        Ok(provisioned)
    }
}

fn template_values(
    identity: &TaskIdentity,
    branch: &BranchSlug,
    review_request: Option<&ReviewRequest>,
) -> TemplateValues {
    TemplateValues::new()
        .with(Placeholder::TaskName, identity.task_name())
        .with(
            Placeholder::JiraKey,
            identity.issue_key().map(|key| key.as_str()).unwrap_or_default(),
        )
        .with(Placeholder::JiraUrl, identity.issue_url().unwrap_or_default())
        .with(Placeholder::BranchName, branch.as_str())
        .with(
            Placeholder::MrLink,
            review_request.map(ReviewRequest::url).unwrap_or_default(),
        )
}
