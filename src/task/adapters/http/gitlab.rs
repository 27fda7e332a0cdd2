//! GitLab REST v4 adapter for the code-review port.

use super::response::{HttpFailure, build_client, probe, send_json};
use crate::task::domain::{
    BranchSlug, ParseReviewStateError, ReviewRequest, ReviewState, select_review_request,
};
use crate::task::ports::{CodeReview, CodeReviewError, CodeReviewResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Header carrying the personal or project access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Connection settings for a GitLab project.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    base_url: Url,
    token: SecretString,
    project_id: String,
    timeout: Option<Duration>,
}

impl GitLabConfig {
    /// Creates settings for the given project (numeric id or
    /// `group/project` path).
    #[must_use]
    pub const fn new(base_url: Url, token: SecretString, project_id: String) -> Self {
        Self {
            base_url,
            token,
            project_id,
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for merge requests of one GitLab project.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    project_endpoint: String,
    token: SecretString,
}

impl GitLabClient {
    /// Creates a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`CodeReviewError::Transport`] when the HTTP client cannot be
    /// initialised.
    pub fn new(config: GitLabConfig) -> CodeReviewResult<Self> {
        let http = build_client(config.timeout).map_err(CodeReviewError::transport)?;
        let encoded_project: String = byte_serialize(config.project_id.trim().as_bytes()).collect();
        let project_endpoint = format!(
            "{}/api/v4/projects/{encoded_project}",
            config.base_url.as_str().trim_end_matches('/')
        );
        Ok(Self {
            http,
            project_endpoint,
            token: config.token,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{path}", self.project_endpoint))
            .header(TOKEN_HEADER, self.token.expose_secret())
            .header(ACCEPT, "application/json")
    }
}

#[async_trait]
impl CodeReview for GitLabClient {
    async fn find_by_source_branch(
        &self,
        branch: &BranchSlug,
    ) -> CodeReviewResult<Option<ReviewRequest>> {
        debug!(branch = %branch, "looking up merge requests by source branch");
        let request = self
            .get("/merge_requests")
            .query(&[("source_branch", branch.as_str())]);
        let payload: Vec<MergeRequestPayload> = send_json(request)
            .await
            .map_err(|failure| review_error(failure, None))?;
        let candidates = payload.into_iter().filter_map(|merge_request| {
            let iid = merge_request.iid;
            merge_request
                .into_review_request()
                .inspect_err(|err| warn!(iid, error = %err, "skipping merge request"))
                .ok()
        });
        Ok(select_review_request(branch.as_str(), candidates))
    }

    async fn fetch_review_request(&self, iid: u64) -> CodeReviewResult<ReviewRequest> {
        debug!(iid, "fetching merge request");
        let payload: MergeRequestPayload = send_json(self.get(&format!("/merge_requests/{iid}")))
            .await
            .map_err(|failure| review_error(failure, Some(iid)))?;
        payload
            .into_review_request()
            .map_err(CodeReviewError::parse)
    }

    async fn test_connection(&self) -> bool {
        probe(self.get(""), "gitlab").await
    }
}

fn review_error(failure: HttpFailure, iid: Option<u64>) -> CodeReviewError {
    match failure {
        HttpFailure::NotFound { message } => match iid {
            Some(missing) => CodeReviewError::NotFound(missing),
            None => CodeReviewError::Status {
                status: 404,
                message,
            },
        },
        HttpFailure::Unauthorized { status, message } => CodeReviewError::Auth { status, message },
        HttpFailure::Status { status, message } => CodeReviewError::Status { status, message },
        HttpFailure::Transport(err) => CodeReviewError::transport(err),
        HttpFailure::Parse(err) => CodeReviewError::parse(err),
    }
}

#[derive(Debug, Deserialize)]
struct MergeRequestPayload {
    id: u64,
    iid: u64,
    #[serde(default)]
    title: String,
    state: String,
    web_url: String,
    source_branch: String,
    #[serde(default)]
    target_branch: String,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    author: Option<AuthorPayload>,
}

#[derive(Debug, Deserialize)]
struct AuthorPayload {
    username: String,
}

impl MergeRequestPayload {
    fn into_review_request(self) -> Result<ReviewRequest, ParseReviewStateError> {
        let state = ReviewState::try_from(self.state.as_str())?;
        let mut request = ReviewRequest::new(self.id, self.iid, self.web_url, self.source_branch)
            .with_title(self.title)
            .with_target_branch(self.target_branch)
            .with_state(state);
        if let Some(author) = self.author {
            request = request.with_author(author.username);
        }
        if let Some(updated_at) = self.updated_at {
            request = request.with_updated_at(updated_at);
        }
        Ok(request)
    }
}
