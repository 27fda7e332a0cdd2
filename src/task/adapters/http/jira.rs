//! Jira REST v2 adapter for the issue-tracker port.

use super::response::{HttpFailure, build_client, probe, send_json};
use crate::task::domain::{IssueKey, RemoteIssue, TaskDomainError, issue_browse_url};
use crate::task::ports::{IssueTracker, IssueTrackerError, IssueTrackerResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Page size requested from the search endpoint.
const SEARCH_MAX_RESULTS: u32 = 50;

/// Connection settings for a Jira instance.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    base_url: Url,
    email: String,
    api_token: SecretString,
    timeout: Option<Duration>,
}

impl JiraConfig {
    /// Creates settings for basic authentication with `email:api_token`.
    #[must_use]
    pub const fn new(base_url: Url, email: String, api_token: SecretString) -> Self {
        Self {
            base_url,
            email,
            api_token,
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the instance base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// HTTP client for the Jira REST v2 API.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base: String,
    email: String,
    api_token: SecretString,
}

impl JiraClient {
    /// Creates a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::Transport`] when the HTTP client cannot
    /// be initialised.
    pub fn new(config: JiraConfig) -> IssueTrackerResult<Self> {
        let http = build_client(config.timeout).map_err(IssueTrackerError::transport)?;
        Ok(Self {
            http,
            base: config.base_url.as_str().trim_end_matches('/').to_owned(),
            email: config.email,
            api_token: config.api_token,
        })
    }

    /// Returns the browse URL for an issue on this instance.
    #[must_use]
    pub fn browse_url(&self, key: &IssueKey) -> String {
        issue_browse_url(&self.base, key)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.email, Some(self.api_token.expose_secret()))
            .header(ACCEPT, "application/json")
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.get(format!("{}{path}", self.base)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.post(format!("{}{path}", self.base)))
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn fetch_issue(&self, key: &IssueKey) -> IssueTrackerResult<RemoteIssue> {
        debug!(issue_key = %key, "fetching issue");
        let payload: IssuePayload = send_json(self.get(&format!("/rest/api/2/issue/{key}")))
            .await
            .map_err(|failure| tracker_error(failure, Some(key)))?;
        payload.into_remote_issue().map_err(IssueTrackerError::parse)
    }

    async fn search_issues(&self, query: &str) -> IssueTrackerResult<Vec<RemoteIssue>> {
        debug!(jql = query, "searching issues");
        let body = SearchRequest {
            jql: query,
            max_results: SEARCH_MAX_RESULTS,
        };
        let payload: SearchPayload = send_json(self.post("/rest/api/2/search").json(&body))
            .await
            .map_err(|failure| tracker_error(failure, None))?;
        payload
            .issues
            .into_iter()
            .map(IssuePayload::into_remote_issue)
            .collect::<Result<Vec<_>, TaskDomainError>>()
            .map_err(IssueTrackerError::parse)
    }

    async fn test_connection(&self) -> bool {
        probe(self.get("/rest/api/2/myself"), "jira").await
    }
}

fn tracker_error(failure: HttpFailure, key: Option<&IssueKey>) -> IssueTrackerError {
    match failure {
        HttpFailure::NotFound { message } => match key {
            Some(missing) => IssueTrackerError::NotFound(missing.to_string()),
            None => IssueTrackerError::Status {
                status: 404,
                message,
            },
        },
        HttpFailure::Unauthorized { status, message } => {
            IssueTrackerError::Auth { status, message }
        }
        HttpFailure::Status { status, message } => IssueTrackerError::Status { status, message },
        HttpFailure::Transport(err) => IssueTrackerError::transport(err),
        HttpFailure::Parse(err) => IssueTrackerError::parse(err),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    jql: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    issues: Vec<IssuePayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
    #[serde(default)]
    status: Option<StatusField>,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    name: String,
}

impl IssuePayload {
    fn into_remote_issue(self) -> Result<RemoteIssue, TaskDomainError> {
        let key = IssueKey::new(self.key)?;
        let status = self.fields.status.map(|status| status.name).unwrap_or_default();
        Ok(RemoteIssue::new(key, self.fields.summary, status))
    }
}
