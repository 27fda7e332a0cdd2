//! Settings for task provisioning.
//!
//! Settings come from an optional configuration file followed by environment
//! variables prefixed with `TASKWRIGHT__`, for example
//! `TASKWRIGHT__JIRA__BASE_URL` or `TASKWRIGHT__GITLAB__PROJECT_ID`.
//!
//! Each integration is enabled only when all of its fields are present and
//! non-blank; otherwise it is silently disabled and provisioning skips the
//! corresponding remote call.
//!
//! # Example
//!
//!     use config::FileFormat;
//!     use taskwright::config::Settings;
//!
//!     let settings = Settings::parse(
//!         r#"{ "jira": { "base_url": "https://acme.atlassian.net" } }"#,
//!         FileFormat::Json,
//!     )
//!     .expect("valid settings");
//!     assert!(settings.jira_client().expect("no client error").is_none());

use camino::Utf8Path;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::task::{
    adapters::http::{GitLabClient, GitLabConfig, JiraClient, JiraConfig},
    domain::{DEFAULT_ANCHOR, TaskTemplate},
    ports::{CodeReviewError, IssueTrackerError},
    services::ProvisioningService,
};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "TASKWRIGHT";

/// Errors raised while loading settings or building clients from them.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configuration sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    /// A configured base URL is not a valid absolute URL.
    #[error("invalid URL in {field}: {source}")]
    InvalidUrl {
        /// Settings field holding the URL.
        field: &'static str,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The issue tracker client could not be created.
    #[error("failed to initialise issue tracker client: {0}")]
    IssueTracker(#[from] IssueTrackerError),

    /// The code review client could not be created.
    #[error("failed to initialise code review client: {0}")]
    CodeReview(#[from] CodeReviewError),
}

/// Top-level provisioning settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Task template; the built-in checklist is used when absent.
    #[serde(default)]
    pub template: Option<String>,
    /// Document text after which new tasks are inserted.
    #[serde(default)]
    pub anchor: Option<String>,
    /// Per-request timeout for remote calls, in seconds. No timeout when
    /// absent.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Issue tracker (Jira) settings.
    #[serde(default)]
    pub jira: JiraSettings,
    /// Code review (GitLab) settings.
    #[serde(default)]
    pub gitlab: GitLabSettings,
}

/// Issue tracker connection fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraSettings {
    /// Instance URL, e.g. `https://acme.atlassian.net`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Account email used for basic authentication.
    #[serde(default)]
    pub email: Option<String>,
    /// API token paired with the email.
    #[serde(default)]
    pub api_token: Option<SecretString>,
}

/// Code review connection fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitLabSettings {
    /// Instance URL, e.g. `https://gitlab.com`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Personal or project access token.
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Numeric project id or `group/project` path.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl Settings {
    /// Loads settings from an optional file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the file is missing or any
    /// source cannot be deserialized.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(file) = path {
            builder = builder.add_source(File::from(file.as_std_path()).required(true));
        }
        Self::from_builder(builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__")))
    }

    /// Parses settings from in-memory text, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the text cannot be deserialized.
    pub fn parse(contents: &str, format: FileFormat) -> Result<Self, SettingsError> {
        Self::from_builder(Config::builder().add_source(File::from_str(contents, format)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Returns the configured template, or the built-in checklist.
    #[must_use]
    pub fn template(&self) -> TaskTemplate {
        non_blank(self.template.as_deref()).map_or_else(TaskTemplate::default, TaskTemplate::new)
    }

    /// Returns the insertion anchor, defaulting to the `# Tasks` heading.
    #[must_use]
    pub fn anchor(&self) -> &str {
        self.anchor
            .as_deref()
            .filter(|anchor| !anchor.is_empty())
            .unwrap_or(DEFAULT_ANCHOR)
    }

    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Builds the issue tracker client when all tracker fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] for a malformed base URL and
    /// [`SettingsError::IssueTracker`] when the client cannot be created.
    pub fn jira_client(&self) -> Result<Option<JiraClient>, SettingsError> {
        let (Some(base_url), Some(email), Some(api_token)) = (
            non_blank(self.jira.base_url.as_deref()),
            non_blank(self.jira.email.as_deref()),
            non_blank_secret(self.jira.api_token.as_ref()),
        ) else {
            return Ok(None);
        };

        let mut config = JiraConfig::new(
            parse_url("jira.base_url", base_url)?,
            email.to_owned(),
            api_token,
        );
        if let Some(timeout) = self.request_timeout() {
            config = config.with_timeout(timeout);
        }
        Ok(Some(JiraClient::new(config)?))
    }

    /// Builds the code review client when all review fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] for a malformed base URL and
    /// [`SettingsError::CodeReview`] when the client cannot be created.
    pub fn gitlab_client(&self) -> Result<Option<GitLabClient>, SettingsError> {
        let (Some(base_url), Some(token), Some(project_id)) = (
            non_blank(self.gitlab.base_url.as_deref()),
            non_blank_secret(self.gitlab.token.as_ref()),
            non_blank(self.gitlab.project_id.as_deref()),
        ) else {
            return Ok(None);
        };

        let mut config = GitLabConfig::new(
            parse_url("gitlab.base_url", base_url)?,
            token,
            project_id.to_owned(),
        );
        if let Some(timeout) = self.request_timeout() {
            config = config.with_timeout(timeout);
        }
        Ok(Some(GitLabClient::new(config)?))
    }

    /// Wires a provisioning service with every integration these settings
    /// enable.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when an enabled integration is misconfigured.
    pub fn provisioning_service(&self) -> Result<ProvisioningService, SettingsError> {
        let mut service = ProvisioningService::new(self.template());
        if let Some(base_url) = non_blank(self.jira.base_url.as_deref()) {
            service = service.with_browse_base(base_url);
        }
        if let Some(tracker) = self.jira_client()? {
            service = service.with_issue_tracker(Arc::new(tracker));
        }
        if let Some(review) = self.gitlab_client()? {
            service = service.with_code_review(Arc::new(review));
        }
        Ok(service)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn non_blank_secret(value: Option<&SecretString>) -> Option<SecretString> {
    value
        .map(|secret| secret.expose_secret().trim())
        .filter(|text| !text.is_empty())
        .map(SecretString::from)
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl { field, source })
}
