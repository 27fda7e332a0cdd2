//! Response classification shared by the HTTP adapters.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest remote message carried into an error.
const MAX_MESSAGE_CHARS: usize = 300;

/// Failure of a single JSON request, before mapping into a port error.
#[derive(Debug)]
pub(super) enum HttpFailure {
    /// 401 or 403.
    Unauthorized { status: u16, message: String },
    /// 404.
    NotFound { message: String },
    /// Any other non-success status.
    Status { status: u16, message: String },
    /// The exchange did not complete.
    Transport(reqwest::Error),
    /// The body was not the expected JSON.
    Parse(serde_json::Error),
}

/// Builds a client, applying the request timeout when one is configured.
pub(super) fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let builder = Client::builder();
    let builder = match timeout {
        Some(duration) => builder.timeout(duration),
        None => builder,
    };
    builder.build()
}

/// Sends the request once and decodes a successful body as `T`.
pub(super) async fn send_json<T>(request: RequestBuilder) -> Result<T, HttpFailure>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(HttpFailure::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(HttpFailure::Transport)?;

    if !status.is_success() {
        return Err(classify(status, &body));
    }
    serde_json::from_str(&body).map_err(HttpFailure::Parse)
}

/// Sends a connection probe; only `200 OK` counts as reachable.
pub(super) async fn probe(request: RequestBuilder, service: &'static str) -> bool {
    match request.send().await {
        Ok(response) => {
            let status = response.status();
            if status != StatusCode::OK {
                debug!(service, status = status.as_u16(), "connection test rejected");
            }
            status == StatusCode::OK
        }
        Err(error) => {
            warn!(service, %error, "connection test failed");
            false
        }
    }
}

fn classify(status: StatusCode, body: &str) -> HttpFailure {
    let message = remote_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HttpFailure::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => HttpFailure::NotFound { message },
        _ => HttpFailure::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extracts the human-readable message from an error body.
///
/// Understands Jira (`errorMessages`) and GitLab (`message`, `error`) error
/// documents and falls back to the raw body.
fn remote_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let jira = value
            .get("errorMessages")
            .and_then(Value::as_array)
            .and_then(|messages| messages.first())
            .and_then(Value::as_str)
            .map(str::to_owned);
        jira.or_else(|| {
            ["message", "error"]
                .into_iter()
                .find_map(|field| value.get(field))
                .map(|message| match message {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
        })
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_owned());
    message.chars().take(MAX_MESSAGE_CHARS).collect()
}
