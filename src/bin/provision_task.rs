//! Provisions templated task entries from the command line.
//!
//! Usage:
//!
//! ```text
//! provision_task add <document> [task-name] [issue-key-or-url]
//! provision_task preview [task-name] [issue-key-or-url]
//! provision_task check
//! provision_task search <jql>
//! ```
//!
//! Settings are read from the file named by `TASKWRIGHT_CONFIG` (optional)
//! and from `TASKWRIGHT__*` environment variables. Log verbosity follows
//! `RUST_LOG` and defaults to `warn`; failures are logged to stderr and the
//! process exits with a non-zero status.

use camino::Utf8PathBuf;
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use taskwright::config::Settings;
use taskwright::task::{
    adapters::fs::FsDocument,
    domain::ProvisionRequest,
    ports::{CodeReview, IssueTracker},
};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the optional settings file.
const CONFIG_PATH_ENV: &str = "TASKWRIGHT_CONFIG";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add {
        document: Utf8PathBuf,
        request: ProvisionRequest,
    },
    Preview(ProvisionRequest),
    Check,
    Search(String),
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let _program = args.next();
        let name = args
            .next()
            .ok_or_else(|| CliError::InvalidArgs("missing command".into()))?;
        let rest: Vec<String> = args.collect();

        let command = match name.as_str() {
            "add" => {
                let (document, identity) = rest
                    .split_first()
                    .ok_or_else(|| CliError::InvalidArgs("missing document path".into()))?;
                Self::Add {
                    document: Utf8PathBuf::from(document),
                    request: request_from(identity)?,
                }
            }
            "preview" => Self::Preview(request_from(&rest)?),
            "check" if rest.is_empty() => Self::Check,
            "search" => match rest.as_slice() {
                [jql] => Self::Search(jql.clone()),
                _ => return Err(CliError::InvalidArgs("search expects one JQL argument".into())),
            },
            "check" => return Err(CliError::InvalidArgs("check takes no arguments".into())),
            other => {
                return Err(CliError::InvalidArgs(format!(
                    "unknown command '{other}'; expected add, preview, check, or search"
                )));
            }
        };
        Ok(command)
    }
}

fn request_from(args: &[String]) -> Result<ProvisionRequest, CliError> {
    match args {
        [] => Ok(ProvisionRequest::default()),
        [task_name] => Ok(ProvisionRequest::named(task_name.as_str())),
        [task_name, issue] => Ok(ProvisionRequest::new(task_name.as_str(), issue.as_str())),
        [_, _, extra, ..] => Err(CliError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        ))),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "provision_task failed");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), BoxError> {
    let command = Command::parse(env::args())?;
    let config_path = env::var_os(CONFIG_PATH_ENV)
        .map(|raw| {
            raw.into_string()
                .map(Utf8PathBuf::from)
                .map_err(|_| CliError::InvalidArgs(format!("{CONFIG_PATH_ENV} is not valid UTF-8")))
        })
        .transpose()?;
    let settings = Settings::load(config_path.as_deref())?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    runtime.block_on(run(command, &settings))
}

async fn run(command: Command, settings: &Settings) -> Result<(), BoxError> {
    let mut out = io::stdout().lock();
    match command {
        Command::Add { document, request } => {
            let service = settings.provisioning_service()?;
            let file = FsDocument::open(&document)?;
            let provisioned = service
                .provision_into_document(&request, &file, settings.anchor())
                .await?;
            writeln!(
                out,
                "added '{}' to {}",
                provisioned.identity().task_name(),
                file.path()
            )?;
        }
        Command::Preview(request) => {
            let service = settings.provisioning_service()?;
            let provisioned = service.provision(&request).await?;
            write!(out, "{}", provisioned.text())?;
        }
        Command::Check => {
            let jira = match settings.jira_client()? {
                Some(client) => status_label(client.test_connection().await),
                None => "not configured",
            };
            let gitlab = match settings.gitlab_client()? {
                Some(client) => status_label(client.test_connection().await),
                None => "not configured",
            };
            writeln!(out, "jira: {jira}")?;
            writeln!(out, "gitlab: {gitlab}")?;
        }
        Command::Search(jql) => {
            let client = settings.jira_client()?.ok_or_else(|| {
                CliError::InvalidArgs("search requires the Jira integration to be configured".into())
            })?;
            for issue in client.search_issues(&jql).await? {
                writeln!(out, "{}\t{}\t{}", issue.key(), issue.status(), issue.title())?;
            }
        }
    }
    Ok(())
}

const fn status_label(connected: bool) -> &'static str {
    if connected { "ok" } else { "failed" }
}
