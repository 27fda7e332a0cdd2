//! Then steps for task provisioning BDD scenarios.

use super::world::{INITIAL_DOCUMENT, ProvisioningWorld};
use rstest_bdd_macros::then;
use taskwright::task::{
    domain::{DEFAULT_ANCHOR, TaskDomainError},
    ports::IssueTrackerError,
    services::ProvisioningError,
};

#[then(r#"the provisioned text is "{expected}""#)]
fn provisioned_text_is(world: &ProvisioningWorld, expected: String) -> Result<(), eyre::Report> {
    let provisioned = world
        .result()?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected provisioning failure: {err}"))?;
    eyre::ensure!(
        provisioned.text() == expected,
        "expected {expected:?}, found {:?}",
        provisioned.text()
    );
    Ok(())
}

#[then("provisioning fails with a missing identity error")]
fn fails_with_missing_identity(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    match world.result()? {
        Err(ProvisioningError::Validation(TaskDomainError::MissingIdentity)) => Ok(()),
        other => Err(eyre::eyre!("expected missing identity, found {other:?}")),
    }
}

#[then(r#"provisioning fails because issue "{key}" was not found"#)]
fn fails_with_not_found(world: &ProvisioningWorld, key: String) -> Result<(), eyre::Report> {
    match world.result()? {
        Err(ProvisioningError::IssueTracker(IssueTrackerError::NotFound(missing)))
            if *missing == key =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!("expected issue {key} not found, found {other:?}")),
    }
}

#[then("the document is unchanged")]
fn document_unchanged(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let contents = world
        .document
        .contents()
        .map_err(|err| eyre::eyre!("read document: {err}"))?;
    eyre::ensure!(contents == INITIAL_DOCUMENT, "document was modified: {contents:?}");
    eyre::ensure!(
        world.document.write_count() == 0,
        "document was written {} times",
        world.document.write_count()
    );
    Ok(())
}

#[then("no remote calls were made")]
fn no_remote_calls(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.tracker.call_count() == 0,
        "tracker was called {} times",
        world.tracker.call_count()
    );
    ensure_no_review_calls(world)
}

#[then("no review lookup was made")]
fn no_review_lookup(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    ensure_no_review_calls(world)
}

fn ensure_no_review_calls(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.review.call_count() == 0,
        "review service was called {} times",
        world.review.call_count()
    );
    Ok(())
}

#[then(r#"the first task in the document is "{line}""#)]
fn first_task_is(world: &ProvisioningWorld, line: String) -> Result<(), eyre::Report> {
    let contents = world
        .document
        .contents()
        .map_err(|err| eyre::eyre!("read document: {err}"))?;
    let after_anchor = contents
        .strip_prefix(DEFAULT_ANCHOR)
        .ok_or_else(|| eyre::eyre!("document no longer starts with the tasks heading"))?;
    let first = after_anchor.lines().next().unwrap_or_default();
    eyre::ensure!(first == line, "expected first task {line:?}, found {first:?}");
    Ok(())
}
