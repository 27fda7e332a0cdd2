//! Given steps for task provisioning BDD scenarios.

use super::world::{INITIAL_DOCUMENT, ProvisioningWorld};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskwright::task::{
    adapters::memory::InMemoryDocument,
    domain::{IssueKey, RemoteIssue, ReviewRequest, TaskTemplate},
    ports::CodeReviewError,
};

#[given(r#"the issue tracker knows issue "{key}" titled "{title}""#)]
fn tracker_knows_issue(
    world: &mut ProvisioningWorld,
    key: String,
    title: String,
) -> Result<(), eyre::Report> {
    let issue_key = IssueKey::new(key).wrap_err("construct issue key")?;
    world
        .tracker
        .insert(RemoteIssue::new(issue_key, title, "To Do"))
        .wrap_err("seed issue")?;
    Ok(())
}

#[given("the issue tracker has no issues")]
fn tracker_is_empty(world: &mut ProvisioningWorld) {
    world.tracker_enabled = true;
}

#[given("the issue tracker integration is disabled")]
fn tracker_disabled(world: &mut ProvisioningWorld) {
    world.tracker_enabled = false;
}

#[given(r#"an open review request !{iid:u64} exists for branch "{branch}""#)]
fn open_review_request(
    world: &mut ProvisioningWorld,
    iid: u64,
    branch: String,
) -> Result<(), eyre::Report> {
    let url = format!("https://gitlab.com/acme/app/-/merge_requests/{iid}");
    world
        .review
        .insert(ReviewRequest::new(iid + 1000, iid, url, branch))
        .wrap_err("seed review request")?;
    Ok(())
}

#[given("the code review service is unavailable")]
fn review_unavailable(world: &mut ProvisioningWorld) -> Result<(), eyre::Report> {
    world
        .review
        .fail_with(CodeReviewError::transport(std::io::Error::other(
            "connection refused",
        )))
        .wrap_err("configure review failure")?;
    Ok(())
}

#[given(r#"the template "{source}""#)]
fn template(world: &mut ProvisioningWorld, source: String) {
    world.template = TaskTemplate::new(source);
}

#[given("a task document with a tasks heading")]
fn task_document(world: &mut ProvisioningWorld) {
    world.document = InMemoryDocument::new(INITIAL_DOCUMENT);
}
