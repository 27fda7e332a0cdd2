//! Document insertion through the provisioning service.

use super::helpers::{Harness, harness, remote_issue};
use rstest::rstest;
use taskwright::task::{
    adapters::memory::InMemoryDocument,
    domain::{DEFAULT_ANCHOR, ProvisionRequest, TaskDomainError},
    services::ProvisioningError,
};

const DOCUMENT: &str = "# Board\n\n# Tasks\n\n- [ ] existing\n";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newest_task_is_inserted_after_anchor(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("DOC-4", "Write onboarding guide"))
        .expect("seed issue");
    let document = InMemoryDocument::new(DOCUMENT);

    let provisioned = harness
        .service
        .provision_into_document(&ProvisionRequest::for_issue("DOC-4"), &document, DEFAULT_ANCHOR)
        .await
        .expect("provisioning should succeed");

    let expected = format!(
        "# Board\n\n# Tasks\n\n{}\n- [ ] existing\n",
        provisioned.text()
    );
    assert_eq!(document.contents().expect("readable"), expected);
    assert_eq!(document.write_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_lookup_leaves_document_untouched(harness: Harness) {
    let document = InMemoryDocument::new(DOCUMENT);

    let result = harness
        .service
        .provision_into_document(&ProvisionRequest::for_issue("GONE-9"), &document, DEFAULT_ANCHOR)
        .await;

    assert!(matches!(result, Err(ProvisioningError::IssueTracker(_))));
    assert_eq!(document.contents().expect("readable"), DOCUMENT);
    assert_eq!(document.write_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_anchor_is_reported_without_writing(harness: Harness) {
    let document = InMemoryDocument::new("# Notes only\n");

    let result = harness
        .service
        .provision_into_document(&ProvisionRequest::named("Loose task"), &document, DEFAULT_ANCHOR)
        .await;

    assert!(matches!(
        result,
        Err(ProvisioningError::Validation(TaskDomainError::AnchorNotFound(_)))
    ));
    assert_eq!(document.write_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_anchor_is_honoured(harness: Harness) {
    let document = InMemoryDocument::new("## Inbox\n- [ ] old\n");

    harness
        .service
        .provision_into_document(&ProvisionRequest::named("Triage"), &document, "## Inbox\n")
        .await
        .expect("provisioning should succeed");

    assert_eq!(
        document.contents().expect("readable"),
        "## Inbox\nTriage||||\n- [ ] old\n"
    );
}
