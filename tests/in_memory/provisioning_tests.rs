//! End-to-end provisioning against in-memory integrations.

use super::helpers::{Harness, TRACKER_BASE, harness, remote_issue, review_request};
use rstest::rstest;
use taskwright::task::{
    domain::{ProvisionRequest, ReviewState, TaskDomainError},
    ports::{CodeReviewError, IssueTracker, IssueTrackerError},
    services::ProvisioningError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn url_input_resolves_canonical_key_and_links_open_review(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("PROJ-123", "[BUG] Fix login bug on mobile"))
        .expect("seed issue");
    let branch = "branches/proj-123-fix-login-bug";
    harness
        .review
        .insert(review_request(4, branch).with_state(ReviewState::Merged))
        .expect("seed merged review");
    harness
        .review
        .insert(review_request(7, branch))
        .expect("seed open review");

    let provisioned = harness
        .service
        .provision(&ProvisionRequest::for_issue(format!(
            "{TRACKER_BASE}/browse/proj-123/"
        )))
        .await
        .expect("provisioning should succeed");

    assert_eq!(
        provisioned.text(),
        format!(
            "Fix login bug|PROJ-123|{TRACKER_BASE}/browse/PROJ-123|{branch}|\
             https://gitlab.com/acme/app/-/merge_requests/7"
        )
    );
    assert_eq!(harness.tracker.call_count(), 1);
    assert_eq!(harness.review.call_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_issue_aborts_before_review_lookup(harness: Harness) {
    let result = harness
        .service
        .provision(&ProvisionRequest::new("Some work", "NOPE-1"))
        .await;

    assert!(matches!(
        result,
        Err(ProvisioningError::IssueTracker(IssueTrackerError::NotFound(ref key))) if key == "NOPE-1"
    ));
    assert_eq!(harness.review.call_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_request_makes_no_calls(harness: Harness) {
    let result = harness.service.provision(&ProvisionRequest::default()).await;

    assert!(matches!(
        result,
        Err(ProvisioningError::Validation(TaskDomainError::MissingIdentity))
    ));
    assert_eq!(harness.tracker.call_count(), 0);
    assert_eq!(harness.review.call_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_matching_review_leaves_link_empty(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("OPS-2", "Renew certificates"))
        .expect("seed issue");
    harness
        .review
        .insert(review_request(1, "branches/ops-2-something-else"))
        .expect("seed unrelated review");

    let provisioned = harness
        .service
        .provision(&ProvisionRequest::for_issue("OPS-2"))
        .await
        .expect("provisioning should succeed");

    assert!(provisioned.text().ends_with("|branches/ops-2-renew-certificates|"));
    assert!(provisioned.review_request().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_outage_does_not_fail_provisioning(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("OPS-3", "Patch kernel"))
        .expect("seed issue");
    harness
        .review
        .fail_with(CodeReviewError::transport(std::io::Error::other("timeout")))
        .expect("configure failure");

    let provisioned = harness
        .service
        .provision(&ProvisionRequest::for_issue("OPS-3"))
        .await
        .expect("review outages are tolerated");

    assert!(provisioned.text().ends_with('|'));
    assert_eq!(harness.review.call_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_attempts_share_one_service(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("A-1", "First task"))
        .expect("seed issue");
    harness
        .tracker
        .insert(remote_issue("B-2", "Second task"))
        .expect("seed issue");

    let first_request = ProvisionRequest::for_issue("A-1");
    let second_request = ProvisionRequest::for_issue("B-2");
    let (first, second) = tokio::join!(
        harness.service.provision(&first_request),
        harness.service.provision(&second_request),
    );

    assert_eq!(
        first.expect("first attempt").branch().as_str(),
        "branches/a-1-first-task"
    );
    assert_eq!(
        second.expect("second attempt").branch().as_str(),
        "branches/b-2-second-task"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tracker_search_and_probe_use_the_same_store(harness: Harness) {
    harness
        .tracker
        .insert(remote_issue("S-1", "Search index rebuild"))
        .expect("seed issue");
    harness
        .tracker
        .insert(remote_issue("S-2", "Unrelated"))
        .expect("seed issue");

    let found = harness
        .tracker
        .search_issues("index")
        .await
        .expect("search succeeds");

    assert_eq!(found.len(), 1);
    assert!(harness.tracker.test_connection().await);
}
