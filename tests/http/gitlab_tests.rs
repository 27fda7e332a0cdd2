//! GitLab adapter tests.

use secrecy::SecretString;
use serde_json::{Value, json};
use taskwright::task::{
    adapters::http::{GitLabClient, GitLabConfig},
    domain::{BranchSlug, IssueKey, ReviewState},
    ports::{CodeReview, CodeReviewError},
};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_PATH: &str = "/api/v4/projects/team%2Fapp";

fn client_for(server: &MockServer) -> GitLabClient {
    let config = GitLabConfig::new(
        Url::parse(&server.uri()).expect("mock server URL"),
        SecretString::from("glpat-secret"),
        "team/app".to_owned(),
    );
    GitLabClient::new(config).expect("client builds")
}

fn branch() -> BranchSlug {
    BranchSlug::derive(Some(&IssueKey::new("PROJ-7").expect("valid key")), "Fix login")
}

fn merge_request(iid: u64, state: &str, updated_at: &str) -> Value {
    json!({
        "id": 1000 + iid,
        "iid": iid,
        "title": format!("Draft: change {iid}"),
        "state": state,
        "web_url": format!("https://gitlab.example.com/team/app/-/merge_requests/{iid}"),
        "source_branch": "branches/proj-7-fix-login",
        "target_branch": "main",
        "updated_at": updated_at,
        "author": { "username": "dev" }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_filters_by_source_branch_with_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests")))
        .and(query_param("source_branch", "branches/proj-7-fix-login"))
        .and(header("PRIVATE-TOKEN", "glpat-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            merge_request(3, "merged", "2024-05-02T10:00:00Z"),
            merge_request(5, "opened", "2024-05-01T10:00:00Z")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let found = client_for(&server)
        .find_by_source_branch(&branch())
        .await
        .expect("lookup succeeds")
        .expect("one request selected");

    assert_eq!(found.iid(), 5);
    assert_eq!(found.state(), ReviewState::Open);
    assert_eq!(found.author(), "dev");
    assert_eq!(found.target_branch(), "main");
    assert_eq!(
        found.url(),
        "https://gitlab.example.com/team/app/-/merge_requests/5"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_result_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let found = client_for(&server)
        .find_by_source_branch(&branch())
        .await
        .expect("lookup succeeds");

    assert_eq!(found, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "403 Forbidden" })))
        .mount(&server)
        .await;

    let result = client_for(&server).find_by_source_branch(&branch()).await;

    assert!(matches!(result, Err(CodeReviewError::Auth { status: 403, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_by_iid_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/42")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "404 Not found" })))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_review_request(42).await;

    assert!(matches!(result, Err(CodeReviewError::NotFound(42))));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_by_iid_returns_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/9")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(merge_request(9, "closed", "2024-05-03T08:30:00Z")),
        )
        .mount(&server)
        .await;

    let request = client_for(&server)
        .fetch_review_request(9)
        .await
        .expect("request fetched");

    assert_eq!(request.state(), ReviewState::Closed);
    assert_eq!(request.title(), "Draft: change 9");
    assert!(request.updated_at().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_state_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/9")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(merge_request(9, "archived", "2024-05-03T08:30:00Z")),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_review_request(9).await;

    assert!(matches!(result, Err(CodeReviewError::Parse(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_skips_requests_with_unknown_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests")))
        .and(query_param("source_branch", "branches/proj-7-fix-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            merge_request(8, "archived", "2024-05-04T10:00:00Z"),
            merge_request(5, "opened", "2024-05-01T10:00:00Z")
        ])))
        .mount(&server)
        .await;

    let found = client_for(&server)
        .find_by_source_branch(&branch())
        .await
        .expect("lookup succeeds")
        .expect("open request still selected");

    assert_eq!(found.iid(), 5);
    assert_eq!(found.state(), ReviewState::Open);
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_probe_targets_project() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROJECT_PATH))
        .and(header("PRIVATE-TOKEN", "glpat-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).test_connection().await);
}
