//! End-to-end loads against a mock GitHub server

use ghfeed_core::{
    ActivityKind, Connection, Error as CoreError, FeedSession, GitHubConfig, SortOrder, TypeFilter,
};
use ghfeed_github::{GitHubClient, GitHubSource};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO: &str = "/repos/octo/hello";

fn endpoints(server: &MockServer) -> GitHubConfig {
    GitHubConfig {
        api_base: server.uri(),
        graphql_url: format!("{}/graphql", server.uri()),
        web_base: "https://github.com".to_string(),
    }
}

fn connection() -> Connection {
    Connection::new("octo", "hello", "ghp_test")
}

fn pulls() -> Value {
    json!([{
        "id": 4200,
        "number": 42,
        "title": "Add activity feed",
        "html_url": "https://github.com/octo/hello/pull/42",
        "created_at": "2024-03-01T00:00:00Z",
        "user": { "login": "octocat" }
    }])
}

fn commit(sha: &str, date: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/octo/hello/commit/{}", sha),
        "author": { "login": "octocat" },
        "commit": {
            "message": message,
            "author": { "name": "Octo Cat", "date": date },
            "committer": { "name": "GitHub", "date": date }
        }
    })
}

fn commits() -> Value {
    json!([
        commit("c2", "2024-03-03T00:00:00Z", "Render feed"),
        commit("abc123", "2024-03-02T12:00:00Z", "Bump version"),
        commit("c1", "2024-03-02T00:00:00Z", "Parse events\n\nDetails"),
    ])
}

fn events() -> Value {
    json!([
        {
            "id": "777",
            "type": "PullRequestEvent",
            "created_at": "2024-03-04T00:00:00Z",
            "actor": { "login": "maintainer" },
            "payload": {
                "action": "closed",
                "number": 42,
                "pull_request": {
                    "number": 42,
                    "title": "Add activity feed",
                    "merged": true,
                    "merge_commit_sha": "m3rg3",
                    "html_url": "https://github.com/octo/hello/pull/42",
                    "user": { "login": "octocat" }
                }
            }
        },
        {
            "id": "778",
            "type": "PushEvent",
            "created_at": "2024-03-04T01:00:00Z",
            "actor": { "login": "maintainer" },
            "payload": { "push_id": 1, "size": 1 }
        },
        {
            "id": "779",
            "type": "PullRequestEvent",
            "created_at": "2024-03-04T02:00:00Z",
            "payload": { "action": "closed", "number": 43, "pull_request": { "number": 43, "merged": false } }
        }
    ])
}

fn linked_pr() -> Value {
    json!([{ "number": 42, "html_url": "https://github.com/octo/hello/pull/42" }])
}

fn status_data() -> Value {
    json!({
        "data": {
            "repository": {
                "pr42": {
                    "number": 42,
                    "projectItems": { "nodes": [{
                        "project": { "title": "Roadmap" },
                        "fieldValueByName": {
                            "__typename": "ProjectV2ItemFieldSingleSelectValue",
                            "name": "Shipped"
                        }
                    }]}
                }
            }
        }
    })
}

async fn mount_rest(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{}/pulls", REPO)))
        .and(query_param("state", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/commits", REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/events", REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(events()))
        .mount(server)
        .await;

    for sha in ["c1", "c2"] {
        Mock::given(method("GET"))
            .and(path(format!("{}/commits/{}/pulls", REPO, sha)))
            .respond_with(ResponseTemplate::new(200).set_body_json(linked_pr()))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{}/commits/abc123/pulls", REPO)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_load_groups_pull_request_tree() {
    let server = MockServer::start().await;
    mount_rest(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_data()))
        .expect(1)
        .mount(&server)
        .await;

    let source = GitHubSource::new(endpoints(&server));
    let mut session = FeedSession::new(TypeFilter::All, SortOrder::Descending);
    let count = session.refresh(&source, &connection()).await.unwrap();

    // one group plus the unlinked commit
    assert_eq!(count, 2);

    let view = session.view();
    let group = view[0].as_group().expect("group sorts first");
    assert_eq!(group.number(), Some(42));
    assert_eq!(group.commits.len(), 2);
    assert_eq!(group.commits[0].id, "c2");
    assert_eq!(group.commits[1].title, "Parse events");

    let merge = group.merge_event.as_ref().unwrap();
    assert_eq!(merge.id, "777");
    assert_eq!(merge.author, "maintainer");
    assert_eq!(merge.url, "https://github.com/octo/hello/commit/m3rg3");
    assert_eq!(group.effective_timestamp, merge.timestamp);

    assert_eq!(group.root.kanban_status.as_deref(), Some("Roadmap: Shipped"));
    assert!(group
        .commits
        .iter()
        .all(|c| c.kanban_status.as_deref() == Some("Roadmap: Shipped")));

    let loose = view[1].as_single().unwrap();
    assert_eq!(loose.kind, ActivityKind::Commit);
    assert_eq!(loose.id, "abc123");
    assert!(loose.linked_pull_request.is_none());
    assert!(loose.kanban_status.is_none());

    session.set_filter(TypeFilter::Merge);
    assert_eq!(session.view().len(), 1);
}

#[tokio::test]
async fn test_status_query_failure_degrades() {
    let server = MockServer::start().await;
    mount_rest(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&connection(), &endpoints(&server)).unwrap();
    let activities = client.load_activity().await;

    // PR, three commits and one qualifying merge
    assert_eq!(activities.len(), 5);
    assert_eq!(
        activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Merge)
            .count(),
        1
    );
    assert!(activities.iter().all(|a| a.kanban_status.is_none()));
}

#[tokio::test]
async fn test_status_query_partial_errors_keep_data() {
    let server = MockServer::start().await;
    mount_rest(&server).await;

    let mut body = status_data();
    body["errors"] = json!([{ "message": "Resource not accessible by integration" }]);
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&connection(), &endpoints(&server)).unwrap();
    let activities = client.load_activity().await;

    let pr = activities
        .iter()
        .find(|a| a.kind == ActivityKind::PullRequest)
        .unwrap();
    assert_eq!(pr.kanban_status.as_deref(), Some("Roadmap: Shipped"));
}

#[tokio::test]
async fn test_primary_failure_yields_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/pulls", REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/commits", REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/events", REPO)))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_data()))
        .expect(0)
        .mount(&server)
        .await;

    let client = GitHubClient::new(&connection(), &endpoints(&server)).unwrap();
    assert!(client.load_activity().await.is_empty());
}

#[tokio::test]
async fn test_empty_repository_skips_status_query() {
    let server = MockServer::start().await;

    for tail in ["pulls", "commits", "events"] {
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", REPO, tail)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .expect(0)
        .mount(&server)
        .await;

    let client = GitHubClient::new(&connection(), &endpoints(&server)).unwrap();
    assert!(client.load_activity().await.is_empty());
}

#[tokio::test]
async fn test_missing_token_issues_no_requests() {
    let server = MockServer::start().await;
    mount_rest(&server).await;

    let source = GitHubSource::new(endpoints(&server));
    let mut session = FeedSession::default();
    let result = session
        .refresh(&source, &Connection::new("octo", "hello", ""))
        .await;

    assert!(matches!(result, Err(CoreError::MissingInput("token"))));
    assert!(session.entries().is_empty());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_commit_association_lookup() {
    let server = MockServer::start().await;
    mount_rest(&server).await;

    let client = GitHubClient::new(&connection(), &endpoints(&server)).unwrap();
    let raw = client.fetch_raw_activity().await.unwrap();

    assert_eq!(raw.associations.len(), 2);
    assert_eq!(raw.associations["c1"].number, Some(42));
    assert!(!raw.associations.contains_key("abc123"));

    let numbers: Vec<u64> = raw.referenced_pr_numbers().into_iter().collect();
    assert_eq!(numbers, vec![42]);
}
