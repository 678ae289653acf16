use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ocm_core::constants::USER_AGENT;
use ocm_core::github::{
    ContentFetcher, ContentSource, EntryKind, FetchError, GitHubClient, Listing,
};

fn client(server: &MockServer, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(token.map(str::to_string))
        .unwrap()
        .with_api_base(format!("{}/repos", server.uri()))
}

#[tokio::test]
async fn not_found_listing_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/skill/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list("o", "r", "assets/skill/nope")
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "got {err:?}");
    assert!(err.to_string().contains("assets/skill/nope"));
}

#[tokio::test]
async fn exhausted_quota_is_rate_limited_with_reset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000"),
        )
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list("o", "r", "assets")
        .await
        .unwrap_err();

    let FetchError::RateLimited { reset } = &err else {
        panic!("expected rate limit, got {err:?}");
    };
    assert_eq!(reset.map(|r| r.timestamp()), Some(1_700_000_000));
}

#[tokio::test]
async fn forbidden_with_quota_left_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/private"))
        .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "42"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list("o", "r", "private")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Api { status: 403, .. }), "got {err:?}");
}

#[tokio::test]
async fn directory_body_decodes_to_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/skill/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "SKILL.md",
                "path": "assets/skill/demo/SKILL.md",
                "sha": "abc",
                "size": 12,
                "type": "file",
                "download_url": "https://raw.example.com/SKILL.md"
            },
            {
                "name": "scripts",
                "path": "assets/skill/demo/scripts",
                "type": "dir",
                "download_url": null
            }
        ])))
        .mount(&server)
        .await;

    let listing = client(&server, None)
        .list("o", "r", "assets/skill/demo")
        .await
        .unwrap();

    let Listing::Directory(entries) = listing else {
        panic!("expected directory listing");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "SKILL.md");
    assert_eq!(entries[0].kind, EntryKind::File);
    assert_eq!(
        entries[0].download_url.as_deref(),
        Some("https://raw.example.com/SKILL.md")
    );
    assert_eq!(entries[1].kind, EntryKind::Dir);
    assert_eq!(entries[1].download_url, None);
}

#[tokio::test]
async fn file_body_decodes_to_single_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/mcp/ctx.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ctx.json",
            "path": "assets/mcp/ctx.json",
            "type": "file",
            "encoding": "base64",
            "content": "e30=",
            "download_url": "https://raw.example.com/ctx.json"
        })))
        .mount(&server)
        .await;

    let listing = client(&server, None)
        .list("o", "r", "assets/mcp/ctx.json")
        .await
        .unwrap();

    let Listing::File(entry) = listing else {
        panic!("expected file listing");
    };
    assert_eq!(entry.path, "assets/mcp/ctx.json");
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/odd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server, None).list("o", "r", "odd").await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets"))
        .and(header("authorization", "Bearer tok"))
        .and(header("user-agent", USER_AGENT))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server, Some("tok"))
        .list("o", "r", "assets")
        .await
        .unwrap();

    assert_eq!(listing, Listing::Directory(vec![]));
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client(&server, None).list("o", "r", "assets").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn fetcher_mirrors_directory_over_http() {
    let server = MockServer::start().await;
    let raw = |name: &str| format!("{}/raw/{name}", server.uri());
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/skill/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "SKILL.md", "path": "assets/skill/demo/SKILL.md", "type": "file", "download_url": raw("SKILL.md")},
            {"name": "refs", "path": "assets/skill/demo/refs", "type": "dir", "download_url": null}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/skill/demo/refs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "guide.md", "path": "assets/skill/demo/refs/guide.md", "type": "file", "download_url": raw("guide.md")}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/SKILL.md"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"---\nname: demo\n---\n".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/guide.md"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"guide".to_vec()))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("demo");
    let fetcher = ContentFetcher::new(client(&server, None));
    fetcher
        .download("o", "r", "assets/skill/demo", &dest)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(dest.join("SKILL.md")).unwrap(),
        "---\nname: demo\n---\n"
    );
    assert_eq!(std::fs::read_to_string(dest.join("refs/guide.md")).unwrap(), "guide");
}

#[tokio::test]
async fn failed_raw_download_removes_partial_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/assets/agents/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "a.md", "path": "assets/agents/broken/a.md", "type": "file", "download_url": format!("{}/raw/a.md", server.uri())}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/a.md"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("broken");
    let err = ContentFetcher::new(client(&server, None))
        .download("o", "r", "assets/agents/broken", &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Api { status: 500, .. }), "got {err:?}");
    assert!(!dest.exists());
}
