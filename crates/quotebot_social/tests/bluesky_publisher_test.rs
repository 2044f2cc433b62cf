//! Tests for the Bluesky publisher against a mock PDS.

use quotebot_error::SocialErrorKind;
use quotebot_social::{BLUESKY_MAX_CHARS, BlueskyCredentials, BlueskyPublisher, Publisher};
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DID: &str = "did:plc:kramer123";

fn credentials(password: &str) -> BlueskyCredentials {
    BlueskyCredentials {
        handle: "kramer.bsky.social".to_string(),
        app_password: SecretString::from(password),
    }
}

fn session_body(jwt: &str) -> serde_json::Value {
    json!({
        "accessJwt": jwt,
        "refreshJwt": "refresh",
        "handle": "kramer.bsky.social",
        "did": DID
    })
}

async fn mount_session(server: &MockServer, jwt: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .and(body_partial_json(json!({
            "identifier": "kramer.bsky.social",
            "password": "app-pass"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(jwt)))
        .expect(times)
        .mount(server)
        .await;
}

async fn login(server: &MockServer) -> BlueskyPublisher {
    BlueskyPublisher::login(credentials("app-pass"), server.uri(), Duration::from_secs(5))
        .await
        .expect("Login succeeds")
}

#[tokio::test]
async fn test_login_then_post_creates_record() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .and(header("authorization", "Bearer jwt-1"))
        .and(body_partial_json(json!({
            "repo": DID,
            "collection": "app.bsky.feed.post",
            "record": {
                "$type": "app.bsky.feed.post",
                "text": "Giddy up! #kramer"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "at://did:plc:kramer123/app.bsky.feed.post/3k",
            "cid": "bafy"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    let result = publisher.post("Giddy up! #kramer").await;

    assert!(result.succeeded(), "unexpected failure: {:?}", result.error());
    assert_eq!(result.platform(), "bluesky");
    assert_eq!(
        result.post_id().as_ref().map(|id| id.0.as_str()),
        Some("at://did:plc:kramer123/app.bsky.feed.post/3k")
    );
}

#[tokio::test]
async fn test_record_carries_tag_facet() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .and(body_partial_json(json!({
            "record": {
                "facets": [{
                    "index": {"byteStart": 10, "byteEnd": 17},
                    "features": [{"$type": "app.bsky.richtext.facet#tag", "tag": "kramer"}]
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uri": "at://x", "cid": "c"})))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    assert!(publisher.post("Giddy up! #kramer").await.succeeded());
}

#[tokio::test]
async fn test_long_text_truncated_to_limit() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 1).await;
    let expected = "a".repeat(BLUESKY_MAX_CHARS);
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .and(body_partial_json(json!({"record": {"text": expected}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uri": "at://x", "cid": "c"})))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    assert!(publisher.post(&"a".repeat(BLUESKY_MAX_CHARS + 50)).await.succeeded());
}

#[tokio::test]
async fn test_rejected_login_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .mount(&server)
        .await;

    let err = BlueskyPublisher::login(credentials("wrong"), server.uri(), Duration::from_secs(5))
        .await
        .expect_err("Login must fail");

    assert!(matches!(err.kind, SocialErrorKind::InvalidCredentials(_)));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_empty_password_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = BlueskyPublisher::login(credentials(""), server.uri(), Duration::from_secs(5))
        .await
        .expect_err("Login must fail");

    assert!(matches!(err.kind, SocialErrorKind::MissingCredentials(_)));
}

#[tokio::test]
async fn test_expired_token_triggers_single_relogin() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 2).await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "ExpiredToken",
            "message": "Token has expired"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uri": "at://retry", "cid": "c"})))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    let post_id = publisher.try_post("Serenity now!").await.expect("Retry succeeds");

    assert_eq!(post_id.0, "at://retry");
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({"error": "RateLimitExceeded"})),
        )
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    let result = publisher.post("Hello, Newman.").await;

    assert!(!result.succeeded());
    assert_eq!(
        result.error().as_ref(),
        Some(&SocialErrorKind::RateLimited { retry_after: Some(30) })
    );
}

#[tokio::test]
async fn test_server_error_is_recoverable_api_error() {
    let server = MockServer::start().await;
    mount_session(&server, "jwt-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let publisher = login(&server).await;
    let err = publisher.try_post("Hello, Newman.").await.expect_err("Post must fail");

    assert!(matches!(err.kind, SocialErrorKind::Api { status: 502, .. }));
    assert!(err.is_recoverable());
}
