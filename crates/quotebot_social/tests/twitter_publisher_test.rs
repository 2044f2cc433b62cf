//! Tests for the X publisher against a mock API.

use quotebot_error::SocialErrorKind;
use quotebot_social::{
    OAuth1Credentials, Publisher, TWITTER_MAX_CHARS, TwitterAuth, TwitterCredentials,
    TwitterPublisher,
};
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bearer_publisher(server: &MockServer) -> TwitterPublisher {
    TwitterPublisher::new(
        TwitterAuth::Bearer(SecretString::from("bearer-token")),
        server.uri(),
        Duration::from_secs(5),
    )
    .expect("Publisher builds")
}

fn created(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({"data": {"id": id, "text": "ignored"}}))
}

#[tokio::test]
async fn test_bearer_post_returns_tweet_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header("authorization", "Bearer bearer-token"))
        .and(body_json(json!({"text": "These pretzels are making me thirsty."})))
        .respond_with(created("1789"))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = bearer_publisher(&server);
    let result = publisher.post("These pretzels are making me thirsty.").await;

    assert!(result.succeeded(), "unexpected failure: {:?}", result.error());
    assert_eq!(result.platform(), "twitter");
    assert_eq!(result.post_id().as_ref().map(|id| id.0.as_str()), Some("1789"));
}

#[tokio::test]
async fn test_oauth1_request_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header_regex("authorization", r#"^OAuth .*oauth_signature="[^"]+""#))
        .and(header_regex("authorization", r#"oauth_consumer_key="ck""#))
        .respond_with(created("42"))
        .expect(1)
        .mount(&server)
        .await;

    let auth = TwitterAuth::OAuth1(OAuth1Credentials {
        consumer_key: SecretString::from("ck"),
        consumer_secret: SecretString::from("cs"),
        access_token: SecretString::from("at"),
        access_secret: SecretString::from("as"),
    });
    let publisher = TwitterPublisher::new(auth, server.uri(), Duration::from_secs(5)).expect("Publisher builds");

    assert_eq!(publisher.try_post("Giddy up!").await.expect("Post succeeds").0, "42");
}

#[tokio::test]
async fn test_long_text_truncated_to_limit() {
    let server = MockServer::start().await;
    let expected = "é".repeat(TWITTER_MAX_CHARS);
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_json(json!({"text": expected})))
        .respond_with(created("7"))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = bearer_publisher(&server);
    assert!(publisher.post(&"é".repeat(TWITTER_MAX_CHARS + 20)).await.succeeded());
}

#[tokio::test]
async fn test_unauthorized_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "Unauthorized",
            "status": 401,
            "detail": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let result = bearer_publisher(&server).post("Hello").await;

    assert!(!result.succeeded());
    assert!(matches!(result.error(), Some(SocialErrorKind::InvalidCredentials(_))));
}

#[tokio::test]
async fn test_forbidden_is_permission_denied_with_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Forbidden",
            "status": 403,
            "detail": "You are not permitted to perform this action."
        })))
        .mount(&server)
        .await;

    let err = bearer_publisher(&server)
        .try_post("Hello")
        .await
        .expect_err("Post must fail");

    assert_eq!(
        err.kind,
        SocialErrorKind::PermissionDenied("You are not permitted to perform this action.".to_string())
    );
}

#[tokio::test]
async fn test_rate_limit_reads_reset_header() {
    let server = MockServer::start().await;
    let reset = chrono::Utc::now().timestamp() + 60;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-reset", reset.to_string().as_str())
                .set_body_json(json!({"title": "Too Many Requests", "status": 429})),
        )
        .mount(&server)
        .await;

    let err = bearer_publisher(&server)
        .try_post("Hello")
        .await
        .expect_err("Post must fail");

    match err.kind {
        SocialErrorKind::RateLimited {
            retry_after: Some(secs),
        } => assert!((55..=60).contains(&secs), "retry_after was {secs}"),
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(201).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = bearer_publisher(&server)
        .try_post("Hello")
        .await
        .expect_err("Post must fail");

    assert!(matches!(err.kind, SocialErrorKind::Parse(_)));
}

#[test]
fn test_missing_credentials_rejected() {
    let err = TwitterPublisher::from_credentials(
        TwitterCredentials::default(),
        "http://127.0.0.1:9",
        Duration::from_secs(1),
    )
    .expect_err("Construction must fail");

    assert!(matches!(err.kind, SocialErrorKind::MissingCredentials(_)));
}

#[test]
fn test_bearer_only_credentials_accepted() {
    let creds = TwitterCredentials {
        bearer_token: Some(SecretString::from("b")),
        ..Default::default()
    };
    let publisher = TwitterPublisher::from_credentials(creds, "http://127.0.0.1:9", Duration::from_secs(1))
        .expect("Publisher builds");

    assert_eq!(publisher.auth().scheme(), "bearer");
}
