//! Tests for the OpenAI client against a mock HTTP server.

use quotebot_error::ModelsErrorKind;
use quotebot_models::{GenerateRequest, OpenAiClient, SamplingConfig, TextBackend};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> GenerateRequest {
    GenerateRequest::builder()
        .system("You are a test persona.")
        .prompt("Say something.")
        .build()
        .expect("Valid request")
}

async fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(SecretString::from("sk-test"), "gpt-4o-mini")
        .expect("Client builds")
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_openai_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 150,
            "messages": [
                {"role": "system", "content": "You are a test persona."},
                {"role": "user", "content": "Say something."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  \"Giddy up!\"  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let text = client.generate(&request()).await.expect("Generation succeeds");

    assert_eq!(text, "  \"Giddy up!\"  ");
    assert_eq!(client.provider_name(), "openai");
    assert_eq!(client.model_name(), "gpt-4o-mini");
}

#[tokio::test]
async fn test_openai_sends_custom_sampling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"max_tokens": 60})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "short"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .await
        .with_sampling(SamplingConfig::new(60, 0.5));
    assert_eq!(client.generate(&request()).await.expect("ok"), "short");
}

#[tokio::test]
async fn test_openai_unauthorized_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate(&request()).await.unwrap_err();

    assert!(err.kind.is_auth());
    match err.kind {
        ModelsErrorKind::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, ModelsErrorKind::Parse(_)));
}

#[tokio::test]
async fn test_openai_empty_choices_is_empty_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, ModelsErrorKind::EmptyCompletion);
}

#[tokio::test]
async fn test_openai_unreachable_host_is_http_error() {
    let client = OpenAiClient::new(SecretString::from("sk-test"), "gpt-4o-mini")
        .expect("Client builds")
        .with_base_url("http://127.0.0.1:9");

    let err = client.generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, ModelsErrorKind::Http(_)));
}
