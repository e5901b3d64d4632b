//! Wiremock integration tests for OpenAiClient.
//!
//! These tests verify the chat-completions request shape and the error
//! classification applied to provider responses.

use std::time::Duration;

use marketscope::providers::GenerateProvider;
use marketscope::{ErrorKind, GenerateOptions, MarketscopeError, OpenAiClient, Usage};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo-0125",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 17, "total_tokens": 59 }
    })
}

fn error_body(message: &str, kind: &str, code: Option<&str>) -> serde_json::Value {
    json!({ "error": { "message": message, "type": kind, "code": code, "param": null } })
}

#[tokio::test]
async fn test_generate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": "Product: Coffee" }],
            "temperature": 0.5,
            "max_tokens": 700
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("### Strengths\n- Bold")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let response = client
        .generate("Product: Coffee", &GenerateOptions::default())
        .await
        .expect("generate should succeed");

    assert_eq!(response.text, "### Strengths\n- Bold");
    assert_eq!(response.model.as_deref(), Some("gpt-3.5-turbo-0125"));
    assert_eq!(
        response.usage,
        Some(Usage {
            prompt_tokens: 42,
            completion_tokens: 17,
            total_tokens: 59
        })
    );
}

#[tokio::test]
async fn test_missing_content_is_empty_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let response = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap();

    assert_eq!(response.text, "");
    assert_eq!(response.usage, None);
}

#[tokio::test]
async fn test_custom_options_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.25,
            "max_tokens": 128
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let options = GenerateOptions::new("gpt-4o-mini")
        .temperature(0.25)
        .max_tokens(128);
    assert!(client.generate("prompt", &options).await.is_ok());
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            "Incorrect API key provided: sk-bad.",
            "invalid_request_error",
            Some("invalid_api_key"),
        )))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("sk-bad", mock_server.uri()).unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_insufficient_quota_is_quota_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body(
            "You exceeded your current quota, please check your plan and billing details.",
            "insufficient_quota",
            Some("insufficient_quota"),
        )))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MarketscopeError::QuotaExceeded(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_rate_limit_with_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_json(error_body(
                    "Rate limit reached for requests",
                    "requests",
                    Some("rate_limit_exceeded"),
                )),
        )
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_server_error_is_transient_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            "The server had an error while processing your request.",
            "server_error",
            None,
        )))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    match &err {
        MarketscopeError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("server had an error"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_slow_provider_hits_http_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_timeout(
        "test_key",
        mock_server.uri(),
        Duration::from_millis(100),
    )
    .unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.http_status(), 504);
}

#[tokio::test]
async fn test_each_generate_makes_exactly_one_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let err = client
        .generate("prompt", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MarketscopeError::Api { status: 503, .. }));
    // MockServer verifies `.expect(1)` on drop.
}
