//! HTTP-level provider tests against a local mock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lapidary_core::{LanguageModelClient, ModelError};
use lapidary_llm::{AnthropicClient, ModelConfig, OpenAiClient, ProviderKind};

fn anthropic_config(server: &MockServer, max_retries: u32) -> ModelConfig {
    ModelConfig {
        api_key: Some("sk-test".into()),
        base_url: Some(server.uri()),
        max_retries,
        timeout_secs: 5,
        ..ModelConfig::default()
    }
}

fn openai_config(server: &MockServer, api_key: Option<&str>) -> ModelConfig {
    ModelConfig {
        provider: ProviderKind::OpenAi,
        model: "gpt-4o-mini".into(),
        api_key: api_key.map(String::from),
        base_url: Some(server.uri()),
        max_retries: 0,
        timeout_secs: 5,
        ..ModelConfig::default()
    }
}

fn messages_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 34}
    })
}

fn chat_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-01",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
        ]
    })
}

// ==== Anthropic ====

#[tokio::test]
async fn anthropic_sends_prompts_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "system": "you tidy notes",
            "messages": [{"role": "user", "content": "note body here"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("polished")))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&anthropic_config(&server, 0)).unwrap();
    let text = client.send("you tidy notes", "note body here").await.unwrap();
    assert_eq!(text, "polished");
}

#[tokio::test]
async fn anthropic_retries_throttling_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("second try")))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&anthropic_config(&server, 1)).unwrap();
    let text = client.send("sys", "user").await.unwrap();
    assert_eq!(text, "second try");
}

#[tokio::test]
async fn anthropic_auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error": {"type": "authentication_error"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Retries are budgeted but must not be spent on a 401.
    let client = AnthropicClient::new(&anthropic_config(&server, 3)).unwrap();
    let error = client.send("sys", "user").await.unwrap_err();
    assert!(matches!(error, ModelError::Auth(_)));
}

#[tokio::test]
async fn anthropic_bad_request_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_string("max_tokens out of range"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&anthropic_config(&server, 3)).unwrap();
    let error = client.send("sys", "user").await.unwrap_err();
    match error {
        ModelError::Provider(message) => {
            assert!(message.contains("HTTP 400"), "unexpected message: {message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn anthropic_reports_rate_limit_when_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&anthropic_config(&server, 0)).unwrap();
    let error = client.send("sys", "user").await.unwrap_err();
    assert_eq!(error, ModelError::RateLimited);
}

#[tokio::test]
async fn anthropic_surfaces_server_error_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&anthropic_config(&server, 0)).unwrap();
    let error = client.send("sys", "user").await.unwrap_err();
    match error {
        ModelError::Provider(message) => {
            assert!(message.contains("HTTP 500"), "unexpected message: {message}");
            assert!(message.contains("overloaded"), "unexpected message: {message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

// ==== OpenAI-compatible ====

#[tokio::test]
async fn openai_sends_bearer_token_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-oa"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "you tidy notes"},
                {"role": "user", "content": "note body here"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("polished")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&openai_config(&server, Some("sk-oa")));
    let text = client.send("you tidy notes", "note body here").await.unwrap();
    assert_eq!(text, "polished");
}

#[tokio::test]
async fn openai_omits_auth_header_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("local model reply")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&openai_config(&server, None));
    let text = client.send("sys", "user").await.unwrap();
    assert_eq!(text, "local model reply");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn openai_classifies_throttling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&openai_config(&server, Some("sk-oa")));
    let error = client.send("sys", "user").await.unwrap_err();
    assert_eq!(error, ModelError::RateLimited);
}

#[tokio::test]
async fn openai_rejects_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-02",
            "object": "chat.completion",
            "choices": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&openai_config(&server, Some("sk-oa")));
    let error = client.send("sys", "user").await.unwrap_err();
    assert!(matches!(error, ModelError::Provider(_)));
}
