//! End-to-end chat flow: user input through the Gemini client to a renderer.

use std::sync::Arc;

use codemate::{
    BufferRenderer, ClientConfig, GeminiClient, RenderedMessage, SendMessageUseCase, SendOutcome,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup(server: &MockServer, api_key: Option<&str>) -> (SendMessageUseCase, Arc<BufferRenderer>) {
    let config = ClientConfig::new(api_key.map(str::to_string)).with_base_url(server.uri());
    let client = Arc::new(GeminiClient::new(config));
    let renderer = Arc::new(BufferRenderer::new());
    (SendMessageUseCase::new(client, renderer.clone(), 1024), renderer)
}

#[tokio::test]
async fn test_reply_with_code_is_rendered() {
    let server = MockServer::start().await;
    let reply = "Use this:\n```rust\nfn main() {}\n```";
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"content": {"parts": [{"text": reply}]}}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (use_case, renderer) = setup(&server, Some("k")).await;
    let outcome = use_case.execute("How do I start a Rust program?").await;

    assert!(outcome.is_reply());
    assert_eq!(
        renderer.messages(),
        vec![
            RenderedMessage::User("How do I start a Rust program?".to_string()),
            RenderedMessage::Reply(reply.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_key_is_rendered_as_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (use_case, renderer) = setup(&server, None).await;
    let outcome = use_case.execute("hello").await;

    assert!(matches!(outcome, SendOutcome::Failed(ref e) if e.is_configuration()));
    match renderer.messages().last() {
        Some(RenderedMessage::Error(text)) => {
            assert!(text.starts_with("Sorry, I encountered an error: Please set your API key"));
        }
        other => panic!("expected rendered error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_does_not_stop_next_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": {"message": "internal"}})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"content": {"parts": [{"text": "recovered"}]}}]})),
        )
        .mount(&server)
        .await;

    let (use_case, renderer) = setup(&server, Some("k")).await;

    let first = use_case.execute("one").await;
    let second = use_case.execute("two").await;

    assert_eq!(first.error().and_then(|e| e.status()), Some(500));
    assert!(matches!(second, SendOutcome::Replied(ref text) if text == "recovered"));
    assert_eq!(renderer.messages().len(), 4);
}
