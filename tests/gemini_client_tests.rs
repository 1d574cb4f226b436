//! Integration tests for the Gemini client against a mocked HTTP server.

use codemate::{
    render_result_text, ClientConfig, GeminiClient, GenerationError, ListModelsUseCase,
    TextGenerator,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.0-flash";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
    let config = ClientConfig::new(api_key.map(str::to_string))
        .with_base_url(server.uri())
        .with_model(MODEL);
    GeminiClient::new(config)
}

async fn mount_generate(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for key in [None, Some(""), Some("YOUR_GEMINI_API_KEY_HERE")] {
        let client = client_for(&server, key);
        let err = client.generate("hello", 1024).await.unwrap_err();
        assert!(err.is_configuration(), "key {key:?} gave {err:?}");
        assert!(err.to_string().contains("Please set your API key"));
    }
}

#[tokio::test]
async fn test_transport_failure_is_reported_with_cause() {
    // Nothing listens on port 1.
    let config = ClientConfig::new(Some("secret-key".to_string())).with_base_url("http://127.0.0.1:1");
    let client = GeminiClient::new(config);

    let err = client.generate("hello", 1024).await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
    let message = err.to_string();
    assert!(
        message.starts_with("Request to the API failed: error sending request"),
        "missing reqwest cause in {message}"
    );
    assert!(
        message.matches(": ").count() > 1,
        "source chain dropped from {message}"
    );
    assert!(!message.contains("secret-key"), "API key leaked into {message}");
}

#[tokio::test]
async fn test_rate_limit_becomes_api_error() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "rate limited"}})),
    )
    .await;

    let err = client_for(&server, Some("k")).generate("hello", 1024).await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    let message = err.to_string();
    assert!(message.contains("429"));
    assert!(message.contains("rate limited"));
}

#[tokio::test]
async fn test_unparseable_error_body_falls_back_to_unknown_error() {
    let server = MockServer::start().await;
    mount_generate(&server, ResponseTemplate::new(503).set_body_string("Service Unavailable")).await;

    let err = client_for(&server, Some("k")).generate("hello", 1024).await.unwrap_err();

    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Unknown error");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_empty_response() {
    let server = MockServer::start().await;
    mount_generate(&server, ResponseTemplate::new(200).set_body_json(json!({"candidates": []}))).await;

    let err = client_for(&server, Some("k")).generate("hello", 1024).await.unwrap_err();

    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_candidate_without_parts_is_malformed() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"candidates": [{"content": {"parts": []}}]})),
    )
    .await;

    let err = client_for(&server, Some("k")).generate("hello", 1024).await.unwrap_err();

    assert!(matches!(err, GenerationError::MalformedResponse));
}

#[tokio::test]
async fn test_success_returns_first_part_text() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"candidates": [{"content": {"parts": [{"text": "Hello"}]}}]})),
    )
    .await;

    let text = client_for(&server, Some("k")).generate("hi", 1024).await.unwrap();

    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn test_empty_text_is_a_successful_fallback() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]})),
    )
    .await;

    let result = client_for(&server, Some("k")).generate("hi", 1024).await;

    assert_eq!(result.unwrap(), "No text was generated");
}

#[tokio::test]
async fn test_request_carries_key_json_and_fixed_sampling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "abc123"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "Write a haiku"}]}],
            "generationConfig": {
                "maxOutputTokens": 64,
                "temperature": 0.7,
                "topP": 0.95,
                "topK": 40
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server, Some("abc123"))
        .generate("Write a haiku", 64)
        .await
        .unwrap();

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_non_json_success_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_generate(&server, ResponseTemplate::new(200).set_body_string("<html></html>")).await;

    let result = client_for(&server, Some("k")).generate("hi", 1024).await;

    assert!(matches!(result, Err(GenerationError::Decode(_))));
    assert!(render_result_text(result).starts_with("Error: Failed to decode"));
}

#[tokio::test]
async fn test_list_models_parses_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "supportedGenerationMethods": ["generateContent"]
                },
                {
                    "name": "models/text-embedding-004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server, Some("k")));
    let use_case = ListModelsUseCase::new(client);

    let all = use_case.execute().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id(), "gemini-2.0-flash");

    let generative = use_case.generative_models().await.unwrap();
    assert_eq!(generative.len(), 1);
    assert_eq!(generative[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
}

#[tokio::test]
async fn test_list_models_without_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server, None).list_models().await.unwrap_err();

    assert!(err.is_configuration());
}
