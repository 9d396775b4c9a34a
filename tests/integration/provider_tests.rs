//! Gemini client tests against a mock endpoint

use crate::common::{GEMINI_PATH, gemini_success_body};
use bulkllm_rs::core::providers::{
    GeminiClient, GeminiConfig, GenerationProvider, GenerationRequest, ProviderError,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key").with_base_url(server.uri());
    GeminiClient::new(config).unwrap()
}

fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest {
        system_instruction: "persona".to_string(),
        prompt: prompt.to_string(),
    }
}

#[tokio::test]
async fn test_generate_returns_text_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_success_body("Hi Ada!")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).generate(request("Hello Ada")).await.unwrap();

    assert_eq!(response.text, "Hi Ada!");
    let usage = response.usage.unwrap();
    assert_eq!(usage.total_tokens, 18);
}

#[tokio::test]
async fn test_generate_maps_429_to_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"retry_after": 7}})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).generate(request("p")).await.unwrap_err();
    match err {
        ProviderError::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(7)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_maps_401_to_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(request("p")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Authentication { .. }));
}

#[tokio::test]
async fn test_generate_empty_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"content": {"parts": []}}]})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).generate(request("p")).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_generate_detects_error_in_200_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(request("p")).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimit { .. }));
}
