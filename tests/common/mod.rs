//! Shared test infrastructure
//!
//! Mock Gemini and Supabase endpoints, request matchers, and config
//! factories used across the integration tests.

use bulkllm_rs::config::{ProcessingConfig, SupabaseConfig};
use bulkllm_rs::core::batch::BatchSubmission;
use bulkllm_rs::{Config, GeminiConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Path of the generateContent endpoint for the default model
pub const GEMINI_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

/// Matches a Gemini request whose compiled prompt contains a marker
pub struct PromptContains(pub String);

impl Match for PromptContains {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&request.body) else {
            return false;
        };
        body["contents"][0]["parts"][0]["text"]
            .as_str()
            .is_some_and(|text| text.contains(self.0.as_str()))
    }
}

/// A successful generateContent response body
pub fn gemini_success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 8,
            "totalTokenCount": 18
        }
    })
}

/// Mount a catch-all successful Gemini mock
pub async fn mount_gemini_success(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_success_body(text)))
        .with_priority(9)
        .mount(server)
        .await;
}

/// Mount permissive Supabase mocks for both tables
pub async fn mount_supabase_ok(server: &MockServer) {
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/batches"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/batch_results"))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

/// Build a config pointing both clients at mock servers
pub fn test_config(gemini_url: &str, supabase_url: &str) -> Config {
    Config {
        provider: GeminiConfig::new("test-key")
            .with_base_url(gemini_url)
            .with_search_grounding(false),
        store: SupabaseConfig::new(supabase_url, "service-key"),
        processing: ProcessingConfig {
            concurrency: 4,
            row_timeout_secs: 10,
            batch_timeout_secs: 60,
            dispatch_delay_ms: 0,
        },
        ..Default::default()
    }
}

/// Build a submission with one `value` column per row
pub fn submission(batch_id: &str, values: &[&str]) -> BatchSubmission {
    BatchSubmission {
        batch_id: batch_id.to_string(),
        rows: values
            .iter()
            .map(|v| std::collections::HashMap::from([("value".to_string(), json!(v))]))
            .collect(),
        prompt: "{{value}}".to_string(),
        context: None,
        output_schema: None,
    }
}
