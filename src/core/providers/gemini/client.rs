//! Gemini client
//!
//! One `generateContent` call per row. The system instruction rides in
//! `systemInstruction`, the compiled prompt is the single user turn, and
//! the web-search grounding tool is attached when enabled.

use std::time::Duration;

use reqwest::{
    Client, ClientBuilder, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::{Value, json};
use tokio::time::timeout;

use crate::core::providers::{
    GenerationProvider, GenerationRequest, GenerationResponse, GenerationUsage, ProviderError,
};

use super::config::GeminiConfig;
use super::error::GeminiErrorMapper;

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    /// Create a client with its own connection pool and timeouts
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| {
                ProviderError::network("gemini", format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Build the `generateContent` request body
    pub fn build_request_body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "systemInstruction": {
                "parts": [{"text": request.system_instruction}]
            },
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}]
            }]
        });

        if self.config.enable_search_grounding {
            body["tools"] = json!([{"google_search": {}}]);
        }

        body
    }

    async fn send_request(&self, body: Value) -> Result<Value, ProviderError> {
        let url = self.config.get_endpoint("generateContent");
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.config.debug {
            tracing::debug!("Gemini request URL: {}", url);
            tracing::debug!(
                "Gemini request body: {}",
                serde_json::to_string_pretty(&body).unwrap_or_default()
            );
        }

        let response = timeout(
            Duration::from_secs(self.config.request_timeout),
            self.http_client.post(&url).json(&body).headers(headers).send(),
        )
        .await
        .map_err(|_| ProviderError::timeout("gemini", "Request timeout"))?
        .map_err(|e| ProviderError::network("gemini", format!("Network error: {}", e)))?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ProviderError::network("gemini", format!("Failed to read response: {}", e))
        })?;

        if self.config.debug {
            tracing::debug!("Gemini response status: {}", status);
            tracing::debug!("Gemini response body: {}", response_text);
        }

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let json_response: Value = serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::parse("gemini", format!("Failed to parse response JSON: {}", e))
        })?;

        if json_response.get("error").is_some() {
            return Err(GeminiErrorMapper::from_api_response(&json_response));
        }

        Ok(json_response)
    }

    /// Extract the concatenated candidate text; empty text is an error
    pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
        let parts = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|p| p.as_array());

        let text = match parts {
            Some(parts) => parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join(""),
            None => String::new(),
        };

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse { provider: "gemini" });
        }

        Ok(text)
    }

    fn extract_usage(response: &Value) -> Option<GenerationUsage> {
        response.get("usageMetadata").map(|usage| GenerationUsage {
            prompt_tokens: usage
                .get("promptTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            completion_tokens: usage
                .get("candidatesTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            total_tokens: usage
                .get("totalTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        })
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let body = self.build_request_body(&request);
        let response = self.send_request(body).await?;

        let text = Self::extract_text(&response)?;
        let usage = Self::extract_usage(&response);

        Ok(GenerationResponse { text, usage })
    }
}
