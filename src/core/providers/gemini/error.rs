//! Gemini error mapping
//!
//! Translates HTTP statuses and in-body API errors into [`ProviderError`].

use crate::core::providers::ProviderError;

/// Maps Gemini transport and API failures onto the provider error taxonomy
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Map an HTTP status plus raw body to a provider error
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        match status {
            400 => ProviderError::invalid_request("gemini", format!("Bad request: {}", body)),
            401 => ProviderError::authentication("gemini", "Invalid or missing API key"),
            403 => ProviderError::authentication("gemini", "Forbidden: insufficient permissions"),
            404 => ProviderError::model_not_found("gemini", "Model or endpoint not found"),
            429 => {
                let retry_after = Self::extract_retry_after(body);
                ProviderError::rate_limit("gemini", retry_after)
            }
            500..=599 => {
                ProviderError::api_error("gemini", status, format!("Server error: {}", body))
            }
            _ => ProviderError::api_error("gemini", status, body),
        }
    }

    /// Map an error object embedded in a 200-level response body
    pub fn from_api_response(response: &serde_json::Value) -> ProviderError {
        if let Some(error) = response.get("error") {
            let code = error.get("code").and_then(|c| c.as_u64()).unwrap_or(500) as u16;
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            let status = error.get("status").and_then(|s| s.as_str()).unwrap_or("");

            return match (code, status) {
                (401, _) | (_, "UNAUTHENTICATED") => {
                    ProviderError::authentication("gemini", message)
                }
                (403, _) | (_, "PERMISSION_DENIED") => {
                    ProviderError::authentication("gemini", message)
                }
                (400, _) | (_, "INVALID_ARGUMENT") => {
                    ProviderError::invalid_request("gemini", message)
                }
                (404, _) | (_, "NOT_FOUND") => ProviderError::model_not_found("gemini", message),
                (429, _) | (_, "RESOURCE_EXHAUSTED") => ProviderError::RateLimit {
                    provider: "gemini",
                    message: message.to_string(),
                    retry_after: None,
                },
                (503, _) | (_, "UNAVAILABLE") => {
                    ProviderError::provider_unavailable("gemini", "Service unavailable")
                }
                _ => ProviderError::api_error("gemini", code, message),
            };
        }

        ProviderError::api_error("gemini", 500, "Unknown API error")
    }

    fn extract_retry_after(body: &str) -> Option<u64> {
        let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
        json.get("error")
            .and_then(|e| e.get("retry_after"))
            .or_else(|| json.get("retry_after"))
            .and_then(|v| v.as_u64())
    }
}
