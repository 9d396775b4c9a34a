//! Error handling for the processor
//!
//! This module defines all error types used throughout the service.

use crate::core::providers::ProviderError;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the processor
pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Main error type for the processor
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Configuration errors (missing secrets, invalid endpoints)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Store write/read failures (never fatal for a classified row)
    #[error("Store error: {0}")]
    Store(String),

    /// The fan-out mechanism itself failed before producing row results
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Server startup/runtime errors
    #[error("Server error: {0}")]
    Server(String),
}

impl ProcessorError {
    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        ProcessorError::Server(message.into())
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        ProcessorError::Store(message.into())
    }
}

impl ResponseError for ProcessorError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            ProcessorError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            ProcessorError::Validation(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            ProcessorError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            ProcessorError::Provider(provider_error) => match provider_error {
                ProviderError::RateLimit { .. } => (
                    actix_web::http::StatusCode::TOO_MANY_REQUESTS,
                    "PROVIDER_RATE_LIMIT",
                    provider_error.to_string(),
                ),
                ProviderError::Authentication { .. } => (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "PROVIDER_AUTH_ERROR",
                    provider_error.to_string(),
                ),
                ProviderError::InvalidRequest { .. } => (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "INVALID_REQUEST",
                    provider_error.to_string(),
                ),
                _ => (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    provider_error.to_string(),
                ),
            },
            ProcessorError::Timeout(_) => (
                actix_web::http::StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                self.to_string(),
            ),
            ProcessorError::Dispatch(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "DISPATCH_ERROR",
                self.to_string(),
            ),
            ProcessorError::Store(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "Store operation failed".to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let err = ProcessorError::Validation("batch_id is required".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_dispatch_error_maps_to_internal() {
        let err = ProcessorError::Dispatch("join failure".to_string());
        let response = err.error_response();
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_message_is_not_leaked() {
        let err = ProcessorError::store("service key rejected");
        let display = err.to_string();
        assert!(display.contains("service key rejected"));
        // HTTP body carries only the generic message
        let response = err.error_response();
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
