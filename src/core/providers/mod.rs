//! Generation service providers
//!
//! The engine treats the generation service as a black box with a defined
//! success/error contract: one prompt in, one text completion or one
//! classified error out. The Gemini provider is the production
//! implementation; tests substitute mocks through the trait below.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a generation provider
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Model '{model}' not found for {provider}")]
    ModelNotFound {
        provider: &'static str,
        model: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    #[error("API error from {provider} (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    /// The call succeeded at the transport level but produced no usable text
    #[error("No response generated by {provider}")]
    EmptyResponse { provider: &'static str },
}

impl ProviderError {
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Authentication {
            provider,
            message: message.into(),
        }
    }

    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        ProviderError::RateLimit {
            provider,
            message: "Rate limit exceeded".to_string(),
            retry_after,
        }
    }

    pub fn model_not_found(provider: &'static str, model: impl Into<String>) -> Self {
        ProviderError::ModelNotFound {
            provider,
            model: model.into(),
        }
    }

    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn provider_unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::ProviderUnavailable {
            provider,
            message: message.into(),
        }
    }

    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Configuration {
            provider,
            message: message.into(),
        }
    }

    pub fn parse(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Parse {
            provider,
            message: message.into(),
        }
    }

    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        ProviderError::Api {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Timeout {
            provider,
            message: message.into(),
        }
    }
}

/// One generation request: a fixed system instruction plus the compiled
/// prompt as the user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System-level instruction (constant persona for bulk processing)
    pub system_instruction: String,
    /// Compiled prompt text
    pub prompt: String,
}

/// Token accounting reported by the provider, when available
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A successful generation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated text (never empty; an empty body is a ProviderError)
    pub text: String,
    /// Usage metadata, if the provider reported it
    pub usage: Option<GenerationUsage>,
}

/// Contract between the row processor and a generation service
///
/// Implementations perform exactly one external call per `generate`
/// invocation. Empty or missing output is an error, never a placeholder
/// success.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Generate one completion for the compiled prompt
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError>;
}
