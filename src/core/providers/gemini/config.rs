//! Gemini configuration

use serde::{Deserialize, Serialize};

use crate::core::providers::ProviderError;

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_request_timeout() -> u64 {
    600
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_search_grounding() -> bool {
    true
}

/// Configuration for the Gemini generation client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (Google AI Studio)
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the generative language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Model used for every row in a batch
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Attach the web-search grounding tool to every request
    #[serde(default = "default_search_grounding")]
    pub enable_search_grounding: bool,

    /// Log full request/response bodies at debug level
    #[serde(default)]
    pub debug: bool,
}

impl GeminiConfig {
    /// Create a config for Google AI Studio with defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            model: default_model(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            enable_search_grounding: default_search_grounding(),
            debug: false,
        }
    }

    /// Load the API key from the environment
    ///
    /// `GEMINI_API_KEY` wins; `GOOGLE_API_KEY` is accepted as a fallback.
    pub fn from_env() -> Result<Self, ProviderError> {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            return Ok(Self::new(api_key));
        }

        if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
            return Ok(Self::new(api_key));
        }

        Err(ProviderError::configuration(
            "gemini",
            "GEMINI_API_KEY is not set",
        ))
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Toggle search grounding
    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.enable_search_grounding = enabled;
        self
    }

    /// Override the base URL (tests point this at a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint URL for a model operation, key passed as a query parameter
    pub fn get_endpoint(&self, operation: &str) -> String {
        format!(
            "{}/{}/models/{}:{}?key={}",
            self.base_url, self.api_version, self.model, operation, self.api_key
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("API key is required for Google AI Studio".to_string());
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.connect_timeout > self.request_timeout {
            return Err("Connect timeout cannot be greater than request timeout".to_string());
        }

        Ok(())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new("")
    }
}
