//! Supabase store configuration

use serde::{Deserialize, Serialize};
use url::Url;

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Configuration for the Supabase/PostgREST store client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project endpoint URL
    #[serde(default)]
    pub url: String,
    /// Service-role credential used for keyed writes
    #[serde(default)]
    pub service_role_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_role_key: String::new(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl SupabaseConfig {
    /// Create a config with defaults
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            ..Default::default()
        }
    }

    /// Load endpoint and credential from the environment
    ///
    /// `SUPABASE_URL` wins; `NEXT_PUBLIC_SUPABASE_URL` is accepted as a
    /// fallback for deployments that only expose the public variable.
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("SUPABASE_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_SUPABASE_URL"))
            .map_err(|_| "SUPABASE_URL is not set".to_string())?;
        let service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY is not set".to_string())?;

        Ok(Self::new(url, service_role_key))
    }

    /// Base URL of the PostgREST surface
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Store endpoint URL is required".to_string());
        }
        Url::parse(&self.url).map_err(|e| format!("Invalid store endpoint URL: {}", e))?;

        if self.service_role_key.is_empty() {
            return Err("Store service credential is required".to_string());
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
