//! Configuration management
//!
//! This module handles loading and validation of all service configuration.
//! Non-secret settings may come from an optional YAML file; the generation
//! and store credentials always come from the environment. Missing any
//! required secret is a fatal configuration error, reported before any row
//! is processed.

pub mod models;

pub use models::{ProcessingConfig, ServerConfig, SupabaseConfig};

use crate::core::providers::GeminiConfig;
use crate::utils::error::{ProcessorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the processor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Generation provider settings
    #[serde(default)]
    pub provider: GeminiConfig,
    /// Store settings
    #[serde(default)]
    pub store: SupabaseConfig,
    /// Fan-out settings
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then fill secrets from the
    /// environment where the file left them empty
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProcessorError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ProcessorError::Config(format!("Failed to parse config: {}", e)))?;

        config.merge_env_secrets();
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration entirely from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let provider = GeminiConfig::from_env()
            .map_err(|e| ProcessorError::Config(e.to_string()))?;
        let store = SupabaseConfig::from_env().map_err(ProcessorError::Config)?;

        let config = Self {
            server: ServerConfig::from_env(),
            provider,
            store,
            processing: ProcessingConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fill empty secrets from the environment
    fn merge_env_secrets(&mut self) {
        if self.provider.api_key.is_empty() {
            if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
                self.provider.api_key = api_key;
            }
        }
        if self.store.url.is_empty() {
            if let Ok(url) =
                std::env::var("SUPABASE_URL").or_else(|_| std::env::var("NEXT_PUBLIC_SUPABASE_URL"))
            {
                self.store.url = url;
            }
        }
        if self.store.service_role_key.is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_SERVICE_ROLE_KEY") {
                self.store.service_role_key = key;
            }
        }
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Get provider configuration
    pub fn provider(&self) -> &GeminiConfig {
        &self.provider
    }

    /// Get store configuration
    pub fn store(&self) -> &SupabaseConfig {
        &self.store
    }

    /// Get processing configuration
    pub fn processing(&self) -> &ProcessingConfig {
        &self.processing
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| ProcessorError::Config(format!("Server config error: {}", e)))?;

        self.provider
            .validate()
            .map_err(|e| ProcessorError::Config(format!("Provider config error: {}", e)))?;

        self.store
            .validate()
            .map_err(|e| ProcessorError::Config(format!("Store config error: {}", e)))?;

        self.processing
            .validate()
            .map_err(|e| ProcessorError::Config(format!("Processing config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }
}
