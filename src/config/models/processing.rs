//! Batch processing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_concurrency() -> usize {
    8
}

fn default_row_timeout_secs() -> u64 {
    3600
}

fn default_batch_timeout_secs() -> u64 {
    86_400
}

/// Tuning knobs for the fan-out engine
///
/// A row is bounded by one external call plus one store write, so an hour
/// is a generous per-row ceiling; a day covers even a fully sequential
/// batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Maximum concurrent row units
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-row timeout in seconds
    #[serde(default = "default_row_timeout_secs")]
    pub row_timeout_secs: u64,
    /// Whole-batch timeout in seconds
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
    /// Courtesy stagger between successive dispatches, in milliseconds.
    /// Zero disables the stagger; correctness never depends on it.
    #[serde(default)]
    pub dispatch_delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            row_timeout_secs: default_row_timeout_secs(),
            batch_timeout_secs: default_batch_timeout_secs(),
            dispatch_delay_ms: 0,
        }
    }
}

impl ProcessingConfig {
    /// Load overrides from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("PROCESSING_CONCURRENCY") {
            if let Ok(concurrency) = value.parse() {
                config.concurrency = concurrency;
            }
        }
        if let Ok(value) = std::env::var("PROCESSING_DISPATCH_DELAY_MS") {
            if let Ok(delay) = value.parse() {
                config.dispatch_delay_ms = delay;
            }
        }
        config
    }

    /// Per-row timeout
    pub fn row_timeout(&self) -> Duration {
        Duration::from_secs(self.row_timeout_secs)
    }

    /// Whole-batch timeout
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Dispatch stagger, `None` when disabled
    pub fn dispatch_delay(&self) -> Option<Duration> {
        (self.dispatch_delay_ms > 0).then(|| Duration::from_millis(self.dispatch_delay_ms))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }
        if self.row_timeout_secs == 0 {
            return Err("Row timeout must be greater than 0".to_string());
        }
        if self.batch_timeout_secs < self.row_timeout_secs {
            return Err("Batch timeout cannot be smaller than the row timeout".to_string());
        }
        Ok(())
    }
}
