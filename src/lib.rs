//! # bulkllm-rs
//!
//! A bulk LLM row-processing service: applies a user-defined prompt
//! template to each row of tabular data, fans the rows out to the Gemini
//! API with bounded concurrency, and persists per-row and per-batch
//! outcomes to Supabase.
//!
//! ## Design
//!
//! - **Isolate and record, never abort**: a failing row degrades the
//!   batch's aggregate counters, never its ability to finish. Store write
//!   failures are logged warnings and never change a row's classification.
//! - **No shared client state**: each row unit constructs its own
//!   generation and store clients from immutable configuration.
//! - **Order-stable results**: rows complete in nondeterministic order but
//!   the summary always lists them in input order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulkllm_rs::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Loads config/processor.yaml if present, else the environment
//!     server::run_server().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    BatchOrchestrator, BatchStatus, BatchSubmission, BatchSummary, RowResult, RowStatus,
};
pub use core::prompt::compile_prompt;
pub use core::providers::{GeminiClient, GeminiConfig, GenerationProvider, ProviderError};
pub use storage::{ResultStore, SupabaseStore};
pub use utils::error::{ProcessorError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
