//! Batch processing engine
//!
//! Fan-out of independent row units with bounded concurrency, per-row
//! failure isolation, and batch lifecycle tracking.

pub mod executor;
pub mod orchestrator;
pub mod processor;
pub mod types;

pub use executor::{DispatchConfig, DispatchOutcome, RowDispatcher};
pub use orchestrator::{BatchOrchestrator, ClientFactory, ConfigClientFactory};
pub use processor::{SYSTEM_INSTRUCTION, process_row, resolve_row_id};
pub use types::{
    BatchStatus, BatchSubmission, BatchSummary, RowData, RowResult, RowStatus, RowTask,
    TemplateSpec,
};
