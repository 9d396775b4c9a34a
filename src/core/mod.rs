//! Core processing engine
//!
//! The prompt compiler, the per-row processor, the fan-out dispatcher, the
//! batch orchestrator, and the generation providers they call.

pub mod batch;
pub mod prompt;
pub mod providers;
