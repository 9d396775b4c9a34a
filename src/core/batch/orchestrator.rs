//! Batch orchestrator
//!
//! Drives a batch from submission to terminal state: transition to
//! `processing`, fan one row unit out per row, collect all outcomes,
//! aggregate statistics, and write the terminal status. Batch-level store
//! writes are best effort; a failing row degrades the aggregate counters,
//! never the batch's ability to finish.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::batch::executor::{DispatchConfig, RowDispatcher};
use crate::core::batch::processor::{process_row, resolve_row_id};
use crate::core::batch::types::{
    BatchStatus, BatchSubmission, BatchSummary, RowResult, RowTask, TemplateSpec,
};
use crate::core::providers::{GeminiClient, GenerationProvider};
use crate::storage::{ResultStore, SupabaseStore};
use crate::utils::error::{ProcessorError, Result};

/// Builds fresh client handles for one unit of work
///
/// Each row unit acquires its own generation and store clients and drops
/// them on completion; no connection state is shared across concurrent
/// workers.
pub trait ClientFactory: Send + Sync {
    fn generation_provider(&self) -> Result<Box<dyn GenerationProvider>>;
    fn result_store(&self) -> Result<Box<dyn ResultStore>>;
}

/// Production factory backed by the service configuration
pub struct ConfigClientFactory {
    config: Arc<Config>,
}

impl ConfigClientFactory {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl ClientFactory for ConfigClientFactory {
    fn generation_provider(&self) -> Result<Box<dyn GenerationProvider>> {
        Ok(Box::new(GeminiClient::new(self.config.provider().clone())?))
    }

    fn result_store(&self) -> Result<Box<dyn ResultStore>> {
        Ok(Box::new(SupabaseStore::new(self.config.store().clone())?))
    }
}

/// Round to a fixed number of decimal places for the summary
fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Batch orchestrator
pub struct BatchOrchestrator {
    config: Arc<Config>,
    clients: Arc<dyn ClientFactory>,
}

impl BatchOrchestrator {
    /// Create an orchestrator with production clients
    pub fn new(config: Arc<Config>) -> Self {
        let clients = Arc::new(ConfigClientFactory::new(config.clone()));
        Self { config, clients }
    }

    /// Create an orchestrator with a custom client factory
    pub fn with_client_factory(config: Arc<Config>, clients: Arc<dyn ClientFactory>) -> Self {
        Self { config, clients }
    }

    /// Drive a batch from submission to terminal state
    ///
    /// The whole batch is bounded by the configured batch timeout; an
    /// exceeded timeout is a fatal dispatch error, not a silent empty
    /// result set.
    pub async fn run(&self, submission: BatchSubmission) -> Result<BatchSummary> {
        submission.validate().map_err(ProcessorError::Validation)?;

        let batch_timeout = self.config.processing().batch_timeout();
        tokio::time::timeout(batch_timeout, self.process(submission))
            .await
            .map_err(|_| {
                ProcessorError::Dispatch(format!(
                    "Batch exceeded the {}s timeout",
                    batch_timeout.as_secs()
                ))
            })?
    }

    async fn process(&self, submission: BatchSubmission) -> Result<BatchSummary> {
        let batch_id = submission.batch_id.clone();
        let total = submission.rows.len();
        let start = Instant::now();

        info!(
            "[{}] Starting batch processing with {} rows",
            batch_id, total
        );

        // Best-effort transition to `processing`; processing proceeds even
        // when this write fails
        match self.clients.result_store() {
            Ok(store) => {
                if let Err(e) = store.mark_batch_processing(&batch_id).await {
                    warn!(
                        "[{}] Warning: could not update batch status: {}",
                        batch_id, e
                    );
                }
            }
            Err(e) => {
                warn!(
                    "[{}] Warning: could not build store client for status update: {}",
                    batch_id, e
                );
            }
        }

        let template = Arc::new(TemplateSpec::from(&submission));
        let tasks: Vec<RowTask> = submission
            .rows
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, row)| RowTask {
                batch_id: batch_id.clone(),
                index,
                row,
                template: template.clone(),
            })
            .collect();

        let processing = self.config.processing();
        let dispatcher = RowDispatcher::new(
            DispatchConfig::new()
                .with_concurrency(processing.concurrency)
                .with_row_timeout(processing.row_timeout())
                .with_dispatch_delay(processing.dispatch_delay()),
        );

        let clients = self.clients.clone();
        let completed = Arc::new(AtomicUsize::new(0));

        let outcomes = dispatcher
            .execute(tasks, move |_, task: RowTask| {
                let clients = clients.clone();
                let completed = completed.clone();

                async move {
                    let result = match (clients.generation_provider(), clients.result_store()) {
                        (Ok(provider), Ok(store)) => {
                            process_row(provider.as_ref(), store.as_ref(), &task).await
                        }
                        (Err(e), _) | (_, Err(e)) => {
                            // A per-row client failure is scoped to this row
                            let row_id = resolve_row_id(&task.batch_id, task.index, &task.row);
                            warn!(
                                "[{}] Could not build clients for row {}: {}",
                                task.batch_id, row_id, e
                            );
                            RowResult::error(row_id, e.to_string())
                        }
                    };

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if done % 100 == 0 {
                        let elapsed = start.elapsed().as_secs_f64();
                        let rate = done as f64 / elapsed.max(f64::EPSILON);
                        let remaining = (total - done) as f64 / rate;
                        info!(
                            "[{}] Processed {}/{} rows ({:.1} rows/sec, ~{:.0}s remaining)",
                            task.batch_id, done, total, rate, remaining
                        );
                    }

                    result
                }
            })
            .await;

        // Dispatch outcomes arrive sorted by ordinal; a timed-out unit is
        // recorded as an error result for that row alone
        let results: Vec<RowResult> = outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Ok(result) => result,
                Err(timeout) => {
                    let row_id =
                        resolve_row_id(&batch_id, timeout.index, &submission.rows[timeout.index]);
                    warn!("[{}] {}", batch_id, timeout);
                    RowResult::error(row_id, timeout.to_string())
                }
            })
            .collect();

        if results.len() != total {
            error!(
                "[{}] Fan-out produced {} results for {} rows",
                batch_id,
                results.len(),
                total
            );
            return Err(ProcessorError::Dispatch(format!(
                "Fan-out produced {} results for {} rows",
                results.len(),
                total
            )));
        }

        let successful = results.iter().filter(|r| r.is_success()).count();
        let failed = total - successful;
        let elapsed = start.elapsed().as_secs_f64();
        let avg_time_per_row = if total > 0 {
            elapsed / total as f64
        } else {
            0.0
        };

        let status = if failed == 0 {
            BatchStatus::Completed
        } else {
            BatchStatus::CompletedWithErrors
        };

        // Best-effort terminal write; never retried, never fatal
        match self.clients.result_store() {
            Ok(store) => {
                if let Err(e) = store
                    .finalize_batch(&batch_id, status.as_str(), successful as u32)
                    .await
                {
                    warn!("[{}] Warning: could not finalize batch: {}", batch_id, e);
                }
            }
            Err(e) => {
                warn!(
                    "[{}] Warning: could not build store client for finalize: {}",
                    batch_id, e
                );
            }
        }

        info!(
            "[{}] Batch complete: {} success, {} errors in {:.1}s",
            batch_id, successful, failed, elapsed
        );

        Ok(BatchSummary {
            batch_id,
            total_rows: total,
            successful,
            failed,
            processing_time_seconds: round_to(elapsed, 2),
            avg_time_per_row: round_to(avg_time_per_row, 3),
            status,
            results,
        })
    }
}
