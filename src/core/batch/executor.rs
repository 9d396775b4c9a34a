//! Row dispatcher
//!
//! The worker-pool abstraction behind the orchestrator: submit one future
//! per row, bound concurrency and per-row time, await all, and return
//! outcomes in original input order. Completion order is nondeterministic,
//! so each task carries its ordinal and results are re-sorted at collection
//! time.

use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Configuration for a dispatch run
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum concurrent row units (at least 1)
    pub concurrency: usize,
    /// Timeout per individual row unit
    pub row_timeout: Duration,
    /// Optional courtesy stagger between successive dispatches
    pub dispatch_delay: Option<Duration>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            row_timeout: Duration::from_secs(3600),
            dispatch_delay: None,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency cap
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-row timeout
    pub fn with_row_timeout(mut self, timeout: Duration) -> Self {
        self.row_timeout = timeout;
        self
    }

    /// Set the dispatch stagger
    pub fn with_dispatch_delay(mut self, delay: Option<Duration>) -> Self {
        self.dispatch_delay = delay;
        self
    }
}

/// A row unit that did not produce a result in time
#[derive(Debug, Clone)]
pub struct DispatchTimeout {
    pub index: usize,
    pub after: Duration,
}

impl std::fmt::Display for DispatchTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {} timed out after {:?}", self.index, self.after)
    }
}

/// Outcome of one dispatched row unit
#[derive(Debug, Clone)]
pub struct DispatchOutcome<R> {
    /// Ordinal of the row in the original input
    pub index: usize,
    /// The unit's result, or the timeout that cut it off
    pub result: Result<R, DispatchTimeout>,
    /// Time taken by this unit
    pub duration: Duration,
}

/// Dispatcher for independent row units
pub struct RowDispatcher {
    config: DispatchConfig,
}

impl RowDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Run one operation per item concurrently and collect all outcomes
    ///
    /// The operation is infallible from the dispatcher's point of view:
    /// row-level failures are the operation's own concern, and the only
    /// dispatcher-level failure mode is the per-row timeout. Results come
    /// back sorted by the original item index.
    pub async fn execute<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        operation: F,
    ) -> Vec<DispatchOutcome<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(usize, T) -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = R> + Send,
    {
        let items_with_index: Vec<(usize, T)> = items.into_iter().enumerate().collect();
        let config = self.config.clone();

        let mut results: Vec<DispatchOutcome<R>> = stream::iter(items_with_index)
            .map(|(index, item)| {
                let op = operation.clone();
                let cfg = config.clone();

                async move {
                    if let Some(delay) = cfg.dispatch_delay {
                        let stagger = index.min(u32::MAX as usize) as u32;
                        tokio::time::sleep(delay * stagger).await;
                    }

                    let start = std::time::Instant::now();
                    let result = tokio::time::timeout(cfg.row_timeout, op(index, item))
                        .await
                        .map_err(|_| DispatchTimeout {
                            index,
                            after: cfg.row_timeout,
                        });

                    DispatchOutcome {
                        index,
                        result,
                        duration: start.elapsed(),
                    }
                }
            })
            .buffer_unordered(config.concurrency)
            .collect()
            .await;

        // Completion order is nondeterministic; restore input order
        results.sort_by_key(|r| r.index);
        results
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

impl Default for RowDispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}
