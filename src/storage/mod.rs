//! Storage layer
//!
//! The store is a black-box CRUD surface over two logical tables:
//! `batches` (keyed updates by batch id) and `batch_results`
//! (insert-or-update keyed by row id). Writes are independent and
//! non-conflicting because each row owns a disjoint identifier, so no
//! cross-row locking or transactions are required.

pub mod supabase;

pub use supabase::SupabaseStore;

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// One persisted row outcome, matching the `batch_results` columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowResultRecord {
    /// Row identifier (primary key)
    pub id: String,
    /// Owning batch
    pub batch_id: String,
    /// Ordinal position within the batch input
    pub row_index: i64,
    /// Serialized original row input
    pub input: serde_json::Value,
    /// Generated output text (empty on error)
    pub output: String,
    /// `success` or `error`
    pub status: String,
    /// Failure description, null on success
    pub error_message: Option<String>,
}

/// One batch row read back from the `batches` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub processed_rows: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Keyed-write contract between the engine and the store
///
/// Every method is a single keyed insert/update/read; callers treat write
/// failures as warnings, never as classification changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    /// Mark a batch as `processing`
    async fn mark_batch_processing(&self, batch_id: &str) -> Result<()>;

    /// Insert or update one row result, keyed by row id
    async fn upsert_row_result(&self, record: &RowResultRecord) -> Result<()>;

    /// Write the terminal status and successful-row count for a batch
    async fn finalize_batch(
        &self,
        batch_id: &str,
        status: &str,
        processed_rows: u32,
    ) -> Result<()>;

    /// Read one batch record back, `None` when the id is unknown
    async fn fetch_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>>;
}
