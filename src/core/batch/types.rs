//! Batch processing types and data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Column name that carries a caller-supplied row identifier
pub const ROW_ID_COLUMN: &str = "id";

/// One unit of input data: column name → scalar value
pub type RowData = HashMap<String, serde_json::Value>;

/// Inbound batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSubmission {
    /// Caller-supplied batch identifier
    pub batch_id: String,
    /// Ordered input rows; each may carry an explicit `id` column
    pub rows: Vec<RowData>,
    /// Prompt template with `{{column}}` placeholders
    pub prompt: String,
    /// Optional free-text context, prepended to every prompt
    #[serde(default)]
    pub context: Option<String>,
    /// Optional expected output field names, appended as guidance text
    #[serde(default)]
    pub output_schema: Option<Vec<String>>,
}

impl BatchSubmission {
    /// Validate the submission shape before dispatch
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_id.is_empty() {
            return Err("batch_id is required".to_string());
        }
        if self.prompt.is_empty() {
            return Err("prompt is required".to_string());
        }
        Ok(())
    }
}

/// Template, context, and schema hint shared by every row of a batch
#[derive(Debug, Clone)]
pub struct TemplateSpec {
    pub prompt: String,
    pub context: Option<String>,
    pub output_schema: Option<Vec<String>>,
}

impl From<&BatchSubmission> for TemplateSpec {
    fn from(submission: &BatchSubmission) -> Self {
        Self {
            prompt: submission.prompt.clone(),
            context: submission.context.clone(),
            output_schema: submission.output_schema.clone(),
        }
    }
}

/// One row handed to the row processor
#[derive(Debug, Clone)]
pub struct RowTask {
    pub batch_id: String,
    pub index: usize,
    pub row: RowData,
    pub template: Arc<TemplateSpec>,
}

/// Terminal status of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Error,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Success => "success",
            RowStatus::Error => "error",
        }
    }
}

/// Batch lifecycle status
///
/// `pending → processing → {completed, completed_with_errors}`; the two
/// terminal states never transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Processing,
    Completed,
    CompletedWithErrors,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::CompletedWithErrors => "completed_with_errors",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed | BatchStatus::CompletedWithErrors
        )
    }
}

/// Outcome of one processed row, as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowResult {
    /// Resolved row identifier
    pub id: String,
    /// Generated output text (empty on error)
    pub output: String,
    /// Terminal row status
    pub status: RowStatus,
    /// Failure description, null on success
    pub error: Option<String>,
}

impl RowResult {
    /// Build a success result
    pub fn success(id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output: output.into(),
            status: RowStatus::Success,
            error: None,
        }
    }

    /// Build an error result with empty output
    pub fn error(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output: String::new(),
            status: RowStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RowStatus::Success
    }
}

/// Aggregate outcome of one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub successful: usize,
    pub failed: usize,
    /// Elapsed wall time, rounded to centiseconds
    pub processing_time_seconds: f64,
    /// Elapsed ÷ row count, zero for an empty batch
    pub avg_time_per_row: f64,
    pub status: BatchStatus,
    /// Per-row results in original input order
    pub results: Vec<RowResult>,
}
