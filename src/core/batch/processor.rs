//! Row processor
//!
//! Processes exactly one row to completion, isolated from every other row:
//! resolve the row identifier, compile the prompt, make one generation
//! call, classify the outcome, persist the result record, and return the
//! result. A store failure is logged and never changes the classified
//! status; the in-memory result is returned regardless.

use tracing::{debug, warn};

use crate::core::batch::types::{ROW_ID_COLUMN, RowData, RowResult, RowTask};
use crate::core::prompt::{compile_prompt, scalar_to_string};
use crate::core::providers::{GenerationProvider, GenerationRequest};
use crate::storage::{ResultStore, RowResultRecord};

/// Fixed system-level instruction sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = "\
You are a specialized AI assistant for bulk data processing.

Your role:
- Process each row of data according to the user's instructions
- Use web search when you need current information or verification
- Return structured, consistent outputs
- Be precise and follow the exact output schema provided

Guidelines:
- If you need to verify information, use web search
- Keep responses concise and focused on the task
- Always return valid JSON matching the output schema
- If uncertain, indicate this in your response rather than guessing

Remember: You're processing data in bulk, so consistency and accuracy are critical.";

/// Resolve the identifier for a row
///
/// An explicit `id` column wins; otherwise `{batch_id}-row-{index}`.
/// Deterministic and collision-free within a batch.
pub fn resolve_row_id(batch_id: &str, index: usize, row: &RowData) -> String {
    row.get(ROW_ID_COLUMN)
        .and_then(scalar_to_string)
        .unwrap_or_else(|| format!("{}-row-{}", batch_id, index))
}

/// Process one row to a terminal result
pub async fn process_row(
    provider: &dyn GenerationProvider,
    store: &dyn ResultStore,
    task: &RowTask,
) -> RowResult {
    let row_id = resolve_row_id(&task.batch_id, task.index, &task.row);
    let prompt = compile_prompt(
        &task.row,
        &task.template.prompt,
        task.template.context.as_deref(),
        task.template.output_schema.as_deref(),
    );

    debug!(
        "[{}] Dispatching row {} ({} chars)",
        task.batch_id,
        row_id,
        prompt.len()
    );

    let result = match provider
        .generate(GenerationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt,
        })
        .await
    {
        Ok(response) => RowResult::success(row_id.clone(), response.text),
        Err(e) => {
            warn!(
                "[{}] Error on row {}: {}",
                task.batch_id,
                task.index + 1,
                e
            );
            RowResult::error(row_id.clone(), e.to_string())
        }
    };

    let record = RowResultRecord {
        id: row_id,
        batch_id: task.batch_id.clone(),
        row_index: task.index as i64,
        input: serde_json::to_value(&task.row).unwrap_or_default(),
        output: result.output.clone(),
        status: result.status.as_str().to_string(),
        error_message: result.error.clone(),
    };

    if let Err(e) = store.upsert_row_result(&record).await {
        warn!(
            "[{}] Warning: could not persist row {}: {}",
            task.batch_id, record.id, e
        );
    }

    result
}
