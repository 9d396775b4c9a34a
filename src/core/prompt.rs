//! Prompt compiler
//!
//! Expands one row plus a template, an optional context string, and an
//! optional output-schema hint into the final prompt text. Substitution is
//! best effort: a `{{column}}` placeholder with no matching non-empty
//! column stays verbatim, and malformed placeholders are plain text. Pure
//! function, no I/O, no failure modes.

use crate::core::batch::types::{ROW_ID_COLUMN, RowData};

/// Render a row value for substitution; `None` means "treat as absent"
pub(crate) fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        // Nested values are not scalars; fall back to their JSON form
        other => Some(other.to_string()),
    }
}

/// Compile the final prompt for one row
pub fn compile_prompt(
    row: &RowData,
    template: &str,
    context: Option<&str>,
    output_schema: Option<&[String]>,
) -> String {
    let mut prompt = template.to_string();

    for (key, value) in row {
        if key == ROW_ID_COLUMN {
            continue;
        }
        if let Some(value) = scalar_to_string(value) {
            let placeholder = format!("{{{{{}}}}}", key);
            prompt = prompt.replace(&placeholder, &value);
        }
    }

    if let Some(context) = context {
        if !context.is_empty() {
            prompt = format!("Context: {}\n\n{}", context, prompt);
        }
    }

    if let Some(schema) = output_schema {
        if !schema.is_empty() {
            prompt.push_str(&format!("\n\nExpected output format: {}", schema.join(", ")));
        }
    }

    prompt
}
