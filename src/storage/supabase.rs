//! Supabase store client
//!
//! Thin PostgREST client over the `batches` and `batch_results` tables.
//! Upserts resolve on the row id so that reprocessing a row identifier
//! updates the existing record instead of duplicating it.

use std::time::Duration;

use chrono::Utc;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::json;
use tracing::debug;

use crate::config::SupabaseConfig;
use crate::storage::{BatchRecord, ResultStore, RowResultRecord};
use crate::utils::error::{ProcessorError, Result};

/// Supabase/PostgREST store client
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    config: SupabaseConfig,
    http_client: Client,
}

impl SupabaseStore {
    /// Create a store client with its own connection pool and credentials
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.service_role_key)
                .map_err(|e| ProcessorError::Config(format!("Invalid service key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.service_role_key))
                .map_err(|e| ProcessorError::Config(format!("Invalid service key: {}", e)))?,
        );

        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.config.rest_url(), table)
    }

    async fn check_write_response(&self, context: &str, response: Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProcessorError::Store(format!(
                "{} failed with status {}: {}",
                context, status, body
            )));
        }
        debug!("{} succeeded", context);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResultStore for SupabaseStore {
    async fn mark_batch_processing(&self, batch_id: &str) -> Result<()> {
        let response = self
            .http_client
            .patch(self.table_url("batches"))
            .query(&[("id", format!("eq.{}", batch_id))])
            .json(&json!({
                "status": "processing",
                "updated_at": Utc::now().to_rfc3339(),
            }))
            .send()
            .await?;

        self.check_write_response("batches processing update", response)
            .await
    }

    async fn upsert_row_result(&self, record: &RowResultRecord) -> Result<()> {
        let response = self
            .http_client
            .post(self.table_url("batch_results"))
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[record])
            .send()
            .await?;

        self.check_write_response("batch_results upsert", response)
            .await
    }

    async fn finalize_batch(
        &self,
        batch_id: &str,
        status: &str,
        processed_rows: u32,
    ) -> Result<()> {
        let response = self
            .http_client
            .patch(self.table_url("batches"))
            .query(&[("id", format!("eq.{}", batch_id))])
            .json(&json!({
                "status": status,
                "processed_rows": processed_rows,
                "updated_at": Utc::now().to_rfc3339(),
            }))
            .send()
            .await?;

        self.check_write_response("batches finalize update", response)
            .await
    }

    async fn fetch_batch(&self, batch_id: &str) -> Result<Option<BatchRecord>> {
        let response = self
            .http_client
            .get(self.table_url("batches"))
            .query(&[
                ("id", format!("eq.{}", batch_id)),
                ("select", "*".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProcessorError::Store(format!(
                "batches fetch failed with status {}: {}",
                status, body
            )));
        }

        let mut records: Vec<BatchRecord> = response.json().await?;
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.remove(0))
        })
    }
}
