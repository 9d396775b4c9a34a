//! Batch ingress endpoints
//!
//! `POST /v1/batches` accepts a batch submission, drives it through the
//! orchestrator, and returns the batch summary. The caller always receives
//! either the summary or a fatal batch error; per-row failures and store
//! write failures surface only inside the summary counters.

use actix_web::{HttpResponse, ResponseError, Result as ActixResult, web};
use tracing::{error, info};
use uuid::Uuid;

use crate::core::batch::BatchSubmission;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::{ResultStore, SupabaseStore};
use crate::utils::error::ProcessorError;

/// Configure batch routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/batches")
            .route("", web::post().to(submit_batch))
            .route("/{batch_id}", web::get().to(get_batch)),
    );
}

/// Submit a batch and wait for its terminal summary
pub async fn submit_batch(
    state: web::Data<AppState>,
    payload: web::Json<BatchSubmission>,
) -> ActixResult<HttpResponse> {
    let submission = payload.into_inner();
    let request_id = Uuid::new_v4();

    info!(
        %request_id,
        batch_id = %submission.batch_id,
        rows = submission.rows.len(),
        "Batch submission received"
    );

    match state.orchestrator.run(submission).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => {
            error!(%request_id, "Batch processing failed: {}", e);
            Ok(e.error_response())
        }
    }
}

/// Read one batch record back from the store
pub async fn get_batch(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let batch_id = path.into_inner();

    // The store handle is scoped to this request
    let store = match SupabaseStore::new(state.config.store().clone()) {
        Ok(store) => store,
        Err(e) => return Ok(e.error_response()),
    };

    match store.fetch_batch(&batch_id).await {
        Ok(Some(record)) => Ok(ApiResponse::success(record).to_http_response()),
        Ok(None) => {
            Ok(ProcessorError::NotFound(format!("Batch '{}' not found", batch_id)).error_response())
        }
        Err(e) => {
            error!("Batch lookup failed: {}", e);
            Ok(e.error_response())
        }
    }
}
