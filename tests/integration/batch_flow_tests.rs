//! Full engine flow against mock Gemini and Supabase endpoints
//!
//! These tests exercise the production wiring: the orchestrator builds real
//! Gemini and Supabase clients per row, pointed at wiremock servers.

use crate::common::{
    GEMINI_PATH, PromptContains, mount_gemini_success, mount_supabase_ok, submission, test_config,
};
use bulkllm_rs::core::batch::{BatchOrchestrator, BatchStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(gemini: &MockServer, supabase: &MockServer) -> BatchOrchestrator {
    BatchOrchestrator::new(Arc::new(test_config(&gemini.uri(), &supabase.uri())))
}

#[tokio::test]
async fn test_batch_flow_all_rows_succeed() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    mount_gemini_success(&gemini, "processed").await;
    mount_supabase_ok(&supabase).await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator
        .run(submission("b1", &["a", "b", "c"]))
        .await
        .unwrap();

    assert_eq!(summary.batch_id, "b1");
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.status, BatchStatus::Completed);
    assert!(summary.results.iter().all(|r| r.output == "processed"));
    assert!(summary.processing_time_seconds >= 0.0);

    // One processing transition, three upserts, one terminal write
    let requests = supabase.received_requests().await.unwrap();
    let patches = requests.iter().filter(|r| r.method.as_str() == "PATCH").count();
    let posts = requests.iter().filter(|r| r.method.as_str() == "POST").count();
    assert_eq!(patches, 2);
    assert_eq!(posts, 3);
}

#[tokio::test]
async fn test_batch_flow_isolates_failing_row() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(PromptContains("poison".to_string()))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .mount(&gemini)
        .await;
    mount_gemini_success(&gemini, "ok").await;
    mount_supabase_ok(&supabase).await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator
        .run(submission("b1", &["one", "two", "poison", "four", "five"]))
        .await
        .unwrap();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.successful, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.status, BatchStatus::CompletedWithErrors);
    assert!(!summary.results[2].is_success());
    assert!(summary.results[2].error.is_some());

    // Terminal write carries the successful count
    let finalize = supabase
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .filter_map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).ok())
        .find(|body| body["status"] == "completed_with_errors")
        .expect("terminal status write missing");
    assert_eq!(finalize["processed_rows"], 4);
}

#[tokio::test]
async fn test_batch_flow_empty_model_output_is_row_error() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": [{"content": {"parts": []}}]})),
        )
        .mount(&gemini)
        .await;
    mount_supabase_ok(&supabase).await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator.run(submission("b1", &["a"])).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.status, BatchStatus::CompletedWithErrors);
    assert_eq!(summary.results[0].output, "");
    assert!(summary.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("No response generated"));
}

#[tokio::test]
async fn test_batch_flow_results_keep_input_order() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    // The first row is the slowest, so completion order is reversed
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(PromptContains("slow".to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(crate::common::gemini_success_body("slow-out"))
                .set_delay(Duration::from_millis(300)),
        )
        .with_priority(1)
        .mount(&gemini)
        .await;
    mount_gemini_success(&gemini, "fast-out").await;
    mount_supabase_ok(&supabase).await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator
        .run(submission("b1", &["slow", "quick", "quicker"]))
        .await
        .unwrap();

    let ids: Vec<&str> = summary.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b1-row-0", "b1-row-1", "b1-row-2"]);
    assert_eq!(summary.results[0].output, "slow-out");
    assert_eq!(summary.results[1].output, "fast-out");
}

#[tokio::test]
async fn test_batch_flow_store_outage_degrades_to_warnings() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    mount_gemini_success(&gemini, "ok").await;
    // Every store write fails; classification must be unaffected
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/batches"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&supabase)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/batch_results"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&supabase)
        .await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator
        .run(submission("b1", &["a", "b"]))
        .await
        .unwrap();

    assert_eq!(summary.successful, 2);
    assert_eq!(summary.status, BatchStatus::Completed);
}

#[tokio::test]
async fn test_batch_flow_zero_rows() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    // No generation calls are expected for an empty batch
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    mount_supabase_ok(&supabase).await;

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator.run(submission("empty", &[])).await.unwrap();

    assert_eq!(summary.total_rows, 0);
    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.avg_time_per_row, 0.0);
    assert_eq!(summary.status, BatchStatus::Completed);
}

#[tokio::test]
async fn test_batch_flow_explicit_ids_reach_the_store() {
    let gemini = MockServer::start().await;
    let supabase = MockServer::start().await;

    mount_gemini_success(&gemini, "ok").await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/batches"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&supabase)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/batch_results"))
        .and(query_param("on_conflict", "id"))
        .and(body_partial_json(json!([{"id": "custom-1", "batch_id": "b1"}])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&supabase)
        .await;

    let mut submission = submission("b1", &["a"]);
    submission.rows[0].insert("id".to_string(), json!("custom-1"));

    let orchestrator = engine(&gemini, &supabase);
    let summary = orchestrator.run(submission).await.unwrap();
    assert_eq!(summary.results[0].id, "custom-1");
}
