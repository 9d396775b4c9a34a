//! Supabase store tests against a mock PostgREST endpoint

use bulkllm_rs::config::SupabaseConfig;
use bulkllm_rs::storage::{ResultStore, RowResultRecord, SupabaseStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(SupabaseConfig::new(server.uri(), "service-key")).unwrap()
}

fn record(id: &str) -> RowResultRecord {
    RowResultRecord {
        id: id.to_string(),
        batch_id: "b1".to_string(),
        row_index: 0,
        input: json!({"name": "Ada"}),
        output: "out".to_string(),
        status: "success".to_string(),
        error_message: None,
    }
}

#[tokio::test]
async fn test_mark_batch_processing_issues_keyed_patch() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/batches"))
        .and(query_param("id", "eq.b1"))
        .and(header("apikey", "service-key"))
        .and(header("Authorization", "Bearer service-key"))
        .and(body_partial_json(json!({"status": "processing"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).mark_batch_processing("b1").await.unwrap();
}

#[tokio::test]
async fn test_upsert_resolves_on_row_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/batch_results"))
        .and(query_param("on_conflict", "id"))
        .and(header("Prefer", "resolution=merge-duplicates,return=minimal"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let store = store_for(&server);
    // Reprocessing the same identifier is an update, not a duplicate
    store.upsert_row_result(&record("custom-1")).await.unwrap();
    store.upsert_row_result(&record("custom-1")).await.unwrap();
}

#[tokio::test]
async fn test_finalize_batch_writes_terminal_status_and_count() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/batches"))
        .and(query_param("id", "eq.b1"))
        .and(body_partial_json(json!({
            "status": "completed_with_errors",
            "processed_rows": 4
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server)
        .finalize_batch("b1", "completed_with_errors", 4)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_batch_returns_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/batches"))
        .and(query_param("id", "eq.b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b1", "status": "completed", "processed_rows": 3}
        ])))
        .mount(&server)
        .await;

    let batch = store_for(&server).fetch_batch("b1").await.unwrap().unwrap();
    assert_eq!(batch.status, "completed");
    assert_eq!(batch.processed_rows, Some(3));
}

#[tokio::test]
async fn test_fetch_batch_unknown_id_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/batches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let batch = store_for(&server).fetch_batch("missing").await.unwrap();
    assert!(batch.is_none());
}

#[tokio::test]
async fn test_write_failure_surfaces_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/batch_results"))
        .respond_with(ResponseTemplate::new(500).set_body_string("relation does not exist"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .upsert_row_result(&record("r1"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Store error"));
}
