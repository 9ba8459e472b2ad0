//! HTTP handler behavior (status codes and error documents).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use jobledger_core::record::JobMetric;
use jobledger_gateway::app_state::AppState;
use jobledger_gateway::config;
use jobledger_gateway::status::StaticStatus;
use jobledger_gateway::store::MemoryStore;
use jobledger_gateway::{ops, transport};

const CFG: &str = r#"
version: 1
app_name: "ledger-test"
status:
  backend: static
  jobs:
    - name: "unused"
storage:
  backend: memory
"#;

fn state() -> AppState {
    let cfg = config::load_from_str(CFG).unwrap();
    let status = StaticStatus::new()
        .with_job("knn-1", vec![JobMetric::new("accuracy", 0.8, 1700000000.0)])
        .with_job("no-defs", vec![]);
    AppState::new(cfg, Arc::new(status), Arc::new(MemoryStore::new()))
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call(state: &AppState, event: Value) -> Response {
    transport::invoke::invoke(State(state.clone()), Ok(Json(event))).await
}

#[tokio::test]
async fn ok_invocation_returns_training_metrics() {
    let st = state();
    let resp = call(
        &st,
        json!({ "TrainingJobName": "knn-1", "DestinationBucket": "b", "CsvFile": "k.csv" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let m = &body["TrainingMetrics"][0];
    assert_eq!(m["MetricName"], "accuracy");
    assert_eq!(m["Value"], 0.8);
    assert_eq!(m["PastMin"], 1.0);
    assert_eq!(m["PastMax"], 0.0);
}

#[tokio::test]
async fn missing_job_is_400_with_error_document() {
    let st = state();
    let resp = call(&st, json!({ "CsvFile": "k.csv" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["errorType"], "MISSING_JOB_IDENTIFIER");
    assert!(body["errorMessage"].as_str().unwrap().contains("TrainingJobName"));
}

#[tokio::test]
async fn no_metrics_is_422() {
    let st = state();
    let resp = call(&st, json!({ "TrainingJobName": "no-defs" })).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["errorType"], "NO_METRICS_AVAILABLE");
}

#[tokio::test]
async fn root_welcomes_by_app_name() {
    let Json(body) = transport::invoke::root(State(state())).await;
    assert_eq!(body["message"], "Welcome to ledger-test");
}

#[tokio::test]
async fn metrics_endpoint_counts_outcomes() {
    let st = state();
    call(&st, json!({ "TrainingJobName": "knn-1" })).await;
    call(&st, json!({})).await;

    let resp = ops::metrics(State(st.clone())).await;
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("jobledger_invocations_total{outcome=\"ok\"} 1"));
    assert!(text.contains("jobledger_invocations_total{outcome=\"MISSING_JOB_IDENTIFIER\"} 1"));
}

#[test]
fn status_mapping() {
    use jobledger_core::error::ClientCode;
    use transport::invoke::status_for;

    assert_eq!(status_for(ClientCode::MalformedLedger), StatusCode::CONFLICT);
    assert_eq!(status_for(ClientCode::Storage), StatusCode::BAD_GATEWAY);
    assert_eq!(status_for(ClientCode::Upstream), StatusCode::BAD_GATEWAY);
    assert_eq!(status_for(ClientCode::Internal), StatusCode::INTERNAL_SERVER_ERROR);
}
