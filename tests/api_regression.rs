//! API regression suite.
//!
//! Exercises the HTTP surface with `tower::ServiceExt::oneshot` against an
//! in-process router: envelope shape, the full predict pipeline with a
//! constant stand-in model, and the degraded paths (bad CSV, missing model
//! endpoint).

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use turbofan_prognostics::api::{create_app, ApiState};
use turbofan_prognostics::{
    ConstantModel, PrognosticsConfig, ReferenceStatistics, RulPredictor, FEATURE_COLUMNS,
};

fn state_with_model(rul: Option<f64>) -> ApiState {
    ApiState {
        config: Arc::new(PrognosticsConfig::default()),
        stats: Arc::new(ReferenceStatistics::builtin()),
        predictor: rul.map(|r| Arc::new(ConstantModel(r)) as Arc<dyn RulPredictor>),
    }
}

/// CSV with every channel at its reference mean, `rows` times.
fn nominal_csv(rows: usize) -> String {
    let stats = ReferenceStatistics::builtin();
    let mut out = FEATURE_COLUMNS.join(",");
    out.push('\n');
    let row: Vec<String> = FEATURE_COLUMNS
        .iter()
        .map(|f| format!("{}", stats.get(f).unwrap().mean))
        .collect();
    for _ in 0..rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn service_info_lists_required_columns() {
    let app = create_app(state_with_model(None));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let v = json_body(response).await;
    assert_eq!(v["data"]["service"], "turbofan-prognostics");
    let columns = v["data"]["required_columns"].as_array().unwrap();
    assert_eq!(columns.len(), 31);
    assert!(columns.iter().any(|c| c == "T24"));
    assert_eq!(v["meta"]["version"], "1");
}

#[tokio::test]
async fn liveness_answers_ok() {
    let app = create_app(state_with_model(None));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = json_body(response).await;
    assert_eq!(v["data"]["status"], "ok");
}

#[tokio::test]
async fn upload_predict_runs_full_pipeline() {
    // Constant model at 35 cycles against the default ceiling of 70:
    // prediction-based health index is exactly 50.
    let app = create_app(state_with_model(Some(35.0)));
    let response = app
        .oneshot(
            Request::post("/api/v1/predict/upload")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(nominal_csv(40)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let v = json_body(response).await;
    assert_eq!(v["data"]["predicted_rul"], 35.0);
    assert_eq!(v["data"]["health_index"], 50);
    assert_eq!(v["data"]["rule_health_index"], 100.0);
    assert_eq!(v["data"]["findings"].as_array().unwrap().len(), 0);
    assert!(v["data"]["damage_location"]
        .as_str()
        .unwrap()
        .contains("good condition"));
    assert_eq!(v["data"]["sequence_length"], 30);
    assert_eq!(v["data"]["model"], "constant");
}

#[tokio::test]
async fn file_path_predict_matches_upload() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(nominal_csv(5).as_bytes()).unwrap();
    file.flush().unwrap();

    let app = create_app(state_with_model(Some(70.0)));
    let body = serde_json::json!({ "file_path": file.path(), "sequence_length": 10 });
    let response = app
        .oneshot(
            Request::post("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let v = json_body(response).await;
    assert_eq!(v["data"]["health_index"], 100);
    assert_eq!(v["data"]["sequence_length"], 10);
}

#[tokio::test]
async fn missing_model_endpoint_answers_503() {
    let app = create_app(state_with_model(None));
    let response = app
        .oneshot(
            Request::post("/api/v1/predict/upload")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(nominal_csv(3)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let v = json_body(response).await;
    assert_eq!(v["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn csv_missing_columns_is_bad_request() {
    let app = create_app(state_with_model(Some(35.0)));
    let response = app
        .oneshot(
            Request::post("/api/v1/predict/upload")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from("unit,cycle\n1,2\n"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let v = json_body(response).await;
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
    assert!(v["error"]["message"]
        .as_str()
        .unwrap()
        .contains("missing required feature columns"));
}

#[tokio::test]
async fn nonexistent_file_path_is_bad_request() {
    let app = create_app(state_with_model(Some(35.0)));
    let body = serde_json::json!({ "file_path": "/no/such/telemetry.csv" });
    let response = app
        .oneshot(
            Request::post("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
