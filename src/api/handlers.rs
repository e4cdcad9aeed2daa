//! API handlers.
//!
//! The predict path runs the full pipeline for one request: parse telemetry
//! CSV, build the raw snapshot and the normalized model window, call the
//! sequence model, scale the prediction into a health index, and run the
//! damage rule engine over the snapshot. All request state is local; the
//! shared state is read-only reference data.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::PrognosticsConfig;
use crate::predictor::RulPredictor;
use crate::preprocess::{PreprocessError, TelemetrySeries};
use crate::reference::ReferenceStatistics;
use crate::scoring::{health_from_rul, summarize, DamageRuleEngine, Finding};

/// Shared, read-only application state.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<PrognosticsConfig>,
    pub stats: Arc<ReferenceStatistics>,
    /// `None` when no inference endpoint is configured; the predict
    /// endpoints answer 503 in that case.
    pub predictor: Option<Arc<dyn RulPredictor>>,
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Path to a telemetry CSV file readable by the service.
    pub file_path: PathBuf,
    /// Override for the model window length.
    pub sequence_length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_rul: f64,
    /// Prediction-based health index in [0, 100].
    pub health_index: u8,
    /// Formatted damage summary (bounded; full detail in `findings`).
    pub damage_location: String,
    /// Rule-based health index after deductions, clamped to [0, 100].
    pub rule_health_index: f64,
    pub findings: Vec<Finding>,
    pub sequence_length: usize,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub endpoints: Vec<&'static str>,
    pub required_columns: Vec<&'static str>,
    pub optional_metadata_columns: Vec<&'static str>,
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /` — service description and data requirements.
pub async fn service_info() -> Response {
    ApiResponse::ok(ServiceInfo {
        service: "turbofan-prognostics",
        endpoints: vec![
            "GET /",
            "GET /health",
            "POST /api/v1/predict",
            "POST /api/v1/predict/upload",
        ],
        required_columns: crate::catalog::FEATURE_COLUMNS.to_vec(),
        optional_metadata_columns: crate::catalog::METADATA_COLUMNS.to_vec(),
    })
}

/// `GET /health` — liveness probe.
pub async fn liveness() -> Response {
    ApiResponse::ok(serde_json::json!({ "status": "ok" }))
}

/// `POST /api/v1/predict` — JSON request naming a server-readable CSV file.
pub async fn predict(
    State(state): State<ApiState>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let series = match TelemetrySeries::from_csv_path(&request.file_path) {
        Ok(series) => series,
        Err(e) => return preprocess_error_response(&e),
    };
    run_prediction(&state, series, request.sequence_length).await
}

/// `POST /api/v1/predict/upload` — raw CSV in the request body.
pub async fn predict_upload(State(state): State<ApiState>, body: String) -> Response {
    let series = match TelemetrySeries::from_csv_reader(std::io::Cursor::new(body)) {
        Ok(series) => series,
        Err(e) => return preprocess_error_response(&e),
    };
    run_prediction(&state, series, None).await
}

async fn run_prediction(
    state: &ApiState,
    series: TelemetrySeries,
    sequence_length: Option<usize>,
) -> Response {
    let Some(predictor) = state.predictor.as_ref() else {
        return ApiErrorResponse::service_unavailable(
            "no model inference endpoint configured (set model.endpoint)",
        );
    };

    let sequence_length = sequence_length.unwrap_or(state.config.model.sequence_length);
    if sequence_length == 0 {
        return ApiErrorResponse::bad_request("sequence_length must be at least 1");
    }

    let window = match series.model_window(&state.stats, sequence_length) {
        Ok(window) => window,
        Err(e) => return preprocess_error_response(&e),
    };

    let predicted_rul = match predictor.predict(&window).await {
        Ok(rul) => rul,
        Err(e) => {
            warn!(error = %e, "model inference failed");
            return ApiErrorResponse::service_unavailable(format!("model inference failed: {e}"));
        }
    };

    let health_index = match health_from_rul(predicted_rul, state.config.model.rul_ceiling) {
        Ok(index) => index,
        Err(e) => {
            warn!(error = %e, predicted_rul, "model returned an unusable prediction");
            return ApiErrorResponse::internal(e.to_string());
        }
    };

    let engine = DamageRuleEngine::new(&state.stats, &state.config.scoring);
    let assessment = engine.evaluate(&series.latest_snapshot());
    let damage_location = summarize(&assessment, state.config.scoring.max_reported_findings);

    info!(
        predicted_rul,
        health_index,
        findings = assessment.findings.len(),
        rule_health_index = assessment.health_index,
        "prediction complete"
    );

    ApiResponse::ok(PredictResponse {
        predicted_rul,
        health_index,
        damage_location,
        rule_health_index: assessment.health_index,
        findings: assessment.findings,
        sequence_length,
        model: predictor.model_name().to_string(),
    })
}

/// Telemetry parse failures are caller errors, not server faults.
fn preprocess_error_response(error: &PreprocessError) -> Response {
    ApiErrorResponse::bad_request(error.to_string())
}
