//! Sequence-model predictor seam.
//!
//! The RUL predictor is an opaque collaborator: a function from a
//! fixed-length, z-normalized sensor window to a scalar RUL estimate. The
//! trained CNN-LSTM runs in a separate inference service; this module only
//! defines the seam and the HTTP client that talks to it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::preprocess::SensorWindow;

/// Maps a model input window to a scalar RUL estimate, in cycles.
#[async_trait]
pub trait RulPredictor: Send + Sync {
    async fn predict(&self, window: &SensorWindow) -> Result<f64>;

    /// Human-readable model name for logging and responses.
    fn model_name(&self) -> &str;
}

// ============================================================================
// Remote inference service
// ============================================================================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    sequence_length: usize,
    window: &'a [[f64; crate::catalog::NUM_FEATURES]],
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    predicted_rul: f64,
}

/// HTTP client for the external sequence-model inference service.
///
/// Posts the normalized window as JSON and expects
/// `{"predicted_rul": <float>}` back.
pub struct RemoteModel {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteModel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RulPredictor for RemoteModel {
    async fn predict(&self, window: &SensorWindow) -> Result<f64> {
        let request = InferenceRequest {
            sequence_length: window.sequence_length(),
            window: &window.rows,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("inference request to {} failed", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("inference service {} returned an error", self.endpoint))?;

        let body: InferenceResponse = response
            .json()
            .await
            .context("inference service returned malformed JSON")?;

        debug!(predicted_rul = body.predicted_rul, "remote inference complete");
        Ok(body.predicted_rul)
    }

    fn model_name(&self) -> &str {
        "remote-sequence-model"
    }
}

// ============================================================================
// Constant stand-in (tests, offline wiring checks)
// ============================================================================

/// Predictor that always returns a fixed RUL. Stands in for the sequence
/// model in tests and offline pipeline checks.
pub struct ConstantModel(pub f64);

#[async_trait]
impl RulPredictor for ConstantModel {
    async fn predict(&self, _window: &SensorWindow) -> Result<f64> {
        Ok(self.0)
    }

    fn model_name(&self) -> &str {
        "constant"
    }
}
