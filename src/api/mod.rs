//! REST API module using Axum.
//!
//! Exposes the prediction pipeline over HTTP with a consistent response
//! envelope. Route table:
//!
//! - `GET /` — service info and data requirements
//! - `GET /health` — liveness
//! - `POST /api/v1/predict` — predict from a server-readable CSV path
//! - `POST /api/v1/predict/upload` — predict from CSV in the request body

pub mod envelope;
pub mod handlers;

pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::liveness))
        .route("/api/v1/predict", post(handlers::predict))
        .route("/api/v1/predict/upload", post(handlers::predict_upload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
