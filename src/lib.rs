//! Turbofan Prognostics: RUL estimation and damage localization.
//!
//! Deterministic, rule-based health assessment for turbofan engine
//! telemetry, paired with an opaque sequence-model collaborator for
//! Remaining Useful Life (RUL) prediction.
//!
//! ## Architecture
//!
//! - **Catalog + Reference**: typed channel/subsystem tables and the
//!   immutable training-time (mean, std) statistics, validated at startup
//! - **Preprocess**: telemetry CSV ingestion, raw snapshot extraction, and
//!   z-normalized model window construction
//! - **Scoring**: the damage rule engine, verdict bands, findings
//!   formatter, and RUL-based health index
//! - **Predictor**: seam to the external sequence-model inference service
//! - **API**: Axum HTTP surface with a uniform response envelope

pub mod api;
pub mod catalog;
pub mod config;
pub mod predictor;
pub mod preprocess;
pub mod reference;
pub mod scoring;
pub mod snapshot;

// Re-export the core evaluation types
pub use catalog::{CatalogEntry, ParameterGroup, DAMAGE_CATALOG, FEATURE_COLUMNS, NUM_FEATURES};
pub use config::{ConfigError, PrognosticsConfig};
pub use predictor::{ConstantModel, RemoteModel, RulPredictor};
pub use preprocess::{PreprocessError, SensorWindow, TelemetrySeries, DEFAULT_SEQUENCE_LENGTH};
pub use reference::{FeatureStats, ReferenceError, ReferenceStatistics};
pub use scoring::{
    health_from_rul, summarize, DamageAssessment, DamageRuleEngine, Finding, RulScaleError,
    ScoringOptions, Severity, DEFAULT_RUL_CEILING,
};
pub use snapshot::Snapshot;
