//! Damage Localization & Health Index Scoring
//!
//! Deterministic, rule-based assessment of a single raw telemetry snapshot.
//! No model inference happens here: the rule engine compares physical values
//! against reference statistics, accumulates per-subsystem findings and
//! health deductions, and the formatter renders a bounded human-readable
//! summary. The independent RUL-based health index lives in [`rul_scale`].
//!
//! Evaluation is pure with respect to process state: one snapshot in,
//! findings and a clamped health index out, no shared mutation. The
//! reference data is read-only after startup, so concurrent evaluations
//! need no locking.

pub mod deviation;
pub mod formatter;
pub mod rules;
pub mod rul_scale;
pub mod verdict;

pub use deviation::Deviation;
pub use formatter::summarize;
pub use rules::{DamageAssessment, DamageRuleEngine, Finding, ScoringOptions};
pub use rul_scale::{health_from_rul, RulScaleError, DEFAULT_RUL_CEILING};
pub use verdict::{clamp_index, verdict};

use serde::{Deserialize, Serialize};

/// Severity tier of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Severe,
    Moderate,
    Mild,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Severe => write!(f, "severe"),
            Self::Moderate => write!(f, "moderate"),
            Self::Mild => write!(f, "mild"),
        }
    }
}
