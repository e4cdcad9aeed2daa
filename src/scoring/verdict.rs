//! Health index clamping and qualitative verdict bands.
//!
//! The verdict is used only when no explicit finding was recorded: it maps
//! the (already clamped) health index into one of six fixed bands,
//! inclusive-lower-bound, evaluated top-down with first match winning.

/// Clamp a raw health index to [0, 100]. The only bound enforcement in the
/// pipeline; deduction totals are unbounded below zero before this.
pub fn clamp_index(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0)
}

/// Qualitative verdict for an assessment with no explicit findings.
pub fn verdict(index: f64) -> &'static str {
    if index >= 90.0 {
        "equipment in good condition, no significant damage detected"
    } else if index >= 80.0 {
        "equipment operating normally, minor fluctuation in some parameters"
    } else if index >= 70.0 {
        "overall condition acceptable, periodic inspection recommended"
    } else if index >= 60.0 {
        "minor anomaly present, watch temperature and pressure parameters"
    } else if index >= 50.0 {
        "multiple parameters deviating from nominal, maintenance check recommended"
    } else {
        "abnormal state, multiple possible damage sites, immediate inspection recommended"
    }
}
