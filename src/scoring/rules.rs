//! Damage rule engine.
//!
//! Walks the damage catalog over one raw snapshot, scores each channel's
//! deviation against the reference statistics, and classifies it into one of
//! three severity tiers per schedule. Every tier match appends one finding
//! and subtracts its deduction from a running health index that starts at
//! 100 and is clamped to [0, 100] at the end.
//!
//! Tier boundaries are strict `>` comparisons, evaluated severe-first with
//! short-circuit: a deviation sitting exactly on a boundary falls through to
//! the tier below (or to no finding at all).
//!
//! ## Schedules
//!
//! - Steep (temperature, speed): z > 3.0 severe (-25), > 2.0 moderate (-15),
//!   > 1.5 mild (-5). Hot-section and rotor damage escalates fastest.
//! - Standard (pressure): z > 3.0 (-20), > 2.0 (-12), > 1.5 (-5).
//! - Standard (flow): z > 3.0 (-20), > 2.0 (-10), > 1.5 (-3).
//! - Efficiency, generic ladder: z > 3.0 (-20), > 2.0 (-15), > 1.5 (-5).
//! - Efficiency, dedicated ladder: z > 2.5 (-20), > 1.5 (-15), > 1.0 (-5).
//!   The efficiency coefficients sit near zero, so their dedicated ladder
//!   fires earlier than the generic one.
//! - Fuel (Wf only): percent-of-nominal tiers > 20% (-20), > 10% (-10),
//!   > 5% (-5).
//!
//! Efficiency channels are scored under both ladders when
//! [`ScoringOptions::score_efficiency_twice`] is set (the default,
//! preserving the served behavior); with the flag off only the dedicated
//! ladder runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::deviation::{percent_deviation, z_score, Deviation};
use super::{verdict, Severity};
use crate::catalog::{CatalogEntry, ParameterGroup, DAMAGE_CATALOG};
use crate::reference::ReferenceStatistics;
use crate::snapshot::Snapshot;

// ============================================================================
// Tier schedules
// ============================================================================

struct Tier {
    threshold: f64,
    severity: Severity,
    deduction: f64,
}

const fn tier(threshold: f64, severity: Severity, deduction: f64) -> Tier {
    Tier {
        threshold,
        severity,
        deduction,
    }
}

const STEEP: [Tier; 3] = [
    tier(3.0, Severity::Severe, 25.0),
    tier(2.0, Severity::Moderate, 15.0),
    tier(1.5, Severity::Mild, 5.0),
];

const PRESSURE: [Tier; 3] = [
    tier(3.0, Severity::Severe, 20.0),
    tier(2.0, Severity::Moderate, 12.0),
    tier(1.5, Severity::Mild, 5.0),
];

const FLOW: [Tier; 3] = [
    tier(3.0, Severity::Severe, 20.0),
    tier(2.0, Severity::Moderate, 10.0),
    tier(1.5, Severity::Mild, 3.0),
];

const EFFICIENCY_GENERIC: [Tier; 3] = [
    tier(3.0, Severity::Severe, 20.0),
    tier(2.0, Severity::Moderate, 15.0),
    tier(1.5, Severity::Mild, 5.0),
];

const EFFICIENCY_DEDICATED: [Tier; 3] = [
    tier(2.5, Severity::Severe, 20.0),
    tier(1.5, Severity::Moderate, 15.0),
    tier(1.0, Severity::Mild, 5.0),
];

const FUEL_PERCENT: [Tier; 3] = [
    tier(20.0, Severity::Severe, 20.0),
    tier(10.0, Severity::Moderate, 10.0),
    tier(5.0, Severity::Mild, 5.0),
];

/// First tier whose threshold is strictly exceeded, severe-first.
fn classify(deviation: Deviation, schedule: &'static [Tier; 3]) -> Option<&'static Tier> {
    match deviation {
        Deviation::Scored(d) => schedule.iter().find(|t| d > t.threshold),
        Deviation::Unscored => None,
    }
}

// ============================================================================
// Options & result types
// ============================================================================

/// Tunable rule-engine behavior, loaded from the `[scoring]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringOptions {
    /// Score efficiency channels under both the generic and the dedicated
    /// ladder (two independent findings per channel). On by default to
    /// preserve the behavior the model was served with.
    #[serde(default = "default_true")]
    pub score_efficiency_twice: bool,

    /// Maximum findings listed in the formatted summary before truncation.
    #[serde(default = "default_max_reported")]
    pub max_reported_findings: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_reported() -> usize {
    3
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            score_efficiency_twice: true,
            max_reported_findings: 3,
        }
    }
}

/// One detected anomaly: a channel, its subsystem, and the health deduction
/// it contributed.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub feature: &'static str,
    pub group: ParameterGroup,
    pub severity: Severity,
    pub deduction: f64,
    pub message: String,
}

/// Result of one rule-engine evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct DamageAssessment {
    /// Findings in catalog order. Empty when nothing fired or no data.
    pub findings: Vec<Finding>,
    /// Health index after deductions, clamped to [0, 100].
    pub health_index: f64,
    /// True when the snapshot was empty and nothing could be assessed.
    /// Kept distinct from "assessed clean" so callers and the formatter
    /// can surface the sentinel message instead of an optimistic verdict.
    pub no_data: bool,
}

impl DamageAssessment {
    fn no_data() -> Self {
        Self {
            findings: Vec::new(),
            health_index: 100.0,
            no_data: true,
        }
    }

    /// Sum of all deductions (pre-clamp magnitude), mainly for logging.
    pub fn total_deduction(&self) -> f64 {
        self.findings.iter().map(|f| f.deduction).sum()
    }
}

// ============================================================================
// Rule engine
// ============================================================================

/// Deterministic damage-localization engine.
///
/// Holds references to the process-wide read-only tables; each call to
/// [`evaluate`](Self::evaluate) is pure and request-local.
pub struct DamageRuleEngine<'a> {
    stats: &'a ReferenceStatistics,
    options: &'a ScoringOptions,
}

impl<'a> DamageRuleEngine<'a> {
    pub fn new(stats: &'a ReferenceStatistics, options: &'a ScoringOptions) -> Self {
        Self { stats, options }
    }

    /// Evaluate one raw snapshot into findings and a clamped health index.
    ///
    /// Channels absent from the snapshot or the statistics table are
    /// skipped silently. An empty snapshot yields the no-data assessment
    /// (no findings, index 100, `no_data` set).
    pub fn evaluate(&self, snapshot: &Snapshot) -> DamageAssessment {
        if snapshot.is_empty() {
            return DamageAssessment::no_data();
        }

        let mut findings = Vec::new();
        let mut health_index = 100.0_f64;

        for entry in &DAMAGE_CATALOG {
            let Some(value) = snapshot.get(entry.feature) else {
                continue;
            };
            let Some(stats) = self.stats.get(entry.feature) else {
                debug!(feature = entry.feature, "no reference stats, skipping");
                continue;
            };

            match entry.group {
                ParameterGroup::Temperature | ParameterGroup::Speed => {
                    self.apply(entry, value, z_score(value, stats), &STEEP, &mut findings, &mut health_index);
                }
                ParameterGroup::Pressure => {
                    self.apply(entry, value, z_score(value, stats), &PRESSURE, &mut findings, &mut health_index);
                }
                ParameterGroup::Flow => {
                    self.apply(entry, value, z_score(value, stats), &FLOW, &mut findings, &mut health_index);
                }
                ParameterGroup::Efficiency => {
                    let z = z_score(value, stats);
                    if self.options.score_efficiency_twice {
                        self.apply(entry, value, z, &EFFICIENCY_GENERIC, &mut findings, &mut health_index);
                    }
                    self.apply(entry, value, z, &EFFICIENCY_DEDICATED, &mut findings, &mut health_index);
                }
                ParameterGroup::Fuel => {
                    let pct = percent_deviation(value, stats.mean);
                    self.apply(entry, value, pct, &FUEL_PERCENT, &mut findings, &mut health_index);
                }
            }
        }

        if !findings.is_empty() {
            debug!(
                findings = findings.len(),
                raw_index = health_index,
                "damage rules fired"
            );
        }

        DamageAssessment {
            findings,
            health_index: verdict::clamp_index(health_index),
            no_data: false,
        }
    }

    fn apply(
        &self,
        entry: &CatalogEntry,
        value: f64,
        deviation: Deviation,
        schedule: &'static [Tier; 3],
        findings: &mut Vec<Finding>,
        health_index: &mut f64,
    ) {
        if let Some(tier) = classify(deviation, schedule) {
            findings.push(Finding {
                feature: entry.feature,
                group: entry.group,
                severity: tier.severity,
                deduction: tier.deduction,
                message: finding_message(entry, value, tier.severity),
            });
            *health_index -= tier.deduction;
        }
    }
}

/// Render the human-readable message for one finding.
///
/// Value formatting follows the channel's natural scale: one decimal for
/// temperatures, pressures, flows and speeds, five for the near-zero
/// efficiency coefficients, three for fuel flow.
fn finding_message(entry: &CatalogEntry, value: f64, severity: Severity) -> String {
    let f = entry.feature;
    match (entry.group, severity) {
        (ParameterGroup::Temperature, Severity::Severe) => {
            format!("{f} abnormal ({value:.1}), possible severe hot-section damage")
        }
        (ParameterGroup::Temperature, Severity::Moderate) => {
            format!("{f} abnormal ({value:.1}), moderate hot-section damage")
        }
        (ParameterGroup::Temperature, Severity::Mild) => {
            format!("{f} off nominal ({value:.1}), slight hot-section anomaly")
        }
        (ParameterGroup::Pressure, Severity::Severe) => {
            format!("{f} abnormal ({value:.1}), possible severe pressure-system damage")
        }
        (ParameterGroup::Pressure, Severity::Moderate) => {
            format!("{f} abnormal ({value:.1}), moderate pressure-system damage")
        }
        (ParameterGroup::Pressure, Severity::Mild) => {
            format!("{f} off nominal ({value:.1}), slight pressure-system anomaly")
        }
        (ParameterGroup::Flow, Severity::Severe) => {
            format!("{f} abnormal ({value:.1}), possible severe flow-path blockage or leak")
        }
        (ParameterGroup::Flow, Severity::Moderate) => {
            format!("{f} abnormal ({value:.1}), moderate flow-path anomaly")
        }
        (ParameterGroup::Flow, Severity::Mild) => {
            format!("{f} off nominal ({value:.1}), slight flow-path anomaly")
        }
        (ParameterGroup::Efficiency, Severity::Severe) => {
            format!("{f} far off nominal ({value:.5}), turbine efficiency sharply degraded")
        }
        (ParameterGroup::Efficiency, Severity::Moderate) => {
            format!("{f} abnormal ({value:.5}), turbine efficiency moderately degraded")
        }
        (ParameterGroup::Efficiency, Severity::Mild) => {
            format!("{f} off nominal ({value:.5}), turbine efficiency slightly degraded")
        }
        (ParameterGroup::Speed, Severity::Severe) => {
            format!("{f} abnormal ({value:.1}), possible severe bearing or rotor wear")
        }
        (ParameterGroup::Speed, Severity::Moderate) => {
            format!("{f} abnormal ({value:.1}), moderate bearing or rotor wear")
        }
        (ParameterGroup::Speed, Severity::Mild) => {
            format!("{f} off nominal ({value:.1}), slight bearing or rotor wear")
        }
        (ParameterGroup::Fuel, Severity::Severe) => {
            format!("fuel flow abnormal ({value:.3}), possible severe combustor damage")
        }
        (ParameterGroup::Fuel, Severity::Moderate) => {
            format!("fuel flow abnormal ({value:.3}), moderate combustor anomaly")
        }
        (ParameterGroup::Fuel, Severity::Mild) => {
            format!("fuel flow elevated ({value:.3}), slight combustor anomaly")
        }
    }
}
