//! Parameter Group Catalog
//!
//! Static mapping of sensor channels to physical subsystem groups, replacing
//! the string-keyed dictionaries of the original analysis scripts with a
//! strongly typed, load-time-validated table.
//!
//! Two views exist over the channel set:
//!
//! - [`FEATURE_COLUMNS`]: the full 31-channel model input schema, in the
//!   column order the sequence model was trained on.
//! - [`DAMAGE_CATALOG`]: the subset of channels that carry a damage rule,
//!   in the fixed iteration order the rule engine reports findings in
//!   (temperatures, pressures, flows, efficiency coefficients, shaft
//!   speeds, fuel flow). Stall margins (SmFan/SmLPC/SmHPC) and the flow
//!   coefficient (phi) feed the predictor but have no localization rule.

use serde::{Deserialize, Serialize};

/// Number of sensor channels in the model input schema.
pub const NUM_FEATURES: usize = 31;

/// Model input columns, in training order. CSV ingestion requires all of
/// these; the window builder emits them in exactly this order.
pub const FEATURE_COLUMNS: [&str; NUM_FEATURES] = [
    "T24", "T30", "T48", "T50", "P15", "P2", "P21", "P24", "Ps30", "P40", "P50", "Nf", "Nc", "Wf",
    "T40", "P30", "P45", "W21", "W22", "W25", "W31", "W32", "W48", "W50", "SmFan", "SmLPC",
    "SmHPC", "phi", "HPT_eff_mod", "LPT_eff_mod", "LPT_flow_mod",
];

/// Per-cycle metadata columns. Tolerated in input files and ignored by
/// both the window builder and the rule engine.
pub const METADATA_COLUMNS: [&str; 8] = ["unit", "cycle", "hs", "RUL", "alt", "Mach", "TRA", "T2"];

/// Physical subsystem a sensor channel belongs to.
///
/// The group selects both the deduction schedule (temperature and speed use
/// a steeper one) and the subsystem wording of the finding messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterGroup {
    Temperature,
    Pressure,
    Flow,
    Efficiency,
    Speed,
    Fuel,
}

impl ParameterGroup {
    /// Human-readable subsystem label used in finding messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "hot section",
            Self::Pressure => "pressure system",
            Self::Flow => "flow path",
            Self::Efficiency => "turbine efficiency",
            Self::Speed => "bearing/rotor system",
            Self::Fuel => "combustor",
        }
    }
}

impl std::fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Flow => "flow",
            Self::Efficiency => "efficiency",
            Self::Speed => "speed",
            Self::Fuel => "fuel",
        };
        write!(f, "{name}")
    }
}

/// One damage-rule catalog entry: a scored channel and its subsystem group.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub feature: &'static str,
    pub group: ParameterGroup,
}

const fn entry(feature: &'static str, group: ParameterGroup) -> CatalogEntry {
    CatalogEntry { feature, group }
}

/// Channels with a damage-localization rule, in reporting order.
pub const DAMAGE_CATALOG: [CatalogEntry; 27] = [
    // Hot-section temperatures
    entry("T24", ParameterGroup::Temperature),
    entry("T30", ParameterGroup::Temperature),
    entry("T48", ParameterGroup::Temperature),
    entry("T50", ParameterGroup::Temperature),
    entry("T40", ParameterGroup::Temperature),
    // Station pressures
    entry("P15", ParameterGroup::Pressure),
    entry("P2", ParameterGroup::Pressure),
    entry("P21", ParameterGroup::Pressure),
    entry("P24", ParameterGroup::Pressure),
    entry("Ps30", ParameterGroup::Pressure),
    entry("P40", ParameterGroup::Pressure),
    entry("P50", ParameterGroup::Pressure),
    entry("P30", ParameterGroup::Pressure),
    entry("P45", ParameterGroup::Pressure),
    // Mass flows
    entry("W21", ParameterGroup::Flow),
    entry("W22", ParameterGroup::Flow),
    entry("W25", ParameterGroup::Flow),
    entry("W31", ParameterGroup::Flow),
    entry("W32", ParameterGroup::Flow),
    entry("W48", ParameterGroup::Flow),
    entry("W50", ParameterGroup::Flow),
    // Efficiency modifier coefficients
    entry("HPT_eff_mod", ParameterGroup::Efficiency),
    entry("LPT_eff_mod", ParameterGroup::Efficiency),
    entry("LPT_flow_mod", ParameterGroup::Efficiency),
    // Shaft speeds
    entry("Nf", ParameterGroup::Speed),
    entry("Nc", ParameterGroup::Speed),
    // Fuel flow
    entry("Wf", ParameterGroup::Fuel),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_features_are_unique() {
        let names: HashSet<&str> = DAMAGE_CATALOG.iter().map(|e| e.feature).collect();
        assert_eq!(names.len(), DAMAGE_CATALOG.len());
    }

    #[test]
    fn catalog_is_subset_of_feature_columns() {
        for e in &DAMAGE_CATALOG {
            assert!(
                FEATURE_COLUMNS.contains(&e.feature),
                "catalog entry {} not in model schema",
                e.feature
            );
        }
    }

    #[test]
    fn unscored_channels_are_margins_and_phi() {
        let scored: HashSet<&str> = DAMAGE_CATALOG.iter().map(|e| e.feature).collect();
        let unscored: Vec<&str> = FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|c| !scored.contains(c))
            .collect();
        assert_eq!(unscored, vec!["SmFan", "SmLPC", "SmHPC", "phi"]);
    }

    #[test]
    fn group_labels_are_distinct() {
        let labels: HashSet<&str> = [
            ParameterGroup::Temperature,
            ParameterGroup::Pressure,
            ParameterGroup::Flow,
            ParameterGroup::Efficiency,
            ParameterGroup::Speed,
            ParameterGroup::Fuel,
        ]
        .iter()
        .map(|g| g.label())
        .collect();
        assert_eq!(labels.len(), 6);
    }
}
