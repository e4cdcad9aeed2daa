//! Reference Statistics
//!
//! Immutable per-channel (mean, std) table computed over the healthy-regime
//! portion of the N-CMAPSS training subset (cycles with RUL >= 70). Used for
//! two things:
//!
//! - z-score normalization of the model input window, and
//! - deviation scoring in the damage rule engine.
//!
//! The built-in table ships the training-time values; operators can override
//! it with a TOML file (see [`ReferenceStatistics::from_toml_file`]) when a
//! model is retrained on a different fleet. Validation against the model
//! schema happens once at startup, never per request.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::FEATURE_COLUMNS;

/// Reference mean and standard deviation for one sensor channel.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference statistics file {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse reference statistics file {0}: {1}")]
    Parse(String, #[source] toml::de::Error),

    #[error("reference statistics missing channels: {0:?}")]
    MissingChannels(Vec<String>),
}

/// Immutable (mean, std) table keyed by channel name.
///
/// Constructed once at startup and shared by reference across requests.
#[derive(Debug, Clone)]
pub struct ReferenceStatistics {
    table: HashMap<String, FeatureStats>,
}

/// TOML shape: `[features]` table of `name = { mean = ..., std = ... }`.
#[derive(Debug, Deserialize)]
struct StatsFile {
    features: HashMap<String, FeatureStats>,
}

impl ReferenceStatistics {
    /// Training-time statistics for the 31-channel model schema.
    pub fn builtin() -> Self {
        let entries: [(&str, f64, f64); 31] = [
            ("T24", 563.024_898, 18.303_730),
            ("T30", 1_323.801_706, 55.677_034),
            ("T48", 1_642.810_916, 99.883_238),
            ("T50", 1_113.662_715, 52.041_587),
            ("P15", 11.520_329, 2.299_463),
            ("P2", 8.851_444, 1.916_357),
            ("P21", 11.695_766, 2.334_480),
            ("P24", 14.386_256, 2.775_538),
            ("Ps30", 217.774_155, 45.544_128),
            ("P40", 221.550_853, 46.230_581),
            ("P50", 8.651_160, 2.038_587),
            ("Nf", 1_998.137_013, 142.164_579),
            ("Nc", 8_218.573_059, 184.868_923),
            ("Wf", 2.345_737, 0.584_898),
            ("T40", 2_542.433_162, 144.017_769),
            ("P30", 231.990_422, 48.408_985),
            ("P45", 41.184_797, 8.696_471),
            ("W21", 1_808.173_724, 311.812_302),
            ("W22", 158.947_076, 28.975_486),
            ("W25", 158.946_923, 28.975_412),
            ("W31", 18.284_355, 3.422_720),
            ("W32", 10.970_613, 2.053_632),
            ("W48", 148.620_510, 27.942_588),
            ("W50", 157.362_797, 29.536_117),
            ("SmFan", 19.331_695, 1.428_708),
            ("SmLPC", 8.085_485, 0.917_600),
            ("SmHPC", 28.067_971, 2.070_840),
            ("phi", 38.495_293, 2.295_575),
            ("HPT_eff_mod", -0.003_271, 0.003_450),
            ("LPT_eff_mod", -0.001_792, 0.003_149),
            ("LPT_flow_mod", -0.002_024, 0.003_206),
        ];

        let table = entries
            .iter()
            .map(|&(name, mean, std)| (name.to_string(), FeatureStats { mean, std }))
            .collect();
        Self { table }
    }

    /// Load an operator-supplied statistics table from a TOML file.
    ///
    /// The file must cover every channel in the model schema; a partial
    /// table is a startup error, not something to paper over at runtime.
    pub fn from_toml_file(path: &Path) -> Result<Self, ReferenceError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReferenceError::Io(display.clone(), e))?;
        let parsed: StatsFile =
            toml::from_str(&contents).map_err(|e| ReferenceError::Parse(display, e))?;
        let stats = Self {
            table: parsed.features,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Look up the stats for a channel. `None` for channels outside the
    /// table; callers treat absence as "skip", not as a failure.
    pub fn get(&self, feature: &str) -> Option<FeatureStats> {
        self.table.get(feature).copied()
    }

    /// Fail-fast schema check: every model input channel must have stats.
    ///
    /// Run once at startup so a catalog/statistics mismatch aborts boot
    /// instead of silently skipping channels on every request.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        let missing: Vec<String> = FEATURE_COLUMNS
            .iter()
            .filter(|c| !self.table.contains_key(**c))
            .map(|c| (*c).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReferenceError::MissingChannels(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_covers_model_schema() {
        let stats = ReferenceStatistics::builtin();
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn builtin_lookup_matches_training_values() {
        let stats = ReferenceStatistics::builtin();
        let t24 = stats.get("T24").unwrap();
        assert!((t24.mean - 563.024_898).abs() < 1e-9);
        assert!((t24.std - 18.303_730).abs() < 1e-9);
        assert!(stats.get("no_such_channel").is_none());
    }

    #[test]
    fn partial_toml_table_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[features]\nT24 = {{ mean = 563.0, std = 18.3 }}").unwrap();
        let err = ReferenceStatistics::from_toml_file(file.path()).unwrap_err();
        match err {
            ReferenceError::MissingChannels(missing) => {
                assert_eq!(missing.len(), 30);
                assert!(missing.contains(&"T30".to_string()));
            }
            other => panic!("expected MissingChannels, got {other}"),
        }
    }
}
