//! Telemetry snapshot — one raw observation row.
//!
//! A [`Snapshot`] holds the unnormalized values of the most recent cycle,
//! keyed by channel name. It is built fresh per evaluation and read-only
//! afterwards; the rule engine drives iteration from the catalog, so the
//! underlying map needs no ordering of its own.

use std::collections::HashMap;

/// One raw (unnormalized) observation of engine telemetry.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: HashMap<String, f64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (channel, value) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
