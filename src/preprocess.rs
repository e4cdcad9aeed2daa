//! Telemetry CSV ingestion and model window preparation.
//!
//! Parses per-cycle engine telemetry from headered CSV (the N-CMAPSS export
//! format), keeps the raw last row as a [`Snapshot`] for damage scoring, and
//! builds the z-normalized, fixed-length [`SensorWindow`] the sequence model
//! consumes. Both views come from the same source record so threshold
//! comparisons run against physical values while the predictor sees
//! normalized inputs.
//!
//! All 31 model feature columns are required; the per-cycle metadata columns
//! (unit, cycle, hs, RUL, alt, Mach, TRA, T2) are tolerated and ignored.
//! Series shorter than the window length are front-padded by repeating the
//! last available row, matching the behavior the model was served with.

use std::io::BufRead;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{FEATURE_COLUMNS, NUM_FEATURES};
use crate::reference::ReferenceStatistics;
use crate::snapshot::Snapshot;

/// Default model window length, matching the trained sequence model.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 30;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("failed to read telemetry file {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("telemetry file has no header row")]
    MissingHeader,

    #[error("telemetry file missing required feature columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("telemetry file contains no data rows")]
    Empty,

    #[error("non-numeric value {value:?} in column {column} on line {line}")]
    BadNumber {
        line: usize,
        column: String,
        value: String,
    },
}

/// Parsed telemetry series for one engine unit.
///
/// Rows hold only the 31 model feature columns, reordered into
/// [`FEATURE_COLUMNS`] order regardless of their order in the file.
#[derive(Debug, Clone)]
pub struct TelemetrySeries {
    rows: Vec<[f64; NUM_FEATURES]>,
}

/// Fixed-length, z-normalized model input window (`sequence_length` rows of
/// [`NUM_FEATURES`] columns).
#[derive(Debug, Clone)]
pub struct SensorWindow {
    pub rows: Vec<[f64; NUM_FEATURES]>,
}

impl SensorWindow {
    pub fn sequence_length(&self) -> usize {
        self.rows.len()
    }
}

impl TelemetrySeries {
    /// Load a telemetry CSV from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, PreprocessError> {
        let display = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| PreprocessError::Io(display, e))?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Parse a telemetry CSV from any buffered reader (file or request body).
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self, PreprocessError> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line.map_err(|e| PreprocessError::Io("<reader>".to_string(), e))?,
            None => return Err(PreprocessError::MissingHeader),
        };
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        // Map each model feature to its position in this file.
        let mut positions = [usize::MAX; NUM_FEATURES];
        let mut missing = Vec::new();
        for (i, feature) in FEATURE_COLUMNS.iter().enumerate() {
            match columns.iter().position(|c| c == feature) {
                Some(pos) => positions[i] = pos,
                None => missing.push((*feature).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(PreprocessError::MissingColumns(missing));
        }

        let mut rows = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line.map_err(|e| PreprocessError::Io("<reader>".to_string(), e))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let mut row = [0.0_f64; NUM_FEATURES];
            for (i, &pos) in positions.iter().enumerate() {
                let raw = fields.get(pos).copied().unwrap_or("");
                row[i] = raw.parse::<f64>().map_err(|_| PreprocessError::BadNumber {
                    // +2: one for the header, one for 1-based numbering
                    line: idx + 2,
                    column: FEATURE_COLUMNS[i].to_string(),
                    value: raw.to_string(),
                })?;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(PreprocessError::Empty);
        }
        debug!(rows = rows.len(), "parsed telemetry series");
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw (unnormalized) last observation, for damage scoring.
    pub fn latest_snapshot(&self) -> Snapshot {
        match self.rows.last() {
            Some(row) => Snapshot::from_pairs(
                FEATURE_COLUMNS
                    .iter()
                    .zip(row.iter())
                    .map(|(name, v)| ((*name).to_string(), *v)),
            ),
            None => Snapshot::new(),
        }
    }

    /// Build the z-normalized model input window from the last
    /// `sequence_length` rows.
    ///
    /// Shorter series are front-padded with copies of the last row so the
    /// most recent data stays at the end of the window. Channels whose
    /// reference std is non-positive are passed through unnormalized.
    pub fn model_window(
        &self,
        stats: &ReferenceStatistics,
        sequence_length: usize,
    ) -> Result<SensorWindow, PreprocessError> {
        if self.rows.is_empty() {
            return Err(PreprocessError::Empty);
        }

        let mut window: Vec<[f64; NUM_FEATURES]> = if self.rows.len() >= sequence_length {
            self.rows[self.rows.len() - sequence_length..].to_vec()
        } else {
            let padding = sequence_length - self.rows.len();
            debug!(
                have = self.rows.len(),
                need = sequence_length,
                padding,
                "telemetry shorter than window, front-padding with last row"
            );
            // Last row exists: is_empty() was checked above.
            let last = self.rows[self.rows.len() - 1];
            let mut padded = vec![last; padding];
            padded.extend_from_slice(&self.rows);
            padded
        };

        for (i, feature) in FEATURE_COLUMNS.iter().enumerate() {
            match stats.get(feature) {
                Some(s) if s.std > 0.0 => {
                    for row in &mut window {
                        row[i] = (row[i] - s.mean) / s.std;
                    }
                }
                _ => warn!(feature, "no usable reference std, channel left unnormalized"),
            }
        }

        Ok(SensorWindow { rows: window })
    }
}
