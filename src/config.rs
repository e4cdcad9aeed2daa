//! Service configuration.
//!
//! All tunables live in a single TOML file, loaded once at startup into an
//! immutable [`PrognosticsConfig`] that is passed by reference (behind an
//! `Arc`) into the evaluation path — there is no global mutable state.
//!
//! ## Loading order
//!
//! 1. `PROGNOSTICS_CONFIG` environment variable (path to TOML file)
//! 2. `./prognostics.toml` in the current working directory
//! 3. Built-in defaults (matching the values the model was served with)
//!
//! `validate()` runs at startup and fails fast on nonsense values; a bad
//! config is a boot error, never a per-request surprise.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::preprocess::DEFAULT_SEQUENCE_LENGTH;
use crate::scoring::rules::ScoringOptions;
use crate::scoring::DEFAULT_RUL_CEILING;

/// Environment variable naming an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "PROGNOSTICS_CONFIG";

/// Default config file searched in the working directory.
pub const CONFIG_FILE_NAME: &str = "prognostics.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the API server.
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Sequence-model integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Inference endpoint of the external sequence model. When unset, the
    /// predict endpoint answers 503 and only offline scoring is available.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model input window length in cycles.
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,

    /// RUL value that maps to a health index of 100.
    #[serde(default = "default_rul_ceiling")]
    pub rul_ceiling: f64,
}

fn default_sequence_length() -> usize {
    DEFAULT_SEQUENCE_LENGTH
}

fn default_rul_ceiling() -> f64 {
    DEFAULT_RUL_CEILING
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            rul_ceiling: DEFAULT_RUL_CEILING,
        }
    }
}

// ============================================================================
// Top-level config
// ============================================================================

/// Root configuration for a prognostics deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrognosticsConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    /// Damage rule engine tunables.
    #[serde(default)]
    pub scoring: ScoringOptions,

    /// Optional path to an operator-supplied reference statistics TOML;
    /// the built-in training-time table is used when unset.
    #[serde(default)]
    pub reference_stats: Option<PathBuf>,
}

impl PrognosticsConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "loaded config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("loaded config from ./{CONFIG_FILE_NAME}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load ./{CONFIG_FILE_NAME}, using defaults");
                }
            }
        }

        info!("no {CONFIG_FILE_NAME} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Startup sanity checks. A failing config aborts boot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.sequence_length == 0 {
            return Err(ConfigError::Invalid(
                "model.sequence_length must be at least 1".to_string(),
            ));
        }
        if !self.model.rul_ceiling.is_finite() || self.model.rul_ceiling <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "model.rul_ceiling must be a positive finite number, got {}",
                self.model.rul_ceiling
            )));
        }
        if self.scoring.max_reported_findings == 0 {
            return Err(ConfigError::Invalid(
                "scoring.max_reported_findings must be at least 1".to_string(),
            ));
        }
        if self.server.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.addr is not a valid socket address: {}",
                self.server.addr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = PrognosticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.sequence_length, 30);
        assert_eq!(config.model.rul_ceiling, 70.0);
        assert!(config.scoring.score_efficiency_twice);
        assert_eq!(config.scoring.max_reported_findings, 3);
        assert!(config.model.endpoint.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[model]
endpoint = "http://127.0.0.1:5000/predict"
sequence_length = 50

[scoring]
score_efficiency_twice = false
"#
        )
        .unwrap();

        let config = PrognosticsConfig::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.model.endpoint.as_deref(),
            Some("http://127.0.0.1:5000/predict")
        );
        assert_eq!(config.model.sequence_length, 50);
        assert_eq!(config.model.rul_ceiling, 70.0);
        assert!(!config.scoring.score_efficiency_twice);
        assert_eq!(config.server.addr, "0.0.0.0:8080");
    }

    #[test]
    fn zero_sequence_length_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nsequence_length = 0").unwrap();
        let err = PrognosticsConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn non_positive_ceiling_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nrul_ceiling = -1.0").unwrap();
        assert!(PrognosticsConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn bad_addr_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\naddr = \"not-an-addr\"").unwrap();
        assert!(PrognosticsConfig::load_from_file(file.path()).is_err());
    }
}
