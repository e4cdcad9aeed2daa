//! RUL-based health index.
//!
//! Maps the sequence model's raw RUL prediction onto a 0-100 health index,
//! independently of the rule engine. The ceiling is the maximum-RUL regime
//! of the training subset (the reference statistics were computed over
//! cycles with RUL >= 70), so a prediction at or above the ceiling reads as
//! full health.

use thiserror::Error;

/// Maximum-RUL regime of the training data, in cycles. Configuration
/// constant, overridable via `[model] rul_ceiling` in the config file.
pub const DEFAULT_RUL_CEILING: f64 = 70.0;

#[derive(Debug, Error)]
pub enum RulScaleError {
    #[error("predicted RUL is not a finite number: {0}")]
    NonFinitePrediction(f64),

    #[error("RUL ceiling must be a positive finite number, got {0}")]
    InvalidCeiling(f64),
}

/// Scale a predicted RUL into an integer health index in [0, 100].
///
/// `clamp(predicted_rul / ceiling * 100, 0, 100)`, truncated toward zero.
/// Structurally invalid inputs (non-finite prediction, non-positive
/// ceiling) are caller-visible failures; no coercion is attempted.
pub fn health_from_rul(predicted_rul: f64, ceiling: f64) -> Result<u8, RulScaleError> {
    if !predicted_rul.is_finite() {
        return Err(RulScaleError::NonFinitePrediction(predicted_rul));
    }
    if !ceiling.is_finite() || ceiling <= 0.0 {
        return Err(RulScaleError::InvalidCeiling(ceiling));
    }

    let scaled = (predicted_rul / ceiling * 100.0).clamp(0.0, 100.0);
    // Truncation (not rounding) matches the integer cast the index was
    // always reported with.
    Ok(scaled.trunc() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_scales_linearly() {
        assert_eq!(health_from_rul(35.0, 70.0).unwrap(), 50);
    }

    #[test]
    fn above_ceiling_clamps_to_100() {
        assert_eq!(health_from_rul(140.0, 70.0).unwrap(), 100);
        assert_eq!(health_from_rul(70.0, 70.0).unwrap(), 100);
    }

    #[test]
    fn negative_prediction_clamps_to_zero() {
        assert_eq!(health_from_rul(-5.0, 70.0).unwrap(), 0);
    }

    #[test]
    fn fractional_index_truncates() {
        // 48.9 / 70 * 100 = 69.857... -> 69, not 70.
        assert_eq!(health_from_rul(48.9, 70.0).unwrap(), 69);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        assert!(matches!(
            health_from_rul(f64::NAN, 70.0),
            Err(RulScaleError::NonFinitePrediction(_))
        ));
        assert!(matches!(
            health_from_rul(f64::INFINITY, 70.0),
            Err(RulScaleError::NonFinitePrediction(_))
        ));
        assert!(matches!(
            health_from_rul(35.0, 0.0),
            Err(RulScaleError::InvalidCeiling(_))
        ));
        assert!(matches!(
            health_from_rul(35.0, -70.0),
            Err(RulScaleError::InvalidCeiling(_))
        ));
    }
}
