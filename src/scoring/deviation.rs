//! Deviation scoring for one channel value against its reference stats.
//!
//! Two measures exist: the canonical absolute z-score, and a legacy
//! percentage deviation kept only for the fuel-flow rule, whose tiers were
//! calibrated as percent-of-nominal. Missing or degenerate reference data
//! never fails an evaluation: it yields [`Deviation::Unscored`] and the
//! channel is skipped, so one bad table entry cannot abort the remaining
//! channels.

use crate::reference::FeatureStats;

/// Outcome of scoring a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deviation {
    /// Usable deviation measure (absolute z-score or percent).
    Scored(f64),
    /// Reference data missing or degenerate (std <= 0, nominal == 0).
    Unscored,
}

impl Deviation {
    /// Numeric value, with unscored channels pinned to zero deviation.
    pub fn value(self) -> f64 {
        match self {
            Self::Scored(v) => v,
            Self::Unscored => 0.0,
        }
    }
}

/// Absolute z-score of `value` against the channel's reference stats.
pub fn z_score(value: f64, stats: FeatureStats) -> Deviation {
    if stats.std > 0.0 {
        Deviation::Scored(((value - stats.mean) / stats.std).abs())
    } else {
        Deviation::Unscored
    }
}

/// Absolute percentage deviation of `value` from `nominal`.
pub fn percent_deviation(value: f64, nominal: f64) -> Deviation {
    if nominal == 0.0 {
        Deviation::Unscored
    } else {
        Deviation::Scored(((value - nominal) / nominal).abs() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_score_is_absolute() {
        let stats = FeatureStats {
            mean: 100.0,
            std: 10.0,
        };
        assert_eq!(z_score(120.0, stats), Deviation::Scored(2.0));
        assert_eq!(z_score(80.0, stats), Deviation::Scored(2.0));
    }

    #[test]
    fn zero_or_negative_std_is_unscored() {
        let zero = FeatureStats {
            mean: 100.0,
            std: 0.0,
        };
        let negative = FeatureStats {
            mean: 100.0,
            std: -1.0,
        };
        assert_eq!(z_score(150.0, zero), Deviation::Unscored);
        assert_eq!(z_score(150.0, negative), Deviation::Unscored);
        assert_eq!(z_score(150.0, zero).value(), 0.0);
    }

    #[test]
    fn percent_deviation_from_nominal() {
        assert_eq!(percent_deviation(2.82, 2.35).value().round(), 20.0);
        assert_eq!(percent_deviation(2.35, 2.35), Deviation::Scored(0.0));
        assert_eq!(percent_deviation(1.0, 0.0), Deviation::Unscored);
    }

    #[test]
    fn t24_excursion_scores_around_six_sigma() {
        // T24 = 680 against (563.02, 18.30) is roughly z = 6.4.
        let stats = FeatureStats {
            mean: 563.024_898,
            std: 18.303_730,
        };
        let z = z_score(680.0, stats).value();
        assert!((z - 6.39).abs() < 0.01, "z = {z}");
    }
}
