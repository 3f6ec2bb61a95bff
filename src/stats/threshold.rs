//! Decision thresholds for the fairness verdict.
//!
//! The engine itself only produces p-values. Turning them into a
//! "fair" or "biased" call is a policy that lives here.

use super::goodness::MIN_EXPECTED_FREQUENCY;
use serde::{Deserialize, Serialize};

/// Thresholds applied when summarising statistics into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessThresholds {
    /// p-values below this level count as evidence of bias.
    pub significance_level: f64,
    /// Minimum expected count per face before the chi-squared test is trusted.
    pub min_expected_frequency: f64,
}

impl Default for FairnessThresholds {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_expected_frequency: MIN_EXPECTED_FREQUENCY,
        }
    }
}

impl FairnessThresholds {
    /// Stricter significance level, fewer false alarms.
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// Looser significance level (for quick screening).
    pub fn lenient() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Validates the threshold values.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let alpha = self.significance_level;
        if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
            return Err(ThresholdError::InvalidSignificance(alpha));
        }

        let min = self.min_expected_frequency;
        if !(min.is_finite() && min > 0.0) {
            return Err(ThresholdError::InvalidMinExpected(min));
        }

        Ok(())
    }

    /// Returns true if `p_value` is significant at this level.
    #[inline]
    pub fn is_significant(&self, p_value: f64) -> bool {
        p_value < self.significance_level
    }
}

/// Threshold validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    /// Significance level outside (0, 1).
    #[error("significance level {0} must lie strictly between 0 and 1")]
    InvalidSignificance(f64),

    /// Non-positive or non-finite minimum expected count.
    #[error("minimum expected frequency {0} must be positive")]
    InvalidMinExpected(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_valid() {
        assert!(FairnessThresholds::default().validate().is_ok());
        assert!(FairnessThresholds::strict().validate().is_ok());
        assert!(FairnessThresholds::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_significance() {
        let thresholds = FairnessThresholds {
            significance_level: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            thresholds.validate(),
            Err(ThresholdError::InvalidSignificance(_))
        ));
    }

    #[test]
    fn test_invalid_min_expected() {
        let thresholds = FairnessThresholds {
            min_expected_frequency: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            thresholds.validate(),
            Err(ThresholdError::InvalidMinExpected(_))
        ));
    }

    #[test]
    fn test_significance_is_strict() {
        let thresholds = FairnessThresholds::default();
        assert!(thresholds.is_significant(0.049));
        assert!(!thresholds.is_significant(0.05));
    }
}
