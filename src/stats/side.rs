//! Per-side estimation and one-sample proportion z-tests.
//!
//! Each face's indicator is tested on its own against the fair-die
//! probability `1 / arity`. Face counts are not independent of each
//! other, so these tests are approximate; the joint test across all
//! faces is the chi-squared goodness-of-fit in [`super::goodness`].

use super::distribution::two_tailed_p_value;
use crate::roll::{history, ConfidenceLevel, DieSpec};
use serde::{Deserialize, Serialize};

/// Two-sided confidence interval for a probability, clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound, never below 0.
    pub lower: f64,
    /// Upper bound, never above 1.
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Interval `estimate ± margin`, clamped to the unit range.
    pub fn clamped(estimate: f64, margin: f64) -> Self {
        Self {
            lower: (estimate - margin).max(0.0),
            upper: (estimate + margin).min(1.0),
        }
    }

    /// Width of the interval after clamping.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns true if `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Descriptive and inferential statistics for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideStatistic {
    /// Face value, 1-based.
    pub side: u32,
    /// Number of rolls showing this face.
    pub count: u64,
    /// `count / n` over in-range rolls.
    pub observed_probability: f64,
    /// Always `1 / arity`.
    pub expected_probability: f64,
    /// Bernoulli variance `p(1 - p)` at the observed probability.
    pub variance: f64,
    /// Square root of `variance`.
    pub standard_deviation: f64,
    /// `sqrt(variance / n)`.
    pub standard_error: f64,
    /// Critical value times `standard_error`.
    pub margin_of_error: f64,
    /// Observed probability ± margin, clamped to [0, 1].
    pub confidence_interval: ConfidenceInterval,
    /// Standardized difference between observed and expected probability.
    pub z_score: f64,
    /// Two-tailed p-value of `z_score`.
    pub p_value: f64,
}

/// Computes statistics for every face of `die`, in face order.
///
/// Rolls outside `1..=arity` are ignored and do not count towards the
/// total. Returns an empty vector when no roll is in range.
pub fn compute_side_statistics(
    rolls: &[i64],
    die: DieSpec,
    confidence: ConfidenceLevel,
) -> Vec<SideStatistic> {
    let counts = history::tally(rolls, die);
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let n = total as f64;
    let expected = die.expected_probability();
    let null_se = (expected * (1.0 - expected) / n).sqrt();
    let critical = confidence.critical_value();

    counts
        .iter()
        .zip(1u32..)
        .map(|(&count, side)| {
            let observed = count as f64 / n;
            let variance = observed * (1.0 - observed);
            let standard_error = (variance / n).sqrt();
            let margin_of_error = critical * standard_error;

            // A one-sided die has zero null variance and cannot deviate.
            let z_score = if null_se > 0.0 {
                (observed - expected) / null_se
            } else {
                0.0
            };

            SideStatistic {
                side,
                count,
                observed_probability: observed,
                expected_probability: expected,
                variance,
                standard_deviation: variance.sqrt(),
                standard_error,
                margin_of_error,
                confidence_interval: ConfidenceInterval::clamped(observed, margin_of_error),
                z_score,
                p_value: two_tailed_p_value(z_score),
            }
        })
        .collect()
}
