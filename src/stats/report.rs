//! Combined fairness report.
//!
//! Bundles the per-side statistics and the aggregate goodness-of-fit
//! result for one history. The two tests can disagree; both are kept
//! and the verdict is drawn from the aggregate test alone.

use super::goodness::{chi_squared_goodness_of_fit, is_adequate_with, GoodnessOfFitResult};
use super::side::{compute_side_statistics, SideStatistic};
use super::threshold::FairnessThresholds;
use crate::roll::{ConfidenceLevel, DieSpec, RollHistory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the aggregate fairness test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Too few rolls for the chi-squared test to be meaningful.
    InsufficientData,
    /// No significant evidence against fairness.
    Fair {
        /// Goodness-of-fit p-value.
        p_value: f64,
    },
    /// Significant evidence against fairness.
    Biased {
        /// Goodness-of-fit p-value.
        p_value: f64,
    },
}

impl Verdict {
    /// Returns true for [`Verdict::Biased`].
    pub fn is_biased(&self) -> bool {
        matches!(self, Verdict::Biased { .. })
    }

    /// Numeric code used by exporters: -1 insufficient, 0 fair, 1 biased.
    pub fn code(&self) -> i64 {
        match self {
            Verdict::InsufficientData => -1,
            Verdict::Fair { .. } => 0,
            Verdict::Biased { .. } => 1,
        }
    }

    /// Same outcome, ignoring the p-value.
    pub fn same_kind(&self, other: &Verdict) -> bool {
        self.code() == other.code()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::InsufficientData => write!(f, "insufficient data"),
            Verdict::Fair { p_value } => write!(f, "fair (p = {:.4})", p_value),
            Verdict::Biased { p_value } => write!(f, "biased (p = {:.4})", p_value),
        }
    }
}

/// Everything known about one roll history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// Die the rolls were checked against.
    pub die: DieSpec,
    /// Level used for the per-side intervals.
    pub confidence_level: ConfidenceLevel,
    /// In-range rolls used by the statistics.
    pub total_rolls: u64,
    /// Recorded entries that did not name a face.
    pub ignored_rolls: u64,
    /// One entry per face, in face order.
    pub sides: Vec<SideStatistic>,
    /// At least the minimum expected count per face.
    pub sample_adequate: bool,
    /// Present only when the sample is adequate.
    pub goodness_of_fit: Option<GoodnessOfFitResult>,
    /// Faces whose individual z-test is significant.
    pub flagged_sides: Vec<u32>,
    /// Outcome of the aggregate test.
    pub verdict: Verdict,
}

impl FairnessReport {
    /// Recomputes every statistic from the full history.
    pub fn analyze(
        history: &RollHistory,
        die: DieSpec,
        confidence: ConfidenceLevel,
        thresholds: &FairnessThresholds,
    ) -> Self {
        let rolls = history.as_slice();
        let total_rolls = history.in_range_total(die);
        let sides = compute_side_statistics(rolls, die, confidence);
        let sample_adequate = is_adequate_with(rolls, die, thresholds.min_expected_frequency);

        let goodness_of_fit = if sample_adequate {
            chi_squared_goodness_of_fit(rolls, die).ok()
        } else {
            None
        };

        let verdict = match &goodness_of_fit {
            None => Verdict::InsufficientData,
            Some(gof) if thresholds.is_significant(gof.p_value) => Verdict::Biased {
                p_value: gof.p_value,
            },
            Some(gof) => Verdict::Fair {
                p_value: gof.p_value,
            },
        };

        let flagged_sides = sides
            .iter()
            .filter(|s| thresholds.is_significant(s.p_value))
            .map(|s| s.side)
            .collect();

        tracing::trace!(
            die = %die,
            total = total_rolls,
            adequate = sample_adequate,
            verdict = %verdict,
            "Fairness report computed"
        );

        Self {
            die,
            confidence_level: confidence,
            total_rolls,
            ignored_rolls: history.len() as u64 - total_rolls,
            sides,
            sample_adequate,
            goodness_of_fit,
            flagged_sides,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with_counts(counts: &[u64]) -> RollHistory {
        counts
            .iter()
            .zip(1i64..)
            .flat_map(|(&c, side)| std::iter::repeat(side).take(c as usize))
            .collect()
    }

    #[test]
    fn test_small_sample_insufficient() {
        let history = history_with_counts(&[2, 1, 0, 3, 1, 2]);
        let report = FairnessReport::analyze(
            &history,
            DieSpec::D6,
            ConfidenceLevel::P95,
            &FairnessThresholds::default(),
        );

        assert!(!report.sample_adequate);
        assert!(report.goodness_of_fit.is_none());
        assert_eq!(report.verdict, Verdict::InsufficientData);
        assert_eq!(report.sides.len(), 6);
    }

    #[test]
    fn test_uniform_is_fair() {
        let history = history_with_counts(&[10; 6]);
        let report = FairnessReport::analyze(
            &history,
            DieSpec::D6,
            ConfidenceLevel::P95,
            &FairnessThresholds::default(),
        );

        assert_eq!(report.verdict, Verdict::Fair { p_value: 1.0 });
        assert!(report.flagged_sides.is_empty());
    }

    #[test]
    fn test_skewed_is_biased() {
        let history = history_with_counts(&[60, 0, 0, 0, 0, 0]);
        let report = FairnessReport::analyze(
            &history,
            DieSpec::D6,
            ConfidenceLevel::P95,
            &FairnessThresholds::default(),
        );

        assert!(report.verdict.is_biased());
        assert_eq!(report.flagged_sides, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_ignored_rolls_counted() {
        let mut history = history_with_counts(&[5; 6]);
        history.extend([0, 42]);
        let report = FairnessReport::analyze(
            &history,
            DieSpec::D6,
            ConfidenceLevel::P95,
            &FairnessThresholds::default(),
        );

        assert_eq!(report.total_rolls, 30);
        assert_eq!(report.ignored_rolls, 2);
        assert!(report.sample_adequate);
    }

    #[test]
    fn test_verdict_serializes_with_status() {
        let json = serde_json::to_string(&Verdict::Biased { p_value: 0.01 }).unwrap();
        assert!(json.contains("\"status\":\"biased\""));
        assert_eq!(Verdict::InsufficientData.code(), -1);
    }
}
