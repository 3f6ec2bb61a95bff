//! Roll session tracking.
//!
//! Owns the roll history for one die and recomputes the fairness report
//! on demand. Changing the die invalidates the history; changing the
//! confidence level does not.

use crate::roll::{ConfidenceLevel, DieSpec, RollHistory};
use crate::stats::{
    chi_squared_goodness_of_fit, is_adequate_with, FairnessReport, FairnessThresholds, Verdict,
};
use serde::{Deserialize, Serialize};

/// Goodness-of-fit p-value after a given number of recorded rolls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Number of entries recorded when the point was taken.
    pub roll_index: u64,
    /// Goodness-of-fit p-value at that point.
    pub p_value: f64,
}

/// A single die-testing session.
pub struct FairnessSession {
    die: DieSpec,
    confidence: ConfidenceLevel,
    thresholds: FairnessThresholds,
    history: RollHistory,
    /// p-value over time, one point per roll once the sample is adequate.
    trace: Vec<TracePoint>,
    last_verdict: Verdict,
}

impl FairnessSession {
    /// Creates an empty session with default thresholds.
    pub fn new(die: DieSpec, confidence: ConfidenceLevel) -> Self {
        Self::with_thresholds(die, confidence, FairnessThresholds::default())
    }

    /// Creates an empty session with custom thresholds.
    pub fn with_thresholds(
        die: DieSpec,
        confidence: ConfidenceLevel,
        thresholds: FairnessThresholds,
    ) -> Self {
        Self {
            die,
            confidence,
            thresholds,
            history: RollHistory::new(),
            trace: Vec::new(),
            last_verdict: Verdict::InsufficientData,
        }
    }

    /// Records one roll outcome.
    ///
    /// Out-of-range outcomes are kept in the history but ignored by
    /// every statistic.
    pub fn record(&mut self, roll: i64) {
        self.history.push(roll);

        if !self.die.contains(roll) {
            tracing::debug!(roll, die = %self.die, "Ignoring out-of-range roll");
            return;
        }

        let rolls = self.history.as_slice();
        if !is_adequate_with(rolls, self.die, self.thresholds.min_expected_frequency) {
            return;
        }

        if let Ok(gof) = chi_squared_goodness_of_fit(rolls, self.die) {
            self.trace.push(TracePoint {
                roll_index: self.history.len() as u64,
                p_value: gof.p_value,
            });
        }
    }

    /// Records a batch of roll outcomes.
    pub fn record_all(&mut self, rolls: impl IntoIterator<Item = i64>) {
        for roll in rolls {
            self.record(roll);
        }
    }

    /// Changes the confidence level. The history is kept.
    pub fn set_confidence(&mut self, confidence: ConfidenceLevel) {
        self.confidence = confidence;
    }

    /// Switches to a different die, discarding the history.
    pub fn set_die(&mut self, die: DieSpec) {
        if die != self.die {
            tracing::info!(from = %self.die, to = %die, "Die changed, history reset");
        }
        self.die = die;
        self.reset();
    }

    /// Discards the history and p-value trace.
    pub fn reset(&mut self) {
        self.history.clear();
        self.trace.clear();
        self.last_verdict = Verdict::InsufficientData;
        tracing::info!("Fairness session reset");
    }

    /// Computes a fresh report from the full history.
    ///
    /// Logs when the verdict changes kind since the previous report.
    pub fn report(&mut self) -> FairnessReport {
        let report =
            FairnessReport::analyze(&self.history, self.die, self.confidence, &self.thresholds);

        if !report.verdict.same_kind(&self.last_verdict) {
            match report.verdict {
                Verdict::Biased { p_value } => tracing::warn!(
                    die = %self.die,
                    rolls = report.total_rolls,
                    p_value,
                    "Die now looks biased"
                ),
                Verdict::Fair { p_value } => tracing::info!(
                    die = %self.die,
                    rolls = report.total_rolls,
                    p_value,
                    "Die looks fair"
                ),
                Verdict::InsufficientData => {}
            }
        }
        self.last_verdict = report.verdict;

        report
    }

    /// Returns the die being tested.
    pub fn die(&self) -> DieSpec {
        self.die
    }

    /// Returns the current confidence level.
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }

    /// Returns the thresholds in use.
    pub fn thresholds(&self) -> &FairnessThresholds {
        &self.thresholds
    }

    /// Returns the recorded history.
    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Returns the p-value trace.
    pub fn p_value_trace(&self) -> &[TracePoint] {
        &self.trace
    }
}

impl Default for FairnessSession {
    fn default() -> Self {
        Self::new(DieSpec::default(), ConfidenceLevel::default())
    }
}
