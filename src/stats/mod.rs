//! Fairness statistics engine.
//!
//! Pure functions over an immutable slice of roll outcomes. Nothing
//! here holds state between calls: every result is recomputed from the
//! full history, so identical inputs always give identical outputs.
//!
//! Two families of tests are provided and surfaced separately:
//!
//! - per-side one-sample proportion z-tests with confidence intervals
//!   ([`compute_side_statistics`]),
//! - an aggregate chi-squared goodness-of-fit test
//!   ([`chi_squared_goodness_of_fit`]), valid only once
//!   [`is_sample_size_adequate`] holds.

pub mod distribution;
mod goodness;
mod report;
mod side;
mod threshold;

pub use goodness::{
    chi_squared_goodness_of_fit, is_sample_size_adequate, GoodnessOfFitResult,
    MIN_EXPECTED_FREQUENCY,
};
pub(crate) use goodness::is_adequate_with;
pub use report::{FairnessReport, Verdict};
pub use side::{compute_side_statistics, ConfidenceInterval, SideStatistic};
pub use threshold::{FairnessThresholds, ThresholdError};

use crate::roll::{ConfidenceLevel, DieSpec, SpecError};
use thiserror::Error;

/// Errors reported by the statistics engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Invalid arity or confidence level.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// No roll in the history names a face of the die.
    #[error("roll history contains no in-range rolls")]
    EmptyHistory,
}

/// Validates raw arguments and computes per-side statistics.
pub fn side_statistics(
    rolls: &[i64],
    arity: u32,
    confidence_level: f64,
) -> Result<Vec<SideStatistic>, StatsError> {
    let die = DieSpec::new(arity)?;
    let confidence = ConfidenceLevel::new(confidence_level)?;
    Ok(compute_side_statistics(rolls, die, confidence))
}

/// Validates the arity and runs the goodness-of-fit test.
pub fn goodness_of_fit(rolls: &[i64], arity: u32) -> Result<GoodnessOfFitResult, StatsError> {
    chi_squared_goodness_of_fit(rolls, DieSpec::new(arity)?)
}

/// Validates the arity and checks sample-size adequacy.
pub fn sample_size_adequate(rolls: &[i64], arity: u32) -> Result<bool, StatsError> {
    Ok(is_sample_size_adequate(rolls, DieSpec::new(arity)?))
}
