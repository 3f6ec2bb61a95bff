//! Chi-squared goodness-of-fit against a uniform die.

use super::distribution::chi_squared_sf;
use super::StatsError;
use crate::roll::{history, DieSpec};
use serde::{Deserialize, Serialize};

/// Minimum expected count per face for the chi-squared approximation.
pub const MIN_EXPECTED_FREQUENCY: f64 = 5.0;

/// Aggregate test of all faces against the fair-die hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFitResult {
    /// Sum of `(observed - expected)² / expected` over all faces.
    pub chi_squared: f64,
    /// `arity - 1`.
    pub degrees_of_freedom: u32,
    /// Upper-tail probability; small values are evidence against fairness.
    pub p_value: f64,
    /// In-range rolls the test was computed from.
    pub total_rolls: u64,
    /// Expected count per face, `total_rolls / arity`.
    pub expected_frequency: f64,
}

/// Runs the chi-squared goodness-of-fit test.
///
/// Fails with [`StatsError::EmptyHistory`] when no roll is in range.
/// Small samples are not refused; check [`is_sample_size_adequate`]
/// before trusting the p-value.
pub fn chi_squared_goodness_of_fit(
    rolls: &[i64],
    die: DieSpec,
) -> Result<GoodnessOfFitResult, StatsError> {
    let counts = history::tally(rolls, die);
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return Err(StatsError::EmptyHistory);
    }

    let expected = total as f64 / die.arity() as f64;
    let chi_squared: f64 = counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let degrees_of_freedom = die.arity() - 1;

    Ok(GoodnessOfFitResult {
        chi_squared,
        degrees_of_freedom,
        p_value: chi_squared_sf(chi_squared, degrees_of_freedom),
        total_rolls: total,
        expected_frequency: expected,
    })
}

/// Returns true when every face is expected at least
/// [`MIN_EXPECTED_FREQUENCY`] times.
pub fn is_sample_size_adequate(rolls: &[i64], die: DieSpec) -> bool {
    is_adequate_with(rolls, die, MIN_EXPECTED_FREQUENCY)
}

pub(crate) fn is_adequate_with(rolls: &[i64], die: DieSpec, min_expected: f64) -> bool {
    let total = rolls.iter().filter(|&&r| die.contains(r)).count();
    total > 0 && total as f64 / die.arity() as f64 >= min_expected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolls_with_counts(counts: &[u64]) -> Vec<i64> {
        counts
            .iter()
            .zip(1i64..)
            .flat_map(|(&c, side)| std::iter::repeat(side).take(c as usize))
            .collect()
    }

    #[test]
    fn test_uniform_counts() {
        let rolls = rolls_with_counts(&[10; 6]);
        let result = chi_squared_goodness_of_fit(&rolls, DieSpec::D6).unwrap();

        assert_eq!(result.chi_squared, 0.0);
        assert_eq!(result.degrees_of_freedom, 5);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.expected_frequency, 10.0);
    }

    #[test]
    fn test_maximally_skewed() {
        let rolls = rolls_with_counts(&[60, 0, 0, 0, 0, 0]);
        let result = chi_squared_goodness_of_fit(&rolls, DieSpec::D6).unwrap();

        assert!((result.chi_squared - 300.0).abs() < 1e-9);
        assert_eq!(result.degrees_of_freedom, 5);
        assert!(result.p_value < 1e-10);
    }

    #[test]
    fn test_reference_p_value() {
        // Counts 28, 31, 40, 35 on a d4: chi-squared 2.41791, p 0.49031
        let rolls = rolls_with_counts(&[28, 31, 40, 35]);
        let result = chi_squared_goodness_of_fit(&rolls, DieSpec::D4).unwrap();

        assert!((result.chi_squared - 2.417_910_447_761_194).abs() < 1e-9);
        assert!((result.p_value - 0.490_309_306_965_388).abs() < 1e-8);
    }

    #[test]
    fn test_empty_history_is_error() {
        assert!(matches!(
            chi_squared_goodness_of_fit(&[], DieSpec::D6),
            Err(StatsError::EmptyHistory)
        ));
        assert!(matches!(
            chi_squared_goodness_of_fit(&[0, 9], DieSpec::D6),
            Err(StatsError::EmptyHistory)
        ));
    }

    #[test]
    fn test_out_of_range_excluded_from_total() {
        let mut rolls = rolls_with_counts(&[10; 6]);
        rolls.extend([0, 7, -1]);
        let result = chi_squared_goodness_of_fit(&rolls, DieSpec::D6).unwrap();
        assert_eq!(result.total_rolls, 60);
        assert_eq!(result.chi_squared, 0.0);
    }

    #[test]
    fn test_adequacy_threshold() {
        let rolls: Vec<i64> = (0..29).map(|i| i % 6 + 1).collect();
        assert!(!is_sample_size_adequate(&rolls, DieSpec::D6));

        let rolls: Vec<i64> = (0..30).map(|i| i % 6 + 1).collect();
        assert!(is_sample_size_adequate(&rolls, DieSpec::D6));

        assert!(!is_sample_size_adequate(&[], DieSpec::D6));
    }
}
