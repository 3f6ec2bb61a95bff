//! Property tests for the fairness statistics engine.

use dice_fairness::{
    chi_squared_goodness_of_fit, compute_side_statistics, is_sample_size_adequate,
    ConfidenceLevel, DieSpec,
};
use proptest::prelude::*;

fn die_strategy() -> impl Strategy<Value = DieSpec> {
    prop::sample::select(vec![
        DieSpec::D4,
        DieSpec::D6,
        DieSpec::D8,
        DieSpec::D10,
        DieSpec::D12,
        DieSpec::D20,
    ])
}

/// A die together with a history of in-range rolls.
fn history_strategy() -> impl Strategy<Value = (DieSpec, Vec<i64>)> {
    die_strategy().prop_flat_map(|die| {
        let faces = 1..=i64::from(die.arity());
        (Just(die), prop::collection::vec(faces, 1..400))
    })
}

/// Rolls that name no face of any die in `die_strategy`.
fn junk_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(prop_oneof![-50i64..=0, 21i64..100], 0..20)
}

proptest! {
    #[test]
    fn observed_probabilities_sum_to_one((die, rolls) in history_strategy()) {
        let stats = compute_side_statistics(&rolls, die, ConfidenceLevel::P95);
        let sum: f64 = stats.iter().map(|s| s.observed_probability).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert_eq!(stats.len(), die.arity() as usize);
    }

    #[test]
    fn empty_history_gives_no_statistics(die in die_strategy(), level in 0.01f64..0.999) {
        let confidence = ConfidenceLevel::new(level).unwrap();
        prop_assert!(compute_side_statistics(&[], die, confidence).is_empty());
        prop_assert!(!is_sample_size_adequate(&[], die));
    }

    #[test]
    fn intervals_stay_in_unit_range(
        (die, rolls) in history_strategy(),
        level in 0.5f64..0.9999,
    ) {
        let confidence = ConfidenceLevel::new(level).unwrap();
        for stat in compute_side_statistics(&rolls, die, confidence) {
            let ci = stat.confidence_interval;
            prop_assert!(0.0 <= ci.lower && ci.lower <= ci.upper && ci.upper <= 1.0);
            prop_assert!(ci.contains(stat.observed_probability));
            prop_assert!((0.0..=1.0).contains(&stat.p_value));
        }
    }

    #[test]
    fn wider_confidence_never_narrows(
        (die, rolls) in history_strategy(),
        low in 0.5f64..0.95,
        gap in 0.001f64..0.049,
    ) {
        let narrow = ConfidenceLevel::new(low).unwrap();
        let wide = ConfidenceLevel::new(low + gap).unwrap();
        prop_assert!(wide.critical_value() > narrow.critical_value());

        let a = compute_side_statistics(&rolls, die, narrow);
        let b = compute_side_statistics(&rolls, die, wide);
        for (n, w) in a.iter().zip(&b) {
            prop_assert!(w.confidence_interval.lower <= n.confidence_interval.lower);
            prop_assert!(w.confidence_interval.upper >= n.confidence_interval.upper);
            prop_assert!(w.margin_of_error >= n.margin_of_error);
        }
    }

    #[test]
    fn side_statistics_are_deterministic((die, rolls) in history_strategy()) {
        let a = compute_side_statistics(&rolls, die, ConfidenceLevel::P90);
        let b = compute_side_statistics(&rolls, die, ConfidenceLevel::P90);
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(x.z_score.to_bits(), y.z_score.to_bits());
            prop_assert_eq!(x.p_value.to_bits(), y.p_value.to_bits());
            prop_assert_eq!(x.margin_of_error.to_bits(), y.margin_of_error.to_bits());
        }
    }

    #[test]
    fn adequacy_follows_expected_frequency_rule((die, rolls) in history_strategy()) {
        let adequate = rolls.len() as f64 / f64::from(die.arity()) >= 5.0;
        prop_assert_eq!(is_sample_size_adequate(&rolls, die), adequate);
    }

    #[test]
    fn out_of_range_rolls_do_not_change_results(
        (die, rolls) in history_strategy(),
        junk in junk_strategy(),
    ) {
        let mut noisy = rolls.clone();
        noisy.extend(junk);

        let clean = chi_squared_goodness_of_fit(&rolls, die).unwrap();
        let with_junk = chi_squared_goodness_of_fit(&noisy, die).unwrap();
        prop_assert_eq!(clean, with_junk);
    }

    #[test]
    fn out_of_range_rolls_do_not_change_side_statistics(
        (die, rolls) in history_strategy(),
        junk in junk_strategy(),
        level in 0.5f64..0.999,
    ) {
        let confidence = ConfidenceLevel::new(level).unwrap();
        let mut noisy = rolls.clone();
        noisy.extend(junk);

        let clean = compute_side_statistics(&rolls, die, confidence);
        let with_junk = compute_side_statistics(&noisy, die, confidence);
        prop_assert_eq!(clean, with_junk);
    }

    #[test]
    fn goodness_of_fit_is_well_formed((die, rolls) in history_strategy()) {
        let gof = chi_squared_goodness_of_fit(&rolls, die).unwrap();
        prop_assert!(gof.chi_squared >= 0.0);
        prop_assert!((0.0..=1.0).contains(&gof.p_value));
        prop_assert_eq!(gof.degrees_of_freedom, die.arity() - 1);
        prop_assert_eq!(gof.total_rolls, rolls.len() as u64);
    }
}
