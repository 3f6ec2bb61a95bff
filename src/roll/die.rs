//! Simulated dice.
//!
//! A trait-based abstraction over roll sources, with a uniform die and a
//! weighted die for exercising the statistics on known distributions.
//! Both are backed by ChaCha20 so seeded runs are reproducible.

use super::DieSpec;
use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur when building a weighted die.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DieError {
    /// Weight count differs from the arity.
    #[error("expected {expected} weights, got {got}")]
    WeightCount {
        /// Faces on the die.
        expected: usize,
        /// Weights supplied.
        got: usize,
    },
    /// A weight is negative, infinite or NaN.
    #[error("weight {0} is negative or not finite")]
    InvalidWeight(f64),
    /// No face could ever be rolled.
    #[error("at least one weight must be positive")]
    AllZeroWeights,
}

/// Trait for roll sources.
pub trait Die {
    /// Returns the die specification.
    fn spec(&self) -> DieSpec;

    /// Rolls once, returning a face in `1..=arity`.
    fn roll(&mut self) -> u32;

    /// Rolls `count` times.
    fn roll_many(&mut self, count: usize) -> Vec<i64> {
        (0..count).map(|_| i64::from(self.roll())).collect()
    }
}

fn os_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

/// Uniform die.
pub struct FairDie {
    spec: DieSpec,
    rng: ChaCha20Rng,
}

impl FairDie {
    /// Creates a die seeded from the OS entropy source.
    pub fn from_os_entropy(spec: DieSpec) -> Self {
        Self {
            spec,
            rng: ChaCha20Rng::from_seed(os_seed()),
        }
    }

    /// Creates a die with a fixed seed for reproducible sequences.
    pub fn from_seed(spec: DieSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Die for FairDie {
    fn spec(&self) -> DieSpec {
        self.spec
    }

    fn roll(&mut self) -> u32 {
        let bound = self.spec.arity();
        // Rejection zone removes modulo bias.
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.rng.next_u32();
            if value >= threshold {
                return value % bound + 1;
            }
        }
    }
}

impl std::fmt::Debug for FairDie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FairDie").field("spec", &self.spec).finish()
    }
}

/// Die with per-face weights, for simulating a biased die.
pub struct LoadedDie {
    spec: DieSpec,
    cumulative: Vec<f64>,
    rng: ChaCha20Rng,
}

impl LoadedDie {
    /// Creates a loaded die seeded from the OS entropy source.
    pub fn from_os_entropy(spec: DieSpec, weights: &[f64]) -> Result<Self, DieError> {
        Self::build(spec, weights, ChaCha20Rng::from_seed(os_seed()))
    }

    /// Creates a loaded die with a fixed seed.
    pub fn from_seed(spec: DieSpec, weights: &[f64], seed: u64) -> Result<Self, DieError> {
        Self::build(spec, weights, ChaCha20Rng::seed_from_u64(seed))
    }

    fn build(spec: DieSpec, weights: &[f64], rng: ChaCha20Rng) -> Result<Self, DieError> {
        if weights.len() != spec.arity() as usize {
            return Err(DieError::WeightCount {
                expected: spec.arity() as usize,
                got: weights.len(),
            });
        }
        if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(DieError::InvalidWeight(bad));
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(DieError::AllZeroWeights);
        }

        let mut running = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                running += w / total;
                running
            })
            .collect();

        Ok(Self {
            spec,
            cumulative,
            rng,
        })
    }

    /// Uniform draw in [0, 1) with 53 bits of precision.
    fn unit(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl Die for LoadedDie {
    fn spec(&self) -> DieSpec {
        self.spec
    }

    fn roll(&mut self) -> u32 {
        let u = self.unit();
        let face = self
            .cumulative
            .iter()
            .position(|&c| u < c)
            // Rounding can leave the last cumulative value just under 1.0.
            .unwrap_or(self.cumulative.len() - 1);
        face as u32 + 1
    }
}

impl std::fmt::Debug for LoadedDie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedDie")
            .field("spec", &self.spec)
            .field("cumulative", &self.cumulative)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fair_die_in_range() {
        let mut die = FairDie::from_seed(DieSpec::D20, 7);
        for _ in 0..1000 {
            let face = die.roll();
            assert!((1..=20).contains(&face));
        }
    }

    #[test]
    fn test_seeded_die_reproducible() {
        let a = FairDie::from_seed(DieSpec::D6, 42).roll_many(50);
        let b = FairDie::from_seed(DieSpec::D6, 42).roll_many(50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_face_die() {
        let mut die = FairDie::from_seed(DieSpec::new(1).unwrap(), 1);
        assert!(die.roll_many(20).iter().all(|&r| r == 1));
    }

    #[test]
    fn test_loaded_die_only_weighted_face() {
        let mut die =
            LoadedDie::from_seed(DieSpec::D6, &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0], 3).unwrap();
        assert!(die.roll_many(100).iter().all(|&r| r == 6));
    }

    #[test]
    fn test_loaded_die_rejects_bad_weights() {
        assert_eq!(
            LoadedDie::from_seed(DieSpec::D6, &[1.0; 5], 0).unwrap_err(),
            DieError::WeightCount {
                expected: 6,
                got: 5
            }
        );
        assert!(matches!(
            LoadedDie::from_seed(DieSpec::D4, &[1.0, -1.0, 1.0, 1.0], 0),
            Err(DieError::InvalidWeight(_))
        ));
        assert_eq!(
            LoadedDie::from_seed(DieSpec::D4, &[0.0; 4], 0).unwrap_err(),
            DieError::AllZeroWeights
        );
    }
}
