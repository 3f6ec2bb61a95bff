//! Validated analysis parameters.
//!
//! A die arity and a confidence level are fixed for one analysis.
//! Both are validated on construction so the engine never has to
//! produce NaN or infinite results from a bad argument.

use crate::stats::distribution::normal_quantile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Errors raised when constructing analysis parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    /// Zero faces.
    #[error("die arity must be at least 1")]
    InvalidArity,
    /// Confidence level outside the open interval (0, 1).
    #[error("confidence level {0} must lie strictly between 0 and 1")]
    InvalidConfidenceLevel(f64),
}

/// Number of faces on the die under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DieSpec {
    arity: NonZeroU32,
}

impl DieSpec {
    /// Four-sided die.
    pub const D4: DieSpec = DieSpec::from_const(4);
    /// Standard six-sided die.
    pub const D6: DieSpec = DieSpec::from_const(6);
    /// Eight-sided die.
    pub const D8: DieSpec = DieSpec::from_const(8);
    /// Ten-sided die.
    pub const D10: DieSpec = DieSpec::from_const(10);
    /// Twelve-sided die.
    pub const D12: DieSpec = DieSpec::from_const(12);
    /// Twenty-sided die.
    pub const D20: DieSpec = DieSpec::from_const(20);

    const fn from_const(arity: u32) -> Self {
        match NonZeroU32::new(arity) {
            Some(arity) => Self { arity },
            None => panic!("die arity must be non-zero"),
        }
    }

    /// Creates a die specification, rejecting an arity of zero.
    pub fn new(arity: u32) -> Result<Self, SpecError> {
        NonZeroU32::new(arity)
            .map(|arity| Self { arity })
            .ok_or(SpecError::InvalidArity)
    }

    /// Returns the number of faces.
    #[inline]
    pub fn arity(&self) -> u32 {
        self.arity.get()
    }

    /// Probability of any single face under the fair-die hypothesis.
    #[inline]
    pub fn expected_probability(&self) -> f64 {
        1.0 / self.arity() as f64
    }

    /// Returns true if `roll` names a face of this die.
    #[inline]
    pub fn contains(&self, roll: i64) -> bool {
        roll >= 1 && roll <= self.arity() as i64
    }
}

impl Default for DieSpec {
    fn default() -> Self {
        Self::D6
    }
}

impl TryFrom<u32> for DieSpec {
    type Error = SpecError;

    fn try_from(arity: u32) -> Result<Self, Self::Error> {
        Self::new(arity)
    }
}

impl From<DieSpec> for u32 {
    fn from(die: DieSpec) -> Self {
        die.arity()
    }
}

impl fmt::Display for DieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.arity)
    }
}

/// Two-sided confidence level in the open interval (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// 90% confidence.
    pub const P90: ConfidenceLevel = ConfidenceLevel(0.90);
    /// 95% confidence, the usual default.
    pub const P95: ConfidenceLevel = ConfidenceLevel(0.95);
    /// 99% confidence.
    pub const P99: ConfidenceLevel = ConfidenceLevel(0.99);

    /// Creates a confidence level, rejecting values outside (0, 1).
    pub fn new(level: f64) -> Result<Self, SpecError> {
        if level.is_finite() && level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(SpecError::InvalidConfidenceLevel(level))
        }
    }

    /// Returns the level as a fraction.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Two-tailed critical value z* of the standard normal distribution.
    ///
    /// For 0.95 this is approximately 1.959964.
    pub fn critical_value(&self) -> f64 {
        normal_quantile(1.0 - (1.0 - self.0) / 2.0)
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::P95
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = SpecError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}
