//! Dice Fairness Library
//!
//! Statistics for deciding whether a die is fair from a history of
//! rolls. Computes, for every face, the observed probability with a
//! confidence interval and a one-sample proportion z-test against
//! `1 / arity`, and across all faces a chi-squared goodness-of-fit test.
//!
//! # Architecture
//!
//! ```text
//! roll (history, die, confidence) → stats (engine) → report
//!                                        ↑               ↓
//!                                     session        metrics
//! ```
//!
//! # Design Principles
//!
//! - **Pure engine**: every statistic is recomputed from the full history
//! - **Lenient input**: rolls outside the die's faces are ignored, not rejected
//! - **Validated parameters**: a zero arity or a confidence level outside
//!   (0, 1) is an error, never a NaN
//! - **Two tests, kept apart**: per-side z-tests are approximate and may
//!   disagree with the joint chi-squared test; both are reported
//!
//! # Example
//!
//! ```
//! use dice_fairness::{
//!     chi_squared_goodness_of_fit, compute_side_statistics, is_sample_size_adequate,
//!     ConfidenceLevel, DieSpec,
//! };
//!
//! let rolls: Vec<i64> = (0..60).map(|i| i % 6 + 1).collect();
//!
//! let sides = compute_side_statistics(&rolls, DieSpec::D6, ConfidenceLevel::P95);
//! assert_eq!(sides.len(), 6);
//!
//! if is_sample_size_adequate(&rolls, DieSpec::D6) {
//!     let gof = chi_squared_goodness_of_fit(&rolls, DieSpec::D6).unwrap();
//!     assert_eq!(gof.degrees_of_freedom, 5);
//!     assert_eq!(gof.p_value, 1.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod roll;
pub mod session;
pub mod stats;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig, OutputFormat};
pub use roll::{ConfidenceLevel, Die, DieSpec, FairDie, LoadedDie, RollHistory};
pub use session::{FairnessSession, TracePoint};
pub use stats::{
    chi_squared_goodness_of_fit, compute_side_statistics, is_sample_size_adequate,
    FairnessReport, FairnessThresholds, GoodnessOfFitResult, SideStatistic, StatsError, Verdict,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
