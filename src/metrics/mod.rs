//! Prometheus metrics exporter for fairness monitoring.
//!
//! Exposes the latest fairness report in Prometheus format, optionally
//! over HTTP when the `metrics` feature is enabled.
//!
//! # Metrics Exposed
//!
//! ## Sample Metrics
//! - `dice_fairness_total_rolls` - In-range rolls analysed
//! - `dice_fairness_ignored_rolls` - Recorded entries outside the die's faces
//! - `dice_fairness_sample_adequate` - 1 when the chi-squared test is valid
//!
//! ## Goodness-of-Fit Metrics
//! - `dice_fairness_chi_squared` - Chi-squared statistic
//! - `dice_fairness_gof_p_value` - Upper-tail p-value
//! - `dice_fairness_verdict` - -1 insufficient data, 0 fair, 1 biased
//!
//! ## Per-Side Metrics (label `side`)
//! - `dice_fairness_side_observed_probability`
//! - `dice_fairness_side_p_value`
//!
//! # Example
//!
//! ```
//! use dice_fairness::metrics::{MetricsRegistry, MetricsSnapshot};
//! use dice_fairness::{ConfidenceLevel, DieSpec, FairnessSession};
//!
//! let mut session = FairnessSession::new(DieSpec::D6, ConfidenceLevel::P95);
//! session.record_all((0..60).map(|i| i % 6 + 1));
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&MetricsSnapshot::from_report(&session.report()));
//! assert!(registry.encode().unwrap().contains("dice_fairness_total_rolls 60"));
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot, SideSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
