//! Metrics collection and registry.

use crate::stats::FairnessReport;
use prometheus::{Encoder, Gauge, GaugeVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Per-face values exported with a `side` label.
#[derive(Debug, Clone, Default)]
pub struct SideSnapshot {
    /// Face value, 1-based.
    pub side: u32,
    /// Observed probability of the face.
    pub observed_probability: f64,
    /// Two-tailed p-value of the face z-test.
    pub p_value: f64,
}

/// A snapshot of a fairness report for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// In-range rolls analysed.
    pub total_rolls: u64,
    /// Entries ignored as out of range.
    pub ignored_rolls: u64,
    /// Whether the chi-squared test is valid for this sample.
    pub sample_adequate: bool,
    /// Chi-squared statistic, when adequate.
    pub chi_squared: Option<f64>,
    /// Goodness-of-fit p-value, when adequate.
    pub gof_p_value: Option<f64>,
    /// Verdict code: -1 insufficient data, 0 fair, 1 biased.
    pub verdict: i64,
    /// Per-face values.
    pub sides: Vec<SideSnapshot>,
}

impl MetricsSnapshot {
    /// Creates a snapshot from a fairness report.
    pub fn from_report(report: &FairnessReport) -> Self {
        let (chi_squared, gof_p_value) = report
            .goodness_of_fit
            .as_ref()
            .map(|g| (Some(g.chi_squared), Some(g.p_value)))
            .unwrap_or((None, None));

        Self {
            total_rolls: report.total_rolls,
            ignored_rolls: report.ignored_rolls,
            sample_adequate: report.sample_adequate,
            chi_squared,
            gof_p_value,
            verdict: report.verdict.code(),
            sides: report
                .sides
                .iter()
                .map(|s| SideSnapshot {
                    side: s.side,
                    observed_probability: s.observed_probability,
                    p_value: s.p_value,
                })
                .collect(),
        }
    }
}

/// Prometheus metrics registry for fairness monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Sample metrics
    total_rolls: IntGauge,
    ignored_rolls: IntGauge,
    sample_adequate: IntGauge,

    // Goodness-of-fit metrics
    chi_squared: Gauge,
    gof_p_value: Gauge,
    verdict: IntGauge,

    // Per-side metrics
    side_observed: GaugeVec,
    side_p_value: GaugeVec,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all fairness metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let total_rolls = IntGauge::new(
            "dice_fairness_total_rolls",
            "Number of in-range rolls analysed",
        )?;
        let ignored_rolls = IntGauge::new(
            "dice_fairness_ignored_rolls",
            "Number of recorded entries outside the die's faces",
        )?;
        let sample_adequate = IntGauge::new(
            "dice_fairness_sample_adequate",
            "Whether the sample supports the chi-squared test (1=yes, 0=no)",
        )?;

        let chi_squared = Gauge::new(
            "dice_fairness_chi_squared",
            "Chi-squared goodness-of-fit statistic",
        )?;
        let gof_p_value = Gauge::new(
            "dice_fairness_gof_p_value",
            "Upper-tail p-value of the goodness-of-fit test",
        )?;
        let verdict = IntGauge::new(
            "dice_fairness_verdict",
            "Fairness verdict (-1=insufficient data, 0=fair, 1=biased)",
        )?;

        let side_observed = GaugeVec::new(
            Opts::new(
                "dice_fairness_side_observed_probability",
                "Observed probability of each face",
            ),
            &["side"],
        )?;
        let side_p_value = GaugeVec::new(
            Opts::new(
                "dice_fairness_side_p_value",
                "Two-tailed z-test p-value of each face",
            ),
            &["side"],
        )?;

        registry.register(Box::new(total_rolls.clone()))?;
        registry.register(Box::new(ignored_rolls.clone()))?;
        registry.register(Box::new(sample_adequate.clone()))?;
        registry.register(Box::new(chi_squared.clone()))?;
        registry.register(Box::new(gof_p_value.clone()))?;
        registry.register(Box::new(verdict.clone()))?;
        registry.register(Box::new(side_observed.clone()))?;
        registry.register(Box::new(side_p_value.clone()))?;

        Ok(Self {
            registry,
            total_rolls,
            ignored_rolls,
            sample_adequate,
            chi_squared,
            gof_p_value,
            verdict,
            side_observed,
            side_p_value,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.total_rolls.set(snapshot.total_rolls as i64);
        self.ignored_rolls.set(snapshot.ignored_rolls as i64);
        self.sample_adequate
            .set(if snapshot.sample_adequate { 1 } else { 0 });
        self.verdict.set(snapshot.verdict);

        // Only meaningful once the sample is adequate
        if let Some(chi) = snapshot.chi_squared {
            self.chi_squared.set(chi);
        }
        if let Some(p) = snapshot.gof_p_value {
            self.gof_p_value.set(p);
        }

        // Drop labels from a previous die with more faces
        self.side_observed.reset();
        self.side_p_value.reset();
        for side in &snapshot.sides {
            let label = side.side.to_string();
            self.side_observed
                .with_label_values(&[label.as_str()])
                .set(side.observed_probability);
            self.side_p_value
                .with_label_values(&[label.as_str()])
                .set(side.p_value);
        }
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
