// Configuration for baseline regression detection
//
// Two-stage classification: a relative-change threshold decides the status,
// a z-test against the baseline spread decides whether a regression is
// statistically significant.

use crate::record::Metric;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for regression detection against a rolling baseline
///
/// # Example
/// ```
/// use benchgate::regression::RegressionConfig;
///
/// let config = RegressionConfig::default();
/// assert_eq!(config.regression_threshold, 0.15); // 15% change
/// assert_eq!(config.retention_days, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Minimum relative change (as a fraction) that leaves the "stable" band
    ///
    /// - 0.15 (default): a drop of more than 15% is a regression, a gain of
    ///   more than 15% an improvement
    /// - Values exactly on the boundary are stable
    pub regression_threshold: f64,

    /// Number of most recent days of history that contribute to baselines
    ///
    /// Default: 30 days
    pub retention_days: u32,

    /// Critical z-value for the significance test
    ///
    /// A regression is significant when |current - median| / stddev exceeds
    /// this value.
    ///
    /// - 1.96 (default): two-tailed 95% confidence
    /// - 2.576: two-tailed 99% confidence
    /// - 1.645: two-tailed 90% confidence
    pub z_critical: f64,

    /// Metric used for baselines and classification
    ///
    /// Default: throughput. Latency metrics treat an increase as a regression.
    pub metric: Metric,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            regression_threshold: 0.15, // 15% relative change
            retention_days: 30,         // Rolling 30-day window
            z_critical: 1.96,           // 95% confidence
            metric: Metric::Throughput,
        }
    }
}

impl RegressionConfig {
    /// Create a strict configuration (smaller threshold, higher confidence)
    ///
    /// Flags smaller changes, but only calls them significant at 99%.
    pub fn strict() -> Self {
        Self {
            regression_threshold: 0.10,
            retention_days: 30,
            z_critical: 2.576,
            metric: Metric::Throughput,
        }
    }

    /// Create a permissive configuration (larger threshold, lower confidence)
    ///
    /// Use for noisy shared CI runners.
    pub fn permissive() -> Self {
        Self {
            regression_threshold: 0.25,
            retention_days: 14,
            z_critical: 1.645,
            metric: Metric::Throughput,
        }
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Threshold expressed in percent (0.15 → 15.0)
    pub fn threshold_pct(&self) -> f64 {
        self.regression_threshold * 100.0
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.regression_threshold) {
            return Err(format!(
                "regression_threshold must be in [0, 1], got {}",
                self.regression_threshold
            ));
        }

        if self.retention_days == 0 {
            return Err("retention_days must be >= 1, got 0".to_string());
        }

        if !(self.z_critical.is_finite() && self.z_critical > 0.0) {
            return Err(format!(
                "z_critical must be a positive number, got {}",
                self.z_critical
            ));
        }

        Ok(())
    }
}
