// Baseline statistics over historical benchmark records
//
// - Median via aprender's DescriptiveStats (R-7 quantile, QuickSelect)
// - Spread via trueno::Vector variance, rescaled to the sample (n - 1) estimator
//
// Both are order-independent: shuffling the historical records yields the same
// baseline.

use crate::record::{BenchmarkRecord, Metric, Operation};
use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trueno::Vector;

/// Key of a baseline: (configuration, operation)
pub type BaselineKey = (String, Operation);

/// Statistical summary of one (configuration, operation) pair's history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Median of the historical metric values
    pub median: f64,

    /// Sample standard deviation (0 when fewer than two values)
    pub stddev: f64,

    /// Number of historical records contributing (not measurement samples)
    pub sample_size: usize,
}

/// Summarize a set of historical metric values
///
/// Returns `Ok(None)` for an empty set: "no history" is never a zero baseline.
/// A single value yields that value as median with zero spread.
///
/// # Example
/// ```
/// use benchgate::regression::summarize;
///
/// let baseline = summarize(&[100.0, 102.0, 98.0, 101.0]).unwrap().unwrap();
/// assert_eq!(baseline.median, 100.5);
/// assert!((baseline.stddev - 1.708).abs() < 0.01);
/// ```
pub fn summarize(values: &[f64]) -> Result<Option<Baseline>> {
    match values {
        [] => Ok(None),
        [only] => Ok(Some(Baseline {
            median: *only,
            stddev: 0.0,
            sample_size: 1,
        })),
        _ => {
            // Median and variance are shift-equivariant; centering on the
            // minimum keeps f32 precision for large ops/s values
            let floor = values.iter().copied().fold(f64::INFINITY, f64::min);
            let samples: Vec<f32> = values.iter().map(|&v| (v - floor) as f32).collect();
            let vector = Vector::from_slice(&samples);

            // f32 rounding may step past the inputs; the median never does
            let ceiling = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let center = (floor + f64::from(median(&vector)?)).max(floor).min(ceiling);
            // trueno computes population variance (divide by n)
            let population_variance = vector
                .variance()
                .context("Failed to compute baseline variance")?;

            let n = values.len() as f64;
            let sample_variance = (f64::from(population_variance) * n / (n - 1.0)).max(0.0);

            Ok(Some(Baseline {
                median: center,
                stddev: sample_variance.sqrt(),
                sample_size: values.len(),
            }))
        }
    }
}

/// Calculate median using aprender's DescriptiveStats
///
/// Median is robust to the occasional outlier run (noisy CI neighbour,
/// cold cache), which would drag a mean baseline around.
pub fn median(vector: &Vector<f32>) -> Result<f32> {
    let stats = DescriptiveStats::new(vector);
    stats
        .quantile(0.5)
        .map_err(|e| anyhow::anyhow!("Failed to compute median: {}", e))
}

/// Baseline for one (configuration, operation) pair
///
/// Only records with samples contribute. Returns `None` when nothing matches.
pub fn compute(
    historical: &[BenchmarkRecord],
    configuration: &str,
    operation: Operation,
    metric: Metric,
) -> Option<Baseline> {
    let values: Vec<f64> = historical
        .iter()
        .filter(|r| r.has_samples())
        .filter(|r| r.configuration == configuration && r.operation == operation)
        .map(|r| metric.value(r))
        .collect();

    summarize_or_warn(configuration, operation, &values)
}

/// Baselines for every (configuration, operation) pair present in the history
pub fn compute_all(historical: &[BenchmarkRecord], metric: Metric) -> BTreeMap<BaselineKey, Baseline> {
    let mut grouped: BTreeMap<BaselineKey, Vec<f64>> = BTreeMap::new();
    for record in historical.iter().filter(|r| r.has_samples()) {
        grouped
            .entry((record.configuration.clone(), record.operation))
            .or_default()
            .push(metric.value(record));
    }

    grouped
        .into_iter()
        .filter_map(|(key, values)| {
            summarize_or_warn(&key.0, key.1, &values).map(|baseline| (key, baseline))
        })
        .collect()
}

fn summarize_or_warn(configuration: &str, operation: Operation, values: &[f64]) -> Option<Baseline> {
    match summarize(values) {
        Ok(baseline) => baseline,
        Err(e) => {
            tracing::warn!(
                "Failed to compute baseline for {}/{}: {}",
                configuration,
                operation,
                e
            );
            None
        }
    }
}
