// Regression classification against a historical baseline
//
// Stage 1: relative change vs. threshold decides the status.
// Stage 2: for regressions only, a z-test against the baseline spread marks
//          the result as statistically significant. Significance is metadata;
//          it never changes the status.

use crate::record::{BenchmarkRecord, Operation};
use crate::regression::config::RegressionConfig;
use crate::regression::statistics::{Baseline, BaselineKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of comparing one current value against its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Worse than the baseline by more than the threshold
    Regression,
    /// Better than the baseline by more than the threshold
    Improvement,
    /// Within the threshold band
    Stable,
    /// No usable baseline (no history, or a zero median)
    NoBaseline,
}

/// Pure classification result for one value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: Status,

    /// Signed percent change vs. the baseline median (absent without baseline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,

    /// Significance of a regression (absent for any other status)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant: Option<bool>,
}

impl Verdict {
    fn no_baseline() -> Self {
        Self {
            status: Status::NoBaseline,
            change_pct: None,
            significant: None,
        }
    }
}

/// Classify one current metric value
///
/// # Example
/// ```
/// use benchgate::regression::{classify, Baseline, RegressionConfig, Status};
///
/// let baseline = Baseline { median: 100.5, stddev: 1.71, sample_size: 4 };
/// let verdict = classify(80.0, Some(&baseline), &RegressionConfig::default());
/// assert_eq!(verdict.status, Status::Regression);
/// assert_eq!(verdict.significant, Some(true));
/// ```
pub fn classify(current: f64, baseline: Option<&Baseline>, config: &RegressionConfig) -> Verdict {
    let Some(baseline) = baseline else {
        return Verdict::no_baseline();
    };
    // No percentage change is defined against a zero median
    if baseline.median == 0.0 {
        return Verdict::no_baseline();
    }

    let change_pct = (current - baseline.median) / baseline.median * 100.0;
    // Positive means "better" regardless of the metric's direction
    let gain_pct = if config.metric.higher_is_better() {
        change_pct
    } else {
        -change_pct
    };
    let threshold_pct = config.threshold_pct();

    let status = if gain_pct < -threshold_pct {
        Status::Regression
    } else if gain_pct > threshold_pct {
        Status::Improvement
    } else {
        Status::Stable
    };

    let significant = (status == Status::Regression)
        .then(|| is_significant(current, baseline, config.z_critical));

    Verdict {
        status,
        change_pct: Some(change_pct),
        significant,
    }
}

/// Z-test of a current value against the baseline spread
///
/// With zero spread any deviation at all is significant.
pub fn is_significant(current: f64, baseline: &Baseline, z_critical: f64) -> bool {
    let deviation = (current - baseline.median).abs();
    if baseline.stddev == 0.0 {
        return deviation > 0.0;
    }
    deviation / baseline.stddev > z_critical
}

/// Verdict for one current record, with the context needed for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub configuration: String,
    pub operation: Operation,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant: Option<bool>,
    /// Current value of the classified metric
    pub current_value: f64,
    /// Baseline used (absent for `no_baseline`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
}

/// Classify one current record against the baseline map
///
/// Returns `None` for records without samples; they carry no measurement.
pub fn classify_record(
    record: &BenchmarkRecord,
    baselines: &BTreeMap<BaselineKey, Baseline>,
    config: &RegressionConfig,
) -> Option<Classification> {
    if !record.has_samples() {
        return None;
    }

    let current_value = config.metric.value(record);
    let baseline = baselines
        .get(&(record.configuration.clone(), record.operation))
        .copied();
    let verdict = classify(current_value, baseline.as_ref(), config);

    Some(Classification {
        configuration: record.configuration.clone(),
        operation: record.operation,
        status: verdict.status,
        change_pct: verdict.change_pct,
        significant: verdict.significant,
        current_value,
        baseline: baseline.filter(|_| verdict.status != Status::NoBaseline),
    })
}

/// Classifications keyed by (configuration, operation)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationSet {
    entries: BTreeMap<BaselineKey, Classification>,
}

impl ClassificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a classification, replacing any earlier one for the same pair
    pub fn insert(&mut self, classification: Classification) {
        let key = (
            classification.configuration.clone(),
            classification.operation,
        );
        self.entries.insert(key, classification);
    }

    pub fn get(&self, configuration: &str, operation: Operation) -> Option<&Classification> {
        self.entries.get(&(configuration.to_string(), operation))
    }

    /// Classifications ordered by configuration, then operation
    pub fn iter(&self) -> impl Iterator<Item = &Classification> {
        self.entries.values()
    }

    pub fn with_status(&self, status: Status) -> impl Iterator<Item = &Classification> {
        self.iter().filter(move |c| c.status == status)
    }

    pub fn count(&self, status: Status) -> usize {
        self.with_status(status).count()
    }

    pub fn has_regressions(&self) -> bool {
        self.count(Status::Regression) > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify every current record that has samples
pub fn classify_all(
    current: &[BenchmarkRecord],
    baselines: &BTreeMap<BaselineKey, Baseline>,
    config: &RegressionConfig,
) -> ClassificationSet {
    let mut set = ClassificationSet::new();
    for classification in current
        .iter()
        .filter_map(|record| classify_record(record, baselines, config))
    {
        set.insert(classification);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metric;

    fn baseline(median: f64, stddev: f64) -> Baseline {
        Baseline {
            median,
            stddev,
            sample_size: 4,
        }
    }

    fn record(config: &str, op: Operation, throughput: f64, samples: u64) -> BenchmarkRecord {
        BenchmarkRecord {
            configuration: config.to_string(),
            operation: op,
            throughput,
            mean_latency: 0.0,
            p50_latency: 0.0,
            p95_latency: 0.0,
            p99_latency: 0.0,
            sample_count: samples,
            collected_at: None,
        }
    }

    #[test]
    fn test_classify_no_baseline() {
        let verdict = classify(100.0, None, &RegressionConfig::default());
        assert_eq!(verdict.status, Status::NoBaseline);
        assert_eq!(verdict.change_pct, None);
        assert_eq!(verdict.significant, None);
    }

    #[test]
    fn test_classify_zero_median_is_no_baseline() {
        let verdict = classify(50.0, Some(&baseline(0.0, 0.0)), &RegressionConfig::default());
        assert_eq!(verdict, Verdict::no_baseline());
    }

    #[test]
    fn test_classify_boundary_is_stable() {
        let config = RegressionConfig {
            regression_threshold: 0.25,
            ..RegressionConfig::default()
        };
        // Exactly -25% and +25% stay inside the band
        assert_eq!(classify(75.0, Some(&baseline(100.0, 1.0)), &config).status, Status::Stable);
        assert_eq!(classify(125.0, Some(&baseline(100.0, 1.0)), &config).status, Status::Stable);
    }

    #[test]
    fn test_significance_only_for_regressions() {
        let config = RegressionConfig::default();
        let improvement = classify(200.0, Some(&baseline(100.0, 1.0)), &config);
        assert_eq!(improvement.status, Status::Improvement);
        assert_eq!(improvement.significant, None);

        let stable = classify(101.0, Some(&baseline(100.0, 1.0)), &config);
        assert_eq!(stable.significant, None);
    }

    #[test]
    fn test_regression_not_significant_with_wide_spread() {
        let verdict = classify(80.0, Some(&baseline(100.0, 15.0)), &RegressionConfig::default());
        assert_eq!(verdict.status, Status::Regression);
        assert_eq!(verdict.significant, Some(false));
    }

    #[test]
    fn test_zero_stddev_significance() {
        assert!(is_significant(80.0, &baseline(100.0, 0.0), 1.96));
        assert!(!is_significant(100.0, &baseline(100.0, 0.0), 1.96));
    }

    #[test]
    fn test_latency_metric_inverts_direction() {
        let config = RegressionConfig {
            metric: Metric::P99,
            ..RegressionConfig::default()
        };
        let slower = classify(130.0, Some(&baseline(100.0, 2.0)), &config);
        assert_eq!(slower.status, Status::Regression);
        assert!(slower.change_pct.unwrap() > 0.0);
        assert_eq!(slower.significant, Some(true));

        let faster = classify(70.0, Some(&baseline(100.0, 2.0)), &config);
        assert_eq!(faster.status, Status::Improvement);
    }

    #[test]
    fn test_classify_record_skips_zero_samples() {
        let baselines = BTreeMap::new();
        let r = record("memory", Operation::Create, 100.0, 0);
        assert!(classify_record(&r, &baselines, &RegressionConfig::default()).is_none());
    }

    #[test]
    fn test_classify_record_drops_zero_median_baseline() {
        let mut baselines = BTreeMap::new();
        baselines.insert(("memory".to_string(), Operation::Read), baseline(0.0, 0.0));
        let r = record("memory", Operation::Read, 100.0, 10);

        let c = classify_record(&r, &baselines, &RegressionConfig::default()).unwrap();
        assert_eq!(c.status, Status::NoBaseline);
        assert!(c.baseline.is_none());
    }

    #[test]
    fn test_classify_all_counts() {
        let mut baselines = BTreeMap::new();
        baselines.insert(("memory".to_string(), Operation::Create), baseline(100.0, 2.0));
        baselines.insert(("memory".to_string(), Operation::Read), baseline(100.0, 2.0));

        let current = vec![
            record("memory", Operation::Create, 50.0, 10),
            record("memory", Operation::Read, 101.0, 10),
            record("memory", Operation::Update, 10.0, 10),
            record("memory", Operation::Delete, 10.0, 0),
        ];

        let set = classify_all(&current, &baselines, &RegressionConfig::default());
        assert_eq!(set.len(), 3);
        assert_eq!(set.count(Status::Regression), 1);
        assert_eq!(set.count(Status::Stable), 1);
        assert_eq!(set.count(Status::NoBaseline), 1);
        assert!(set.has_regressions());
        assert!(set.get("memory", Operation::Delete).is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Status::NoBaseline).unwrap(),
            "\"no_baseline\""
        );
    }
}
