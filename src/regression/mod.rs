// Baseline Regression Detection
//
// Compares each current benchmark value against a rolling historical baseline:
//
// - statistics: median + sample standard deviation per (configuration, operation)
//   over the retention window (aprender DescriptiveStats, trueno::Vector)
// - verdict: relative-change threshold decides regression / improvement / stable;
//   a z-test (|x - median| / stddev > 1.96) flags significant regressions
// - config: threshold, retention window, critical z, metric
//
// Everything here is pure: identical inputs always yield identical verdicts.

mod config;
mod statistics;
mod verdict;

pub use config::RegressionConfig;
pub use statistics::{compute, compute_all, median, summarize, Baseline, BaselineKey};
pub use verdict::{
    classify, classify_all, classify_record, is_significant, Classification, ClassificationSet,
    Status, Verdict,
};
