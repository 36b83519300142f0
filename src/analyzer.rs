//! One analysis run: current results × historical baselines → classifications
//!
//! The run is a synchronous batch. Every per-file failure is reported to the
//! observer and skipped; only the absence of any current result is surfaced,
//! as [`RunOutcome::NoData`].

use crate::history;
use crate::normalizer::BenchmarkDocument;
use crate::observer::AnalysisObserver;
use crate::record::BenchmarkRecord;
use crate::regression::{self, ClassificationSet, RegressionConfig};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Where one run reads its inputs from
#[derive(Debug, Clone)]
pub struct AnalysisInputs {
    /// Directory holding this run's `result-<config>.json` files
    pub results_dir: PathBuf,
    /// Root of the `YYYY-MM-DD` history tree
    pub history_dir: PathBuf,
    /// Reference day for the retention window
    pub today: NaiveDate,
}

/// Everything a report needs from a completed run
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Current documents, in file-name order
    pub current: Vec<BenchmarkDocument>,
    /// Number of historical records inside the retention window
    pub historical_records: usize,
    pub classifications: ClassificationSet,
}

/// Result of an analysis run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No current result documents were found; nothing to analyze
    NoData,
    Analyzed(Analysis),
}

impl RunOutcome {
    pub fn has_regressions(&self) -> bool {
        match self {
            RunOutcome::NoData => false,
            RunOutcome::Analyzed(analysis) => analysis.classifications.has_regressions(),
        }
    }
}

/// Runs the regression analysis with a validated configuration
pub struct Analyzer<'a> {
    config: RegressionConfig,
    observer: &'a dyn AnalysisObserver,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer; fails fast on an invalid configuration
    pub fn new(config: RegressionConfig, observer: &'a dyn AnalysisObserver) -> Result<Self> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(Self { config, observer })
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Load, baseline and classify
    pub fn run(&self, inputs: &AnalysisInputs) -> RunOutcome {
        let current = crate::results::load_current(&inputs.results_dir, self.observer);
        if current.is_empty() {
            return RunOutcome::NoData;
        }

        let historical = history::load(
            &inputs.history_dir,
            self.config.retention_days,
            inputs.today,
            self.observer,
        );

        RunOutcome::Analyzed(self.analyze(current, &historical))
    }

    /// Classify already-loaded documents against already-loaded history
    pub fn analyze(&self, current: Vec<BenchmarkDocument>, historical: &[BenchmarkRecord]) -> Analysis {
        let baselines = regression::compute_all(historical, self.config.metric);
        let records: Vec<BenchmarkRecord> = current
            .iter()
            .flat_map(|doc| doc.records.iter().cloned())
            .collect();
        let classifications = regression::classify_all(&records, &baselines, &self.config);

        tracing::debug!(
            "Classified {} results against {} baselines",
            classifications.len(),
            baselines.len()
        );

        Analysis {
            current,
            historical_records: historical.len(),
            classifications,
        }
    }
}
