//! CLI argument parsing for Benchgate

use crate::record::Metric;
use crate::regression::RegressionConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "benchgate")]
#[command(version)]
#[command(about = "Analyze CRUD benchmark results and detect performance regressions", long_about = None)]
pub struct Cli {
    /// Directory containing current benchmark result JSON files
    #[arg(long = "results-dir", value_name = "DIR")]
    pub results_dir: PathBuf,

    /// Output Markdown report file (must stay inside the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output JSON file with detailed analysis
    #[arg(long = "json-output", value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Root of the YYYY-MM-DD historical results tree
    #[arg(long = "history-dir", value_name = "DIR", default_value = "results")]
    pub history_dir: PathBuf,

    /// Number of days of historical data to compare against (default: 30)
    #[arg(long = "historical-days", value_name = "DAYS")]
    pub historical_days: Option<u32>,

    /// Regression threshold as a fraction (default: 0.15 = 15%)
    #[arg(long = "regression-threshold", value_name = "FRACTION")]
    pub regression_threshold: Option<f64>,

    /// Metric used for baselines and classification (default: throughput)
    #[arg(long = "metric", value_enum)]
    pub metric: Option<Metric>,

    /// TOML file with analysis settings (flags take precedence)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with status 1 when any regression is detected
    #[arg(long = "fail-on-regression")]
    pub fail_on_regression: bool,

    /// Enable debug tracing output
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: RegressionConfig) -> RegressionConfig {
        if let Some(days) = self.historical_days {
            config.retention_days = days;
        }
        if let Some(threshold) = self.regression_threshold {
            config.regression_threshold = threshold;
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }
        config
    }
}
