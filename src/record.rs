//! Canonical benchmark metric model
//!
//! Every supported result schema is normalized into these types before any
//! statistics run, so the rest of the crate never sees provider field names.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CRUD operation measured by the benchmark tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// All operations in report order
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// Lower-case canonical name (e.g., "create")
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Capitalized display name (e.g., "Create")
    pub fn title(self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Read => "Read",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (configuration, operation) measurement from one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Benchmark target under test (e.g., "memory", "rocksdb")
    pub configuration: String,
    pub operation: Operation,
    /// Operations per second
    pub throughput: f64,
    /// Mean latency in nanoseconds
    pub mean_latency: f64,
    /// Median latency in nanoseconds
    pub p50_latency: f64,
    /// 95th percentile latency in nanoseconds
    pub p95_latency: f64,
    /// 99th percentile latency in nanoseconds
    pub p99_latency: f64,
    /// Individual operation timings collected in this run
    pub sample_count: u64,
    /// Day of the historical run (None for current results)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<NaiveDate>,
}

impl BenchmarkRecord {
    /// A run that produced no samples carries no usable measurements
    pub fn has_samples(&self) -> bool {
        self.sample_count > 0
    }

    /// Tag this record with the day it was collected
    pub fn collected_on(mut self, date: NaiveDate) -> Self {
        self.collected_at = Some(date);
        self
    }
}

/// Which metric of a record feeds baselines and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Operations per second (higher is better)
    #[default]
    Throughput,
    /// Mean latency (lower is better)
    Mean,
    /// Median latency (lower is better)
    P50,
    /// 95th percentile latency (lower is better)
    P95,
    /// 99th percentile latency (lower is better)
    P99,
}

impl Metric {
    /// Extract this metric from a record
    pub fn value(self, record: &BenchmarkRecord) -> f64 {
        match self {
            Metric::Throughput => record.throughput,
            Metric::Mean => record.mean_latency,
            Metric::P50 => record.p50_latency,
            Metric::P95 => record.p95_latency,
            Metric::P99 => record.p99_latency,
        }
    }

    /// Direction of "better" for this metric
    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::Throughput)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Throughput => "throughput",
            Metric::Mean => "mean latency",
            Metric::P50 => "P50 latency",
            Metric::P95 => "P95 latency",
            Metric::P99 => "P99 latency",
        }
    }
}
