//! Markdown and JSON reports for an analysis run
//!
//! Consumes the classification set; nothing in the analysis depends on it.

use crate::analyzer::{Analysis, RunOutcome};
use crate::normalizer::BenchmarkDocument;
use crate::record::{Metric, Operation};
use crate::regression::{Classification, RegressionConfig, Status};
use serde::Serialize;
use std::collections::BTreeMap;

const REPORT_TITLE: &str = "## 🔍 CRUD Benchmark Results";

/// Format a throughput value (e.g., "1.2M ops/s", "3.4k ops/s", "512 ops/s")
pub fn format_throughput(throughput: f64) -> String {
    if throughput >= 1_000_000.0 {
        format!("{:.1}M ops/s", throughput / 1_000_000.0)
    } else if throughput >= 1_000.0 {
        format!("{:.1}k ops/s", throughput / 1_000.0)
    } else {
        format!("{:.0} ops/s", throughput)
    }
}

/// Format a latency given in nanoseconds
pub fn format_latency(latency_ns: f64) -> String {
    if latency_ns >= 1_000_000_000.0 {
        format!("{:.2}s", latency_ns / 1_000_000_000.0)
    } else if latency_ns >= 1_000_000.0 {
        format!("{:.2}ms", latency_ns / 1_000_000.0)
    } else if latency_ns >= 1_000.0 {
        format!("{:.2}μs", latency_ns / 1_000.0)
    } else {
        format!("{:.0}ns", latency_ns)
    }
}

fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Throughput => format_throughput(value),
        _ => format_latency(value),
    }
}

fn format_change(change_pct: f64) -> String {
    if change_pct > 0.0 {
        format!("+{:.1}%", change_pct)
    } else {
        format!("{:.1}%", change_pct)
    }
}

fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Regression => "⚠️",
        Status::Improvement => "🚀",
        Status::Stable => "✅",
        Status::NoBaseline => "ℹ️",
    }
}

/// Report written when no current results were found
pub fn no_data_markdown() -> String {
    format!(
        "{}\n\n⚠️ No benchmark results found. Benchmarks may have failed.\n",
        REPORT_TITLE
    )
}

/// Render the Markdown report for a run
pub fn render_markdown(outcome: &RunOutcome, config: &RegressionConfig) -> String {
    match outcome {
        RunOutcome::NoData => no_data_markdown(),
        RunOutcome::Analyzed(analysis) => render_analysis(analysis, config),
    }
}

fn render_analysis(analysis: &Analysis, config: &RegressionConfig) -> String {
    let set = &analysis.classifications;
    let metric = config.metric;
    let days = config.retention_days;
    let mut report = String::new();

    report.push_str(&format!("{}\n\n", REPORT_TITLE));
    if set.has_regressions() {
        report.push_str("### ⚠️ Performance Regressions Detected\n\n");
    } else {
        report.push_str("### ✅ No Performance Regressions Detected\n\n");
    }

    report.push_str("### Summary\n\n");
    report.push_str("| Configuration | Operation | Status | Current | Baseline | Change |\n");
    report.push_str("|--------------|-----------|--------|---------|----------|--------|\n");
    for status in [
        Status::Regression,
        Status::Stable,
        Status::NoBaseline,
        Status::Improvement,
    ] {
        for c in set.with_status(status) {
            let (baseline, change) = match (c.baseline, c.change_pct) {
                (Some(b), Some(pct)) => (format_metric(metric, b.median), format_change(pct)),
                _ => ("N/A".to_string(), "N/A".to_string()),
            };
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                c.configuration,
                c.operation.title(),
                status_marker(c.status),
                format_metric(metric, c.current_value),
                baseline,
                change
            ));
        }
    }

    if set.has_regressions() {
        report.push_str("\n### ⚠️ Performance Warnings\n\n");
        for c in set.with_status(Status::Regression) {
            let marker = if c.significant == Some(true) {
                " (statistically significant)"
            } else {
                ""
            };
            report.push_str(&format!(
                "- **{} - {}:** {:.1}% {} than {}-day median ({} vs {}){}\n",
                c.configuration,
                c.operation.title(),
                c.change_pct.unwrap_or_default().abs(),
                if metric.higher_is_better() { "slower" } else { "higher" },
                days,
                format_metric(metric, c.current_value),
                baseline_text(c, metric),
                marker
            ));
        }
    }

    if set.count(Status::Improvement) > 0 {
        report.push_str("\n### 🚀 Performance Improvements\n\n");
        for c in set.with_status(Status::Improvement) {
            report.push_str(&format!(
                "- **{} - {}:** {:.1}% {} than {}-day median ({} vs {})\n",
                c.configuration,
                c.operation.title(),
                c.change_pct.unwrap_or_default().abs(),
                if metric.higher_is_better() { "faster" } else { "lower" },
                days,
                format_metric(metric, c.current_value),
                baseline_text(c, metric)
            ));
        }
    }

    report.push_str("\n<details>\n");
    report.push_str("<summary>📊 Detailed Metrics</summary>\n\n");
    for document in &analysis.current {
        render_document_details(&mut report, document);
    }
    report.push_str("\n</details>\n");

    report.push_str("\n<details>\n");
    report.push_str("<summary>ℹ️ Methodology</summary>\n\n");
    report.push_str(&format!(
        "\n- **Baseline:** Rolling {}-day median of {} ({} historical data points)\n",
        days,
        metric.label(),
        analysis.historical_records
    ));
    report.push_str(&format!(
        "- **Regression threshold:** {:.1}% performance degradation\n",
        config.threshold_pct()
    ));
    report.push_str(&format!(
        "- **Significance test:** Z-test, |z| > {}\n",
        config.z_critical
    ));
    report.push_str("</details>");

    report
}

fn baseline_text(c: &Classification, metric: Metric) -> String {
    c.baseline
        .map(|b| format_metric(metric, b.median))
        .unwrap_or_else(|| "N/A".to_string())
}

fn render_document_details(report: &mut String, document: &BenchmarkDocument) {
    report.push_str(&format!("\n#### {}\n\n", document.configuration));
    for operation in Operation::ALL {
        let Some(record) = document.record(operation) else {
            continue;
        };
        if record.throughput == 0.0 {
            continue;
        }
        report.push_str(&format!("\n**{}**\n", operation.title()));
        report.push_str(&format!("- Throughput: {}\n", format_throughput(record.throughput)));
        report.push_str(&format!("- Latency P50: {}\n", format_latency(record.p50_latency)));
        report.push_str(&format!("- Latency P95: {}\n", format_latency(record.p95_latency)));
        report.push_str(&format!("- Latency P99: {}\n", format_latency(record.p99_latency)));
        report.push_str(&format!("- Samples: {}\n", record.sample_count));
    }
}

/// Counts per status
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub regressions: usize,
    pub improvements: usize,
    pub stable: usize,
    pub no_baseline: usize,
}

/// Root JSON report structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub timestamp: String,
    pub status: &'static str,
    pub metric: Metric,
    pub regression_threshold: f64,
    pub retention_days: u32,
    pub current_results: BTreeMap<&'a str, &'a BenchmarkDocument>,
    pub classifications: Vec<&'a Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<JsonSummary>,
}

impl<'a> JsonReport<'a> {
    pub fn new(outcome: &'a RunOutcome, config: &RegressionConfig, timestamp: String) -> Self {
        let mut report = Self {
            timestamp,
            status: "no_data",
            metric: config.metric,
            regression_threshold: config.regression_threshold,
            retention_days: config.retention_days,
            current_results: BTreeMap::new(),
            classifications: Vec::new(),
            summary: None,
        };

        if let RunOutcome::Analyzed(analysis) = outcome {
            let set = &analysis.classifications;
            report.status = if set.has_regressions() {
                "regressions_detected"
            } else {
                "ok"
            };
            report.current_results = analysis
                .current
                .iter()
                .map(|doc| (doc.configuration.as_str(), doc))
                .collect();
            report.classifications = set.iter().collect();
            report.summary = Some(JsonSummary {
                regressions: set.count(Status::Regression),
                improvements: set.count(Status::Improvement),
                stable: set.count(Status::Stable),
                no_baseline: set.count(Status::NoBaseline),
            });
        }

        report
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
