/// Baseline and Classification Benchmarks
///
/// Measures baseline computation over growing histories, classification of a
/// full current run, and normalization of raw result documents.
use benchgate::normalizer;
use benchgate::record::{BenchmarkRecord, Metric, Operation};
use benchgate::regression::{classify_all, compute, compute_all, RegressionConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::Path;
use std::time::Duration;

const CONFIGURATIONS: [&str; 4] = ["memory", "rocksdb", "sqlite", "postgres"];

fn history(days: usize) -> Vec<BenchmarkRecord> {
    let mut records = Vec::with_capacity(days * CONFIGURATIONS.len() * Operation::ALL.len());
    for day in 0..days {
        for (c, configuration) in CONFIGURATIONS.iter().enumerate() {
            for operation in Operation::ALL {
                // Deterministic jitter around a per-configuration level
                let jitter = ((day * 7 + c * 13) % 11) as f64 - 5.0;
                records.push(BenchmarkRecord {
                    configuration: configuration.to_string(),
                    operation,
                    throughput: 10_000.0 * (c + 1) as f64 + jitter * 50.0,
                    mean_latency: 100_000.0 + jitter * 1_000.0,
                    p50_latency: 90_000.0,
                    p95_latency: 150_000.0,
                    p99_latency: 200_000.0 + jitter * 2_000.0,
                    sample_count: 10_000,
                    collected_at: None,
                });
            }
        }
    }
    records
}

fn bench_baseline_single_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline_single_pair");
    group.measurement_time(Duration::from_secs(5));

    for days in [7, 30, 90, 365].iter() {
        let records = history(*days);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &records, |b, records| {
            b.iter(|| {
                black_box(compute(
                    black_box(records),
                    "rocksdb",
                    Operation::Read,
                    Metric::Throughput,
                ))
            });
        });
    }

    group.finish();
}

fn bench_baseline_all_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline_all_pairs");
    group.measurement_time(Duration::from_secs(5));

    for days in [7, 30, 90].iter() {
        let records = history(*days);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &records, |b, records| {
            b.iter(|| black_box(compute_all(black_box(records), Metric::P99)));
        });
    }

    group.finish();
}

fn bench_classify_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_run");
    group.measurement_time(Duration::from_secs(5));

    let config = RegressionConfig::default();
    let baselines = compute_all(&history(30), config.metric);
    let current = history(1);

    group.bench_function("classify_all_pairs", |b| {
        b.iter(|| black_box(classify_all(black_box(&current), &baselines, &config)));
    });

    group.finish();
}

fn bench_normalize_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_document");

    let canonical = r#"{
        "metadata": {"clients": 12},
        "create": {"throughput": 10500.0, "avg_time_ns": 95000, "p50_ns": 90000, "p95_ns": 140000, "p99_ns": 210000, "samples": 10000},
        "read": {"throughput": 48000.0, "avg_time_ns": 21000, "p50_ns": 20000, "p95_ns": 35000, "p99_ns": 52000, "samples": 10000},
        "update": {"throughput": 9100.0, "avg_time_ns": 110000, "p50_ns": 100000, "p95_ns": 170000, "p99_ns": 240000, "samples": 10000},
        "delete": {"throughput": 12000.0, "avg_time_ns": 83000, "p50_ns": 80000, "p95_ns": 120000, "p99_ns": 190000, "samples": 10000}
    }"#;
    let legacy = r#"{
        "creates": {"ops": 10500.0, "mean": 95.0, "q50": 90.0, "q95": 140.0, "q99": 210.0, "sample_count": 10000},
        "reads": {"ops": 48000.0, "mean": 21.0, "q50": 20.0, "q95": 35.0, "q99": 52.0, "sample_count": 10000}
    }"#;

    group.bench_function("canonical_keys", |b| {
        b.iter(|| normalizer::parse(black_box(canonical), Path::new("result-memory.json")));
    });
    group.bench_function("legacy_keys", |b| {
        b.iter(|| normalizer::parse(black_box(legacy), Path::new("result-memory.json")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_baseline_single_pair,
    bench_baseline_all_pairs,
    bench_classify_run,
    bench_normalize_document
);
criterion_main!(benches);
