//! Metric normalization for benchmark result documents
//!
//! Benchmark tools disagree on field names and units. This module declares
//! every supported variant up front and maps it onto [`BenchmarkRecord`]:
//!
//! | concern      | keys                                   | unit         |
//! |--------------|----------------------------------------|--------------|
//! | operation    | `create`/`creates`, `read`/`reads`, ...| -            |
//! | throughput   | `throughput`, `ops`                    | ops/s        |
//! | mean latency | `avg_time_ns`, `mean_ns` / `mean`, `avg` | ns / µs    |
//! | percentiles  | `p50_ns`, `p95_ns`, `p99_ns` / `q50`, `q95`, `q99` | ns / µs |
//! | samples      | `samples`, `sample_count`              | count        |
//!
//! Earlier keys win when a document carries more than one variant.

use crate::error::ParseError;
use crate::path_guard;
use crate::record::{BenchmarkRecord, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// File name prefix of benchmark result documents (`result-<config>.json`)
pub const RESULT_FILE_PREFIX: &str = "result-";

/// Unit of a latency field in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyUnit {
    Nanoseconds,
    Microseconds,
}

impl LatencyUnit {
    /// Multiplier converting this unit to nanoseconds
    pub const fn to_nanos(self) -> f64 {
        match self {
            LatencyUnit::Nanoseconds => 1.0,
            LatencyUnit::Microseconds => 1_000.0,
        }
    }
}

/// One accepted source key for a canonical field
#[derive(Debug, Clone, Copy)]
struct FieldSource {
    key: &'static str,
    unit: LatencyUnit,
}

const fn ns(key: &'static str) -> FieldSource {
    FieldSource {
        key,
        unit: LatencyUnit::Nanoseconds,
    }
}

const fn us(key: &'static str) -> FieldSource {
    FieldSource {
        key,
        unit: LatencyUnit::Microseconds,
    }
}

const THROUGHPUT_KEYS: &[&str] = &["throughput", "ops"];
const SAMPLE_KEYS: &[&str] = &["samples", "sample_count"];
const MEAN_SOURCES: &[FieldSource] = &[ns("avg_time_ns"), ns("mean_ns"), us("mean"), us("avg")];
const P50_SOURCES: &[FieldSource] = &[ns("p50_ns"), us("q50")];
const P95_SOURCES: &[FieldSource] = &[ns("p95_ns"), us("q95")];
const P99_SOURCES: &[FieldSource] = &[ns("p99_ns"), us("q99")];

/// Document keys naming each operation, singular first
fn operation_keys(operation: Operation) -> &'static [&'static str] {
    match operation {
        Operation::Create => &["create", "creates"],
        Operation::Read => &["read", "reads"],
        Operation::Update => &["update", "updates"],
        Operation::Delete => &["delete", "deletes"],
    }
}

/// Everything recovered from one result document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDocument {
    pub configuration: String,
    /// One record per operation present in the document
    pub records: Vec<BenchmarkRecord>,
    /// Opaque tool metadata, passed through unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Opaque scan results, passed through unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scans: Option<Value>,
}

impl BenchmarkDocument {
    pub fn record(&self, operation: Operation) -> Option<&BenchmarkRecord> {
        self.records.iter().find(|r| r.operation == operation)
    }
}

/// Configuration name encoded in a result file name
///
/// `result-memory.json` → `memory`. Files without the prefix keep their stem.
pub fn configuration_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    let name = stem.strip_prefix(RESULT_FILE_PREFIX).unwrap_or(stem);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Parse raw JSON text into a benchmark document
pub fn parse(raw: &str, source: &Path) -> Result<BenchmarkDocument, ParseError> {
    let value: Value = serde_json::from_str(raw)?;
    parse_value(value, source)
}

/// Normalize an already-decoded JSON value
pub fn parse_value(value: Value, source: &Path) -> Result<BenchmarkDocument, ParseError> {
    let configuration = configuration_name(source).ok_or_else(|| ParseError::InvalidSource {
        path: source.to_path_buf(),
    })?;

    let Value::Object(mut document) = value else {
        return Err(ParseError::NotAnObject);
    };

    let mut records = Vec::new();
    for operation in Operation::ALL {
        let Some((key, entry)) = operation_keys(operation)
            .iter()
            .find_map(|key| document.get(*key).map(|entry| (*key, entry)))
        else {
            continue;
        };
        let Value::Object(metrics) = entry else {
            return Err(ParseError::InvalidOperation {
                operation: key.to_string(),
            });
        };
        records.push(normalize_operation(
            &configuration,
            operation,
            key,
            metrics,
        )?);
    }

    Ok(BenchmarkDocument {
        configuration,
        records,
        metadata: document.remove("metadata"),
        scans: document.remove("scans"),
    })
}

/// Authorize, read and parse one result file
pub fn load_document(path: &Path, allowed_root: &Path) -> Result<BenchmarkDocument, ParseError> {
    let resolved = path_guard::authorize(path, allowed_root)?;
    let raw = std::fs::read_to_string(&resolved).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Name comes from the entry as listed, not the symlink target
    parse(&raw, path)
}

fn normalize_operation(
    configuration: &str,
    operation: Operation,
    key: &str,
    metrics: &Map<String, Value>,
) -> Result<BenchmarkRecord, ParseError> {
    let throughput = THROUGHPUT_KEYS
        .iter()
        .find_map(|field| metrics.get(*field).map(|v| (*field, v)))
        .map(|(field, v)| number(key, field, v))
        .transpose()?
        .unwrap_or(0.0);

    let sample_count = SAMPLE_KEYS
        .iter()
        .find_map(|field| metrics.get(*field).map(|v| (*field, v)))
        .map(|(field, v)| count(key, field, v))
        .transpose()?
        .unwrap_or(0);

    Ok(BenchmarkRecord {
        configuration: configuration.to_string(),
        operation,
        throughput,
        mean_latency: latency(key, metrics, MEAN_SOURCES)?,
        p50_latency: latency(key, metrics, P50_SOURCES)?,
        p95_latency: latency(key, metrics, P95_SOURCES)?,
        p99_latency: latency(key, metrics, P99_SOURCES)?,
        sample_count,
        collected_at: None,
    })
}

/// First present latency variant, converted to nanoseconds
fn latency(
    operation: &str,
    metrics: &Map<String, Value>,
    sources: &[FieldSource],
) -> Result<f64, ParseError> {
    for source in sources {
        if let Some(value) = metrics.get(source.key) {
            return Ok(number(operation, source.key, value)? * source.unit.to_nanos());
        }
    }
    Ok(0.0)
}

fn number(operation: &str, field: &str, value: &Value) -> Result<f64, ParseError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| invalid(operation, field)),
        _ => Err(invalid(operation, field)),
    }
}

fn count(operation: &str, field: &str, value: &Value) -> Result<u64, ParseError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    // Some tools emit counts as floats (e.g., 10000.0)
    let n = number(operation, field, value)?;
    if n.fract() == 0.0 && n <= u64::MAX as f64 {
        Ok(n as u64)
    } else {
        Err(invalid(operation, field))
    }
}

fn invalid(operation: &str, field: &str) -> ParseError {
    ParseError::InvalidValue {
        operation: operation.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> &'static Path {
        Path::new("results/result-memory.json")
    }

    #[test]
    fn test_configuration_name_strips_prefix() {
        assert_eq!(configuration_name(source()).as_deref(), Some("memory"));
        assert_eq!(
            configuration_name(Path::new("rocksdb.json")).as_deref(),
            Some("rocksdb")
        );
        assert_eq!(configuration_name(Path::new("result-.json")), None);
    }

    #[test]
    fn test_parse_crud_bench_schema() {
        let doc = json!({
            "metadata": {"clients": 12},
            "create": {
                "throughput": 12500.0,
                "total_time_ms": 800,
                "avg_time_ns": 80000,
                "p50_ns": 75000,
                "p95_ns": 120000,
                "p99_ns": 200000,
                "samples": 10000
            },
            "read": {"throughput": 50000, "samples": 10000},
            "scans": [{"name": "count_all"}]
        });

        let parsed = parse_value(doc, source()).unwrap();
        assert_eq!(parsed.configuration, "memory");
        assert_eq!(parsed.records.len(), 2);

        let create = parsed.record(Operation::Create).unwrap();
        assert_eq!(create.throughput, 12500.0);
        assert_eq!(create.mean_latency, 80000.0);
        assert_eq!(create.p95_latency, 120000.0);
        assert_eq!(create.sample_count, 10000);

        assert_eq!(parsed.metadata, Some(json!({"clients": 12})));
        assert!(parsed.scans.is_some());
        assert!(parsed.record(Operation::Delete).is_none());
    }

    #[test]
    fn test_parse_plural_keys_and_microseconds() {
        let doc = json!({
            "creates": {"ops": 900.5, "q50": 1.5, "q95": 3.0, "q99": 10.0, "mean": 2.0, "sample_count": 50},
            "deletes": {"ops": 100}
        });

        let parsed = parse_value(doc, source()).unwrap();
        let create = parsed.record(Operation::Create).unwrap();
        assert_eq!(create.throughput, 900.5);
        assert_eq!(create.p50_latency, 1500.0);
        assert_eq!(create.p95_latency, 3000.0);
        assert_eq!(create.p99_latency, 10000.0);
        assert_eq!(create.mean_latency, 2000.0);
        assert_eq!(create.sample_count, 50);

        let delete = parsed.record(Operation::Delete).unwrap();
        assert_eq!(delete.sample_count, 0);
    }

    #[test]
    fn test_nanosecond_fields_take_precedence() {
        let doc = json!({"read": {"p50_ns": 500, "q50": 7}});
        let parsed = parse_value(doc, source()).unwrap();
        assert_eq!(parsed.record(Operation::Read).unwrap().p50_latency, 500.0);
    }

    #[test]
    fn test_singular_key_wins_over_plural() {
        let doc = json!({"read": {"throughput": 1}, "reads": {"throughput": 2}});
        let parsed = parse_value(doc, source()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].throughput, 1.0);
    }

    #[test]
    fn test_empty_operation_is_zero_record() {
        let parsed = parse_value(json!({"update": {}}), source()).unwrap();
        let update = parsed.record(Operation::Update).unwrap();
        assert_eq!(update.throughput, 0.0);
        assert_eq!(update.p99_latency, 0.0);
        assert!(!update.has_samples());
    }

    #[test]
    fn test_float_sample_count_accepted() {
        let parsed = parse_value(json!({"read": {"samples": 10000.0}}), source()).unwrap();
        assert_eq!(parsed.records[0].sample_count, 10000);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let parsed = parse_value(json!({"upsert": {"throughput": 5}}), source()).unwrap();
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse("{not json", source()),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse("[1, 2, 3]", source()),
            Err(ParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_parse_rejects_non_object_operation() {
        let err = parse_value(json!({"create": 42}), source()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidOperation { .. }));
    }

    #[test]
    fn test_parse_rejects_negative_and_string_values() {
        let err = parse_value(json!({"create": {"throughput": -1.0}}), source()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));

        let err = parse_value(json!({"read": {"p50_ns": "fast"}}), source()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));

        let err = parse_value(json!({"read": {"samples": 1.5}}), source()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_null_field_defaults_to_zero() {
        let parsed = parse_value(json!({"read": {"throughput": null}}), source()).unwrap();
        assert_eq!(parsed.records[0].throughput, 0.0);
    }

    #[test]
    fn test_load_document_reads_authorized_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("result-rocksdb.json");
        std::fs::write(&path, r#"{"read": {"throughput": 10, "samples": 3}}"#).unwrap();

        let doc = load_document(&path, dir.path()).unwrap();
        assert_eq!(doc.configuration, "rocksdb");
        assert_eq!(doc.records[0].sample_count, 3);
    }
}
