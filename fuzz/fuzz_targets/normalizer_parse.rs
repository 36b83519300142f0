#![no_main]

use benchgate::normalizer;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // Arbitrary result documents must be rejected with an error, never a panic
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(document) = normalizer::parse(input, Path::new("result-fuzz.json")) {
            for record in &document.records {
                assert!(record.throughput >= 0.0);
                assert!(record.p99_latency >= 0.0);
            }
        }
    }
});
