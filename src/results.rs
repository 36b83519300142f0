//! Loading of the current run's result documents

use crate::normalizer::{self, BenchmarkDocument};
use crate::observer::{AnalysisEvent, AnalysisObserver};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// List `*.json` entries of a directory, sorted by file name
///
/// Entries are returned as listed (not resolved); callers authorize each one
/// before reading it.
pub(crate) fn json_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Record `document` as the source of its configuration within one directory
///
/// `result-memory.json` and `memory.json` both name `memory`. The first file
/// in name order wins; later ones are reported and must be skipped.
pub(crate) fn claim_configuration(
    claimed: &mut BTreeMap<String, PathBuf>,
    document: &BenchmarkDocument,
    path: &Path,
    observer: &dyn AnalysisObserver,
) -> bool {
    if let Some(kept) = claimed.get(&document.configuration) {
        observer.observe(AnalysisEvent::DuplicateConfiguration {
            path: path.to_path_buf(),
            configuration: document.configuration.clone(),
            kept: kept.clone(),
        });
        return false;
    }
    claimed.insert(document.configuration.clone(), path.to_path_buf());
    true
}

/// Load every result document in `results_dir`
///
/// Each file is authorized against `results_dir` before it is read. Files
/// that escape the directory, fail to parse, or repeat a configuration are
/// reported to the observer and skipped. A missing or unreadable directory yields no documents.
pub fn load_current(results_dir: &Path, observer: &dyn AnalysisObserver) -> Vec<BenchmarkDocument> {
    let entries = match json_entries(results_dir) {
        Ok(entries) => entries,
        Err(e) => {
            observer.observe(AnalysisEvent::PathRejected {
                path: results_dir.to_path_buf(),
                reason: e.to_string(),
            });
            observer.observe(AnalysisEvent::CurrentLoaded { documents: 0 });
            return Vec::new();
        }
    };

    let mut documents = Vec::new();
    let mut claimed = BTreeMap::new();
    for path in entries {
        match normalizer::load_document(&path, results_dir) {
            Ok(document) => {
                if claim_configuration(&mut claimed, &document, &path, observer) {
                    documents.push(document);
                }
            }
            Err(crate::error::ParseError::Guard(e)) => {
                observer.observe(AnalysisEvent::PathRejected {
                    path,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                observer.observe(AnalysisEvent::ParseFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    observer.observe(AnalysisEvent::CurrentLoaded {
        documents: documents.len(),
    });
    documents
}
