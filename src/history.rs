//! Historical result loading from a dated directory tree
//!
//! Layout: one `YYYY-MM-DD` directory per day under the history root, each
//! holding result documents in the current-results schema.
//!
//! Day directories are ordered by their parsed date, newest first, and the walk
//! stops at the first day older than the retention window. Names that are not
//! dates are skipped rather than treated as the end of the window, so gaps and
//! stray entries never hide an in-window day.

use crate::error::ParseError;
use crate::normalizer;
use crate::observer::{AnalysisEvent, AnalysisObserver};
use crate::path_guard;
use crate::record::BenchmarkRecord;
use crate::results::{claim_configuration, json_entries};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory name format of a history day
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Oldest day still inside the retention window
pub fn cutoff_date(today: NaiveDate, retention_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Parse a day directory name (`2024-03-01`)
pub fn parse_day(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, DAY_FORMAT).ok()
}

/// Load all historical records inside the retention window
///
/// Never fails: unreadable roots, rejected paths and unparsable documents are
/// reported to the observer and skipped.
pub fn load(
    root: &Path,
    retention_days: u32,
    today: NaiveDate,
    observer: &dyn AnalysisObserver,
) -> Vec<BenchmarkRecord> {
    if !root.exists() {
        observer.observe(AnalysisEvent::HistoryMissing {
            root: root.to_path_buf(),
        });
        return Vec::new();
    }

    let days = match day_directories(root, observer) {
        Ok(days) => days,
        Err(e) => {
            observer.observe(AnalysisEvent::DaySkipped {
                path: root.to_path_buf(),
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };

    let cutoff = cutoff_date(today, retention_days);
    let mut records = Vec::new();
    let mut days_loaded = 0;

    for (day, path) in days {
        let day_dir = match path_guard::authorize(&path, root) {
            Ok(resolved) => resolved,
            Err(e) => {
                observer.observe(AnalysisEvent::PathRejected {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if day < cutoff {
            observer.observe(AnalysisEvent::RetentionCutoff { day, cutoff });
            break;
        }

        days_loaded += 1;
        records.extend(load_day(&path, &day_dir, day, observer));
    }

    observer.observe(AnalysisEvent::HistoryLoaded {
        days: days_loaded,
        records: records.len(),
    });
    records
}

/// Dated subdirectories of the history root, newest first
fn day_directories(
    root: &Path,
    observer: &dyn AnalysisObserver,
) -> std::io::Result<Vec<(NaiveDate, PathBuf)>> {
    let mut days = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                observer.observe(AnalysisEvent::DaySkipped {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !path.is_dir() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()).and_then(parse_day) {
            Some(day) => days.push((day, path)),
            None => observer.observe(AnalysisEvent::DaySkipped {
                path,
                reason: "directory name is not a YYYY-MM-DD date".to_string(),
            }),
        }
    }
    days.sort_by(|a, b| b.cmp(a));
    Ok(days)
}

/// Records from one day directory
///
/// Files are authorized against the resolved day directory, so a symlink in
/// one day cannot pull in another day's (or another tree's) data.
fn load_day(
    listed: &Path,
    day_dir: &Path,
    day: NaiveDate,
    observer: &dyn AnalysisObserver,
) -> Vec<BenchmarkRecord> {
    let entries = match json_entries(day_dir) {
        Ok(entries) => entries,
        Err(e) => {
            observer.observe(AnalysisEvent::DaySkipped {
                path: listed.to_path_buf(),
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    let mut claimed = BTreeMap::new();
    for path in entries {
        match normalizer::load_document(&path, day_dir) {
            Ok(document) => {
                if claim_configuration(&mut claimed, &document, &path, observer) {
                    records.extend(document.records.into_iter().map(|r| r.collected_on(day)));
                }
            }
            Err(ParseError::Guard(e)) => observer.observe(AnalysisEvent::PathRejected {
                path,
                reason: e.to_string(),
            }),
            Err(e) => observer.observe(AnalysisEvent::ParseFailed {
                path,
                reason: e.to_string(),
            }),
        }
    }
    records
}
