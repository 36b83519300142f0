//! Event sink for per-item warnings and run progress
//!
//! Ingestion never aborts on a bad file; it reports the problem here and moves
//! on. The default observer forwards events to `tracing`, tests use
//! [`RecordingObserver`] to assert on what was skipped.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

/// Something the analyzer wants the outside world to know about
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// A file or directory was refused by the path guard or could not be listed
    PathRejected { path: PathBuf, reason: String },
    /// A second document in one directory maps to an already loaded configuration
    DuplicateConfiguration {
        path: PathBuf,
        configuration: String,
        kept: PathBuf,
    },
    /// A result document could not be normalized
    ParseFailed { path: PathBuf, reason: String },
    /// A history entry is not a usable day directory
    DaySkipped { path: PathBuf, reason: String },
    /// The history walk stopped at a day older than the retention window
    RetentionCutoff { day: NaiveDate, cutoff: NaiveDate },
    /// The history root does not exist
    HistoryMissing { root: PathBuf },
    /// History walk finished
    HistoryLoaded { days: usize, records: usize },
    /// Current results directory scanned
    CurrentLoaded { documents: usize },
}

impl AnalysisEvent {
    /// True for events that mean some input was skipped
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AnalysisEvent::PathRejected { .. }
                | AnalysisEvent::DuplicateConfiguration { .. }
                | AnalysisEvent::ParseFailed { .. }
                | AnalysisEvent::DaySkipped { .. }
        )
    }
}

impl fmt::Display for AnalysisEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisEvent::PathRejected { path, reason } => {
                write!(f, "Skipping {}: {}", path.display(), reason)
            }
            AnalysisEvent::DuplicateConfiguration {
                path,
                configuration,
                kept,
            } => write!(
                f,
                "Skipping {}: configuration '{}' already loaded from {}",
                path.display(),
                configuration,
                kept.display()
            ),
            AnalysisEvent::ParseFailed { path, reason } => {
                write!(f, "Failed to parse {}: {}", path.display(), reason)
            }
            AnalysisEvent::DaySkipped { path, reason } => {
                write!(f, "Skipping history entry {}: {}", path.display(), reason)
            }
            AnalysisEvent::RetentionCutoff { day, cutoff } => {
                write!(f, "History walk stopped at {} (cutoff {})", day, cutoff)
            }
            AnalysisEvent::HistoryMissing { root } => {
                write!(f, "No historical data available yet at {}", root.display())
            }
            AnalysisEvent::HistoryLoaded { days, records } => {
                write!(f, "Loaded {} historical data points from {} days", records, days)
            }
            AnalysisEvent::CurrentLoaded { documents } => {
                write!(f, "Loaded {} current result documents", documents)
            }
        }
    }
}

/// Receives analysis events
pub trait AnalysisObserver {
    fn observe(&self, event: AnalysisEvent);
}

/// Forwards events to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn observe(&self, event: AnalysisEvent) {
        match event {
            AnalysisEvent::RetentionCutoff { .. } => tracing::debug!("{}", event),
            _ if event.is_warning() => tracing::warn!("{}", event),
            _ => tracing::info!("{}", event),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<AnalysisEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalysisEvent> {
        self.events.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<AnalysisEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }
}

impl AnalysisObserver for RecordingObserver {
    fn observe(&self, event: AnalysisEvent) {
        self.events.borrow_mut().push(event);
    }
}
