//! Error types for ingestion of benchmark result files
//!
//! Every variant here is recoverable per item: callers skip the offending
//! file or directory, report it to the observer, and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Rejection produced by the path guard
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("cannot resolve {}: {source}", path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} resolves outside {}", path.display(), root.display())]
    PathEscape { path: PathBuf, root: PathBuf },

    #[error("{} contains a parent-directory component", path.display())]
    ParentTraversal { path: PathBuf },

    #[error("failed to create parent directories for {}: {source}", path.display())]
    CreateParent {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GuardError {
    /// True when the path exists but lies outside the authorized root
    pub fn is_escape(&self) -> bool {
        matches!(
            self,
            GuardError::PathEscape { .. } | GuardError::ParentTraversal { .. }
        )
    }
}

/// Failure to turn one result document into benchmark records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("cannot derive a configuration name from {}", path.display())]
    InvalidSource { path: PathBuf },

    #[error("operation '{operation}' is not an object")]
    InvalidOperation { operation: String },

    #[error("field '{field}' of operation '{operation}' is not a non-negative number")]
    InvalidValue { operation: String, field: String },
}
