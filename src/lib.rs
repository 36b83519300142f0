//! Benchgate - CRUD benchmark regression detection
//!
//! This library ingests benchmark result files, builds rolling historical
//! baselines from a dated result tree, and classifies each current
//! (configuration, operation) measurement as a regression, improvement, or
//! stable result. Every file it reads or writes passes through the path guard.

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod history;
pub mod normalizer;
pub mod observer;
pub mod path_guard;
pub mod record;
pub mod regression;
pub mod report;
pub mod results;
