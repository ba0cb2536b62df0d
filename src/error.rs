//! Error types for parallel-du
//!
//! This module defines the error hierarchy used by the scanner:
//! - Configuration and CLI errors (fatal, raised before scanning begins)
//! - Worker pool errors (fatal, the run cannot produce a total)
//! - Per-directory scan errors (non-fatal, collected into the summary)
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Scan errors keep the path and the underlying I/O cause
//! - Only setup and worker errors abort a run

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for parallel-du
#[derive(Error, Debug)]
pub enum DuError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid thread count
    #[error("Invalid thread count {count}: must be between 1 and {max}")]
    InvalidThreadCount { count: usize, max: usize },

    /// A root could not be turned into an absolute path
    #[error("Cannot resolve root '{}': {source}", path.display())]
    UnresolvableRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Worker pool errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Spawning a worker thread failed
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Result channel closed while scans were still outstanding
    #[error("Result channel closed with {in_flight} scans in flight")]
    ResultChannelClosed { in_flight: usize },

    /// Every worker has exited, so nothing can be dispatched
    #[error("All workers have terminated unexpectedly")]
    AllWorkersDead,

    /// Worker thread panicked outside of a scan
    #[error("Worker {id} panicked")]
    Panicked { id: usize },
}

/// Failure to scan a single directory
///
/// These never abort a run: the directory contributes zero bytes and the
/// error is recorded in the scan summary.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Reading the directory's own metadata failed
    #[error("Failed to stat '{}': {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but is not a directory
    #[error("Not a directory: '{}'", path.display())]
    NotADirectory { path: PathBuf },

    /// Opening the directory for listing failed
    #[error("Failed to open directory '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing failed part way through
    #[error("Failed to read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scanner panicked while handling this directory
    #[error("Scanner panicked on '{}': {message}", path.display())]
    Panicked { path: PathBuf, message: String },
}

impl ScanError {
    /// Returns the directory this error belongs to
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Stat { path, .. }
            | ScanError::NotADirectory { path }
            | ScanError::Open { path, .. }
            | ScanError::ReadDir { path, .. }
            | ScanError::Panicked { path, .. } => path,
        }
    }

    /// Returns the I/O error kind behind this failure, if any
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ScanError::Stat { source, .. }
            | ScanError::Open { source, .. }
            | ScanError::ReadDir { source, .. } => Some(source.kind()),
            ScanError::NotADirectory { .. } | ScanError::Panicked { .. } => None,
        }
    }

    /// True if the directory vanished or never existed
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}

/// Result type alias for DuError
pub type Result<T> = std::result::Result<T, DuError>;
